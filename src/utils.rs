use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Local, TimeZone};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::{
    scout::TrackRecord,
    spotify::playlist::MAX_TRACKS_PER_REQUEST,
    types::{PlaylistRef, PlaylistTableRow, ScoutTableRow, UserPlaylist},
};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Name of a new scoutlist, `scout_YYYYMMDD_HHMMSS`.
pub fn scoutlist_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("scout_%Y%m%d_%H%M%S").to_string()
}

pub fn scoutlist_name_now() -> String {
    scoutlist_name(&Local::now())
}

/// Splits `uris` into request sized batches, each with its insert position.
pub fn batches(uris: &[String]) -> impl Iterator<Item = (usize, &[String])> {
    uris.chunks(MAX_TRACKS_PER_REQUEST)
        .enumerate()
        .map(|(i, chunk)| (i * MAX_TRACKS_PER_REQUEST, chunk))
}

pub fn scout_table_rows(tracks: &[TrackRecord]) -> Vec<ScoutTableRow> {
    tracks
        .iter()
        .map(|t| ScoutTableRow {
            added_at: t.added_at().format("%Y-%m-%d %H:%M").to_string(),
            name: t.identity().name().to_string(),
            artists: t.artists().join(", "),
        })
        .collect()
}

pub fn playlist_table_rows(playlists: &[UserPlaylist]) -> Vec<PlaylistTableRow> {
    playlists
        .iter()
        .map(|p| PlaylistTableRow {
            name: p.name.clone(),
            owner: p.owner.id.clone(),
            id: p.id.clone(),
        })
        .collect()
}

/// Converts listed playlists into references ready for `scout.json`.
pub fn playlist_refs(playlists: &[UserPlaylist]) -> Vec<PlaylistRef> {
    playlists
        .iter()
        .map(|p| PlaylistRef {
            name: p.name.clone(),
            owner_id: p.owner.id.clone(),
            playlist_id: p.id.clone(),
        })
        .collect()
}

/// Human readable label of a configured playlist.
pub fn playlist_label(playlist: &PlaylistRef) -> String {
    if playlist.name.is_empty() {
        playlist.playlist_id.clone()
    } else {
        format!("{} ({})", playlist.name, playlist.playlist_id)
    }
}

