use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::{error::ScoutError, types::PlaylistTrackItem};

/// Deduplication key of a track.
///
/// Spotify lists the same recording under several catalog ids (single,
/// album, compilation), so identity is the track name together with the set
/// of contributing artist ids. The catalog id is never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackIdentity {
    name: String,
    artist_ids: BTreeSet<String>,
}

impl TrackIdentity {
    pub fn new<I, S>(name: impl Into<String>, artist_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            artist_ids: artist_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds the identity of a playlist item.
    ///
    /// Returns `None` for items that cannot be played: removed tracks, local
    /// files without a track id and tracks without any artist id.
    pub fn from_item(item: &PlaylistTrackItem) -> Option<Self> {
        let track = item.track.as_ref()?;
        track.id.as_ref()?;

        let artist_ids: BTreeSet<String> =
            track.artists.iter().filter_map(|a| a.id.clone()).collect();
        if artist_ids.is_empty() {
            return None;
        }

        Some(Self {
            name: track.name.clone(),
            artist_ids,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn artist_ids(&self) -> &BTreeSet<String> {
        &self.artist_ids
    }
}

/// A track together with the moment it was added to its playlist.
///
/// Records are ranked by `added_at` alone. Two records of the same identity
/// may carry different timestamps and still compare by time only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    identity: TrackIdentity,
    track_id: String,
    artists: Vec<String>,
    added_at: DateTime<Utc>,
}

impl TrackRecord {
    pub fn new(
        identity: TrackIdentity,
        track_id: impl Into<String>,
        added_at: DateTime<Utc>,
    ) -> Self {
        Self {
            identity,
            track_id: track_id.into(),
            artists: Vec::new(),
            added_at,
        }
    }

    /// Attaches artist display names, used for listings only.
    pub fn with_artists(mut self, artists: Vec<String>) -> Self {
        self.artists = artists;
        self
    }

    /// Builds a record from a playlist item fetched with `added_at`.
    ///
    /// Unplayable items yield `Ok(None)` exactly like
    /// [`TrackIdentity::from_item`]. A playable item with a missing or
    /// unparsable `added_at` means the response is broken and is an error.
    pub fn from_item(item: &PlaylistTrackItem) -> Result<Option<Self>, ScoutError> {
        let (Some(identity), Some(track)) = (TrackIdentity::from_item(item), item.track.as_ref())
        else {
            return Ok(None);
        };
        // an identity implies a track id
        let track_id = track.id.clone().unwrap_or_default();

        let raw = item
            .added_at
            .as_deref()
            .ok_or_else(|| ScoutError::MissingTimestamp(track_id.clone()))?;
        let added_at = parse_added_at(raw).ok_or_else(|| ScoutError::Timestamp {
            track_id: track_id.clone(),
            value: raw.to_string(),
        })?;

        let artists = track
            .artists
            .iter()
            .filter_map(|a| a.name.clone())
            .collect();

        Ok(Some(Self {
            identity,
            track_id,
            artists,
            added_at,
        }))
    }

    pub fn identity(&self) -> &TrackIdentity {
        &self.identity
    }

    pub fn track_id(&self) -> &str {
        &self.track_id
    }

    pub fn artists(&self) -> &[String] {
        &self.artists
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    pub fn uri(&self) -> String {
        format!("spotify:track:{}", self.track_id)
    }
}

/// Parses an ISO-8601 `added_at` value.
///
/// Timestamps without an offset are taken as UTC, a bare date as midnight.
pub fn parse_added_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
