use reqwest::Client;

use crate::{
    config,
    error::ScoutError,
    management::TokenManager,
    scout::PlaylistSource,
    types::{PlaylistRef, PlaylistTrackItem, PlaylistTracksPage},
};

/// Largest page `GET /playlists/{id}/tracks` hands out.
pub const PAGE_SIZE: u64 = 100;

/// Field selector for the tracks endpoint.
///
/// Exclude playlists only need identities, so `added_at` is requested only
/// when recency matters.
pub fn track_fields(with_added_at: bool) -> &'static str {
    if with_added_at {
        "items(added_at,track(id,name,artists(id,name))),total"
    } else {
        "items(track(id,name,artists(id,name))),total"
    }
}

/// Fetches one page of a playlist's tracks.
pub async fn get_playlist_tracks(
    client: &Client,
    token: &str,
    playlist: &PlaylistRef,
    limit: u64,
    offset: u64,
    with_added_at: bool,
) -> Result<PlaylistTracksPage, ScoutError> {
    let api_url = format!(
        "{uri}/playlists/{id}/tracks",
        uri = config::spotify_apiurl()?,
        id = playlist.playlist_id
    );
    let limit = limit.to_string();
    let offset = offset.to_string();

    let response = super::send_with_retry(|| {
        client.get(&api_url).bearer_auth(token).query(&[
            ("fields", track_fields(with_added_at)),
            ("limit", limit.as_str()),
            ("offset", offset.as_str()),
        ])
    })
    .await?;

    Ok(response.json::<PlaylistTracksPage>().await?)
}

/// All tracks of one playlist, fetched page by page on demand.
pub struct SpotifyPlaylistSource<'a> {
    client: &'a Client,
    tokens: &'a mut TokenManager,
    playlist: PlaylistRef,
    with_added_at: bool,
    offset: u64,
    done: bool,
}

impl<'a> SpotifyPlaylistSource<'a> {
    pub fn new(
        client: &'a Client,
        tokens: &'a mut TokenManager,
        playlist: PlaylistRef,
        with_added_at: bool,
    ) -> Self {
        Self {
            client,
            tokens,
            playlist,
            with_added_at,
            offset: 0,
            done: false,
        }
    }

    pub fn playlist(&self) -> &PlaylistRef {
        &self.playlist
    }
}

impl PlaylistSource for SpotifyPlaylistSource<'_> {
    async fn next_page(&mut self) -> Result<Option<Vec<PlaylistTrackItem>>, ScoutError> {
        if self.done {
            return Ok(None);
        }

        let token = self.tokens.get_valid_token().await?;
        let page = get_playlist_tracks(
            self.client,
            &token,
            &self.playlist,
            PAGE_SIZE,
            self.offset,
            self.with_added_at,
        )
        .await?;

        self.offset += PAGE_SIZE;
        if self.offset >= page.total || page.items.is_empty() {
            self.done = true;
        }

        Ok(Some(page.items))
    }
}
