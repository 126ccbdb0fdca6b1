use reqwest::Client;

use crate::{
    config,
    error::ScoutError,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, GetUserPlaylistsResponse,
    },
};

/// Upper bound of uris per `POST /playlists/{id}/tracks`.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

/// Upper bound of playlists per `GET /me/playlists`.
pub const PLAYLISTS_PAGE_SIZE: u64 = 50;

/// Fetches one page of the current user's playlists.
pub async fn get_user_playlists(
    client: &Client,
    token: &str,
    limit: u64,
    offset: u64,
) -> Result<GetUserPlaylistsResponse, ScoutError> {
    let api_url = format!("{uri}/me/playlists", uri = config::spotify_apiurl()?);
    let limit = limit.to_string();
    let offset = offset.to_string();

    let response = super::send_with_retry(|| {
        client
            .get(&api_url)
            .bearer_auth(token)
            .query(&[("limit", limit.as_str()), ("offset", offset.as_str())])
    })
    .await?;

    Ok(response.json::<GetUserPlaylistsResponse>().await?)
}

/// Creates an empty playlist owned by `user_id`.
pub async fn create(
    client: &Client,
    token: &str,
    user_id: &str,
    name: String,
    public: bool,
) -> Result<CreatePlaylistResponse, ScoutError> {
    let api_url = format!(
        "{uri}/users/{user_id}/playlists",
        uri = config::spotify_apiurl()?,
        user_id = user_id
    );

    let body = CreatePlaylistRequest {
        description: "Most recently added tracks, collected by scoutlist".to_string(),
        name,
        public,
        collaborative: false,
    };

    let response =
        super::send_with_retry(|| client.post(&api_url).bearer_auth(token).json(&body)).await?;

    Ok(response.json::<CreatePlaylistResponse>().await?)
}

/// Inserts one batch of track uris at `position`.
///
/// Spotify rejects more than [`MAX_TRACKS_PER_REQUEST`] uris; split larger
/// lists with [`crate::utils::batches`].
pub async fn add_tracks(
    client: &Client,
    token: &str,
    playlist_id: &str,
    uris: &[String],
    position: usize,
) -> Result<AddTrackToPlaylistResponse, ScoutError> {
    let api_url = format!(
        "{uri}/playlists/{playlist_id}/tracks",
        uri = config::spotify_apiurl()?,
        playlist_id = playlist_id
    );

    let body = AddTrackToPlaylistRequest {
        uris: uris.to_vec(),
        position,
    };

    let response =
        super::send_with_retry(|| client.post(&api_url).bearer_auth(token).json(&body)).await?;

    Ok(response.json::<AddTrackToPlaylistResponse>().await?)
}
