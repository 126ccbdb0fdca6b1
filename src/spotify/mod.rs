//! # Spotify Integration Module
//!
//! Thin client for the parts of the Spotify Web API scoutlist needs. All
//! selection logic lives in [`crate::scout`]; this module only moves JSON.
//!
//! ## Submodules
//!
//! - [`auth`] - OAuth 2.0 PKCE flow and token refresh
//! - [`tracks`] - paged playlist track fetch, exposed as a
//!   [`PlaylistSource`](crate::scout::PlaylistSource)
//! - [`playlist`] - listing the user's playlists, creating the scoutlist and
//!   appending tracks in batches
//!
//! ## Endpoints
//!
//! - `GET /playlists/{playlist_id}/tracks`
//! - `GET /me/playlists`
//! - `POST /users/{user_id}/playlists`
//! - `POST /playlists/{playlist_id}/tracks`
//! - `POST /api/token` (accounts service)
//!
//! ## Retries
//!
//! Every Web API request goes through [`send_with_retry`]:
//! - `502 Bad Gateway` is retried after 10 seconds
//! - `429 Too Many Requests` waits for `Retry-After` when it is at most
//!   120 seconds, otherwise the error is returned
//! - any other error status is returned to the caller

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use tokio::time::sleep;

use crate::warning;

pub mod auth;
pub mod playlist;
pub mod tracks;

/// Longest `Retry-After` we are willing to sleep through.
pub const MAX_RETRY_AFTER: u64 = 120;

/// Sends the request built by `build`, retrying on 502 and short 429s.
pub async fn send_with_retry<F>(build: F) -> Result<Response, reqwest::Error>
where
    F: Fn() -> RequestBuilder,
{
    loop {
        let response = build().send().await?;

        match response.status() {
            StatusCode::BAD_GATEWAY => {
                sleep(Duration::from_secs(10)).await;
                continue; // retry
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = retry_after_secs(&response);
                if retry_after <= MAX_RETRY_AFTER {
                    sleep(Duration::from_secs(retry_after.max(1))).await;
                    continue;
                }
                warning!(
                    "Spotify asks to retry after {} seconds. Giving up for now.",
                    retry_after
                );
                return response.error_for_status();
            }
            _ => return response.error_for_status(),
        }
    }
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0)
}
