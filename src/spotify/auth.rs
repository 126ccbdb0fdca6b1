use std::{net::SocketAddr, sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::{net::TcpListener, sync::Mutex, time::Instant};

use crate::{
    config,
    error::ScoutError,
    management::TokenManager,
    server::start_api_server,
    types::{PkceToken, Token},
    utils, warning,
};

/// How long the user gets to approve access in the browser.
const AUTH_TIMEOUT: Duration = Duration::from_secs(120);

/// Runs the OAuth 2.0 PKCE flow and stores the resulting token.
///
/// A local callback server is started on `SERVER_ADDRESS`, the authorize
/// URL is opened in the browser and the function waits until the callback
/// has exchanged the code for a token, or [`AUTH_TIMEOUT`] passes.
pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Result<Token, ScoutError> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let addr: SocketAddr = config::server_addr()?
        .parse()
        .map_err(|e| ScoutError::Config(format!("invalid SERVER_ADDRESS: {}", e)))?;
    let listener = TcpListener::bind(addr).await?;

    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier,
            token: None,
        });
    }

    let server_state = Arc::clone(&shared_state);
    let server = tokio::spawn(async move {
        if let Err(e) = start_api_server(listener, server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let auth_url = authorize_url(
        &config::spotify_apiauth_url()?,
        &config::spotify_client_id()?,
        &config::spotify_redirect_uri()?,
        &code_challenge,
        &config::spotify_scope()?,
    )?;

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let token = wait_for_token(shared_state, AUTH_TIMEOUT).await;
    server.abort();

    let token = token.ok_or_else(|| {
        ScoutError::Auth("authorization failed or timed out".to_string())
    })?;

    TokenManager::new(token.clone()).persist().await?;
    Ok(token)
}

/// Builds the URL of Spotify's authorize page for the PKCE flow.
pub fn authorize_url(
    base: &str,
    client_id: &str,
    redirect_uri: &str,
    code_challenge: &str,
    scope: &str,
) -> Result<String, ScoutError> {
    let url = Url::parse_with_params(
        base,
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
            ("code_challenge_method", "S256"),
            ("code_challenge", code_challenge),
            ("scope", scope),
        ],
    )
    .map_err(|e| ScoutError::Config(format!("invalid SPOTIFY_API_AUTH_URL: {}", e)))?;

    Ok(url.to_string())
}

async fn wait_for_token(
    shared_state: Arc<Mutex<Option<PkceToken>>>,
    max_wait: Duration,
) -> Option<Token> {
    let start = Instant::now();

    while start.elapsed() < max_wait {
        {
            let lock = shared_state.lock().await;
            if let Some(token) = lock.as_ref().and_then(|pkce| pkce.token.clone()) {
                return Some(token);
            }
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    None
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    scope: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

impl TokenResponse {
    fn into_token(self) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            scope: self.scope,
            expires_in: self.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Exchanges a refresh token for a fresh access token.
///
/// The returned token may lack a refresh token; see
/// [`crate::management::merge_refreshed`].
pub async fn refresh_token(refresh_token: &str) -> Result<Token, ScoutError> {
    let client_id = config::spotify_client_id()?;
    let token_url = config::spotify_apitoken_url()?;

    let response = Client::new()
        .post(&token_url)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id.as_str()),
        ])
        .send()
        .await?
        .error_for_status()
        .map_err(|e| ScoutError::Auth(format!("token refresh failed: {}", e)))?;

    Ok(response.json::<TokenResponse>().await?.into_token())
}

/// Exchanges the authorization code from the callback for a token.
pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Result<Token, ScoutError> {
    let client_id = config::spotify_client_id()?;
    let redirect_uri = config::spotify_redirect_uri()?;
    let token_url = config::spotify_apitoken_url()?;

    let response = Client::new()
        .post(&token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    Ok(response.json::<TokenResponse>().await?.into_token())
}
