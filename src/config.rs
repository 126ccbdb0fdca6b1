//! Configuration management for scoutlist.
//!
//! Two sources are involved:
//!
//! 1. Environment variables, optionally loaded from `.env` in the local data
//!    directory (`~/.local/share/scoutlist/.env` on Linux). They hold the
//!    Spotify API credentials and endpoints.
//! 2. The scout configuration, `scout.json` next to the `.env` file, which
//!    lists the source and exclude playlists and the scoutlist length.
//!
//! Command line flags override values from `scout.json`.

use std::{env, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{error::ScoutError, types::PlaylistRef};

/// Number of tracks in a scoutlist when nothing else is configured.
pub const DEFAULT_LENGTH: usize = 100;

/// Returns the scoutlist directory inside the platform's local data dir.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("scoutlist");
    path
}

/// Loads environment variables from `<data dir>/.env`.
///
/// A missing `.env` file is not an error: the variables may as well come
/// from the shell environment.
pub async fn load_env() -> Result<(), ScoutError> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ScoutError::Config(format!(
            "cannot read {}: {}",
            path.display(),
            e
        ))),
    }
}

fn var(name: &str) -> Result<String, ScoutError> {
    env::var(name).map_err(|_| ScoutError::Config(format!("{} must be set", name)))
}

/// Address of the local OAuth callback server, e.g. `127.0.0.1:8888`.
pub fn server_addr() -> Result<String, ScoutError> {
    var("SERVER_ADDRESS")
}

/// Spotify user the scoutlist is created for.
pub fn spotify_user() -> Result<String, ScoutError> {
    var("SPOTIFY_USER_ID")
}

pub fn spotify_client_id() -> Result<String, ScoutError> {
    var("SPOTIFY_API_AUTH_CLIENT_ID")
}

pub fn spotify_redirect_uri() -> Result<String, ScoutError> {
    var("SPOTIFY_API_REDIRECT_URI")
}

/// Needs `playlist-read-private playlist-modify-private playlist-modify-public`.
pub fn spotify_scope() -> Result<String, ScoutError> {
    var("SPOTIFY_API_AUTH_SCOPE")
}

pub fn spotify_apiauth_url() -> Result<String, ScoutError> {
    var("SPOTIFY_API_AUTH_URL")
}

/// Base URL of the Web API, e.g. `https://api.spotify.com/v1`.
pub fn spotify_apiurl() -> Result<String, ScoutError> {
    var("SPOTIFY_API_URL")
}

pub fn spotify_apitoken_url() -> Result<String, ScoutError> {
    var("SPOTIFY_API_TOKEN_URL")
}

/// Contents of `scout.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoutConfig {
    #[serde(default)]
    pub length: Option<usize>,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub sources: Vec<PlaylistRef>,
    #[serde(default)]
    pub excludes: Vec<PlaylistRef>,
}

impl ScoutConfig {
    pub fn default_path() -> PathBuf {
        data_dir().join("scout.json")
    }

    /// Reads the configuration at `path`, or the default location.
    ///
    /// Only an explicitly given path has to exist; a missing default file
    /// yields an empty configuration.
    pub async fn load(path: Option<PathBuf>) -> Result<Self, ScoutError> {
        let explicit = path.is_some();
        let path = path.unwrap_or_else(Self::default_path);

        let content = match async_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ScoutError::Config(format!(
                    "cannot read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        serde_json::from_str(&content)
            .map_err(|e| ScoutError::Config(format!("invalid {}: {}", path.display(), e)))
    }

    pub fn length(&self) -> usize {
        self.length.unwrap_or(DEFAULT_LENGTH)
    }

    /// Applies command line overrides. Playlists given on the command line
    /// replace the configured ones instead of being appended.
    pub fn merge(
        mut self,
        length: Option<usize>,
        public: bool,
        sources: Vec<PlaylistRef>,
        excludes: Vec<PlaylistRef>,
    ) -> Self {
        if length.is_some() {
            self.length = length;
        }
        self.public |= public;
        if !sources.is_empty() {
            self.sources = sources;
        }
        if !excludes.is_empty() {
            self.excludes = excludes;
        }
        self
    }
}

/// Parses an `owner:playlist_id` command line argument.
///
/// Spotify playlist URIs (`spotify:playlist:<id>`) and open.spotify.com links
/// are accepted too; their owner is left empty.
pub fn parse_playlist_ref(s: &str) -> Result<PlaylistRef, String> {
    let s = s.trim();

    if let Some(id) = s.strip_prefix("spotify:playlist:") {
        return playlist_ref("", id);
    }

    if let Some(rest) = s
        .strip_prefix("https://open.spotify.com/playlist/")
        .or_else(|| s.strip_prefix("open.spotify.com/playlist/"))
    {
        let id = rest.split(['?', '/']).next().unwrap_or_default();
        return playlist_ref("", id);
    }

    match s.split_once(':') {
        Some((owner, id)) => playlist_ref(owner, id),
        None => Err(format!(
            "invalid playlist '{}', expected owner:playlist_id",
            s
        )),
    }
}

fn playlist_ref(owner: &str, id: &str) -> Result<PlaylistRef, String> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!("invalid playlist id '{}'", id));
    }
    Ok(PlaylistRef {
        name: String::new(),
        owner_id: owner.to_string(),
        playlist_id: id.to_string(),
    })
}
