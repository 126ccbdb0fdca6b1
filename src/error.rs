use thiserror::Error;

/// Errors raised by the scoutlist library.
///
/// Benign conditions such as local files without a track id are not errors;
/// they are skipped where the track items are decoded. Everything in here
/// aborts the current run.
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("cannot parse added_at timestamp {value:?} of track {track_id}")]
    Timestamp { track_id: String, value: String },
    #[error("track {0} has no added_at timestamp")]
    MissingTimestamp(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("not authenticated: {0}. Please run scoutlist auth")]
    Auth(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
