//! scoutlist library
//!
//! Builds a "scoutlist": a fresh Spotify playlist with the most recently
//! added tracks of several source playlists, minus every track that already
//! appears in a set of exclude playlists. Tracks are deduplicated by name
//! and artists rather than by catalog id.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the local OAuth callback server
//! - `cli` - Command implementations
//! - `config` - Environment and `scout.json` configuration
//! - `error` - Library error type
//! - `management` - Token cache
//! - `scout` - Track identity, exclusion set and top-K aggregation
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client
//! - `types` - Wire types and table rows
//! - `utils` - PKCE helpers and formatting

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod scout;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::ScoutError;

/// Result alias for command level code that mixes error sources.
///
/// Library functions return [`ScoutError`] directly; `Res` is for glue that
/// just reports whatever went wrong.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints a status line with a blue `o` marker.
///
/// ```
/// info!("Reading {} source playlists", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a status line with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line to stderr and exits with status 1.
///
/// Only for fatal errors in command code; library code returns
/// [`ScoutError`] instead.
///
/// ```
/// error!("Failed to load token: {}", e);
/// // not reached
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow `!` line to stderr; the program keeps running.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
