//! # CLI Module
//!
//! Command implementations behind `scoutlist <command>`. Each command
//! reports progress with the crate's status macros and exits through
//! [`error!`](crate::error) on fatal errors.
//!
//! ## Commands
//!
//! - [`auth`] - authorize scoutlist with Spotify (PKCE)
//! - [`playlists`] - list the user's playlists, including references that
//!   can be pasted into `scout.json`
//! - [`scout`] - build a new scoutlist from the configured playlists
//!
//! ## Typical session
//!
//! ```bash
//! scoutlist auth
//! scoutlist playlists                 # pick sources and excludes
//! scoutlist scout --dry-run           # preview the selection
//! scoutlist scout --length 50         # create the playlist
//! ```

mod auth;
mod playlists;
mod scout;

pub use auth::auth;
pub use playlists::playlists;
pub use scout::{ScoutArgs, scout};
