//! # API Module
//!
//! HTTP endpoints of the short-lived local server started by
//! `scoutlist auth`.
//!
//! - [`callback`] - redirect target of Spotify's authorize page; exchanges
//!   the authorization code for a token using the PKCE verifier kept in the
//!   shared state
//! - [`health`] - reports name and version, handy to check that the
//!   configured `SERVER_ADDRESS` is reachable
//!
//! See [`crate::server`] for the router.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
