//! # Scout Module
//!
//! Selection logic behind a scoutlist: which tracks of the source playlists
//! make it into the new playlist.
//!
//! ## Identity
//!
//! Spotify frequently lists one recording under several track ids, for example
//! once on the single and once on the album. [`TrackIdentity`] therefore keys
//! a track by its name and the set of its artist ids; the catalog id only
//! travels along as payload in [`TrackRecord`].
//!
//! ## Selection
//!
//! 1. The exclude playlists are drained into an [`ExclusionSet`].
//! 2. The source playlists are drained, in configured order, through a
//!    [`TopKAggregator`] that keeps the `capacity` most recently added
//!    tracks, newest first.
//! 3. Every accepted identity joins the exclusion set, so a track listed in
//!    two source playlists is picked once.
//!
//! Only one page of items and at most `capacity` records are held at any
//! time. Ties on `added_at` are won by the record seen first.
//!
//! The module does no I/O. Pages come from a [`PlaylistSource`], which the
//! Spotify client implements in [`crate::spotify::tracks`].

mod aggregator;
mod exclusion;
mod source;
mod track;

pub use aggregator::{AggregateStats, Offer, TopKAggregator, aggregate};
pub use exclusion::{ExclusionSet, ExclusionSetBuilder, build_exclusion_set};
pub use source::{DrainStats, PlaylistSource, drain_exclusions, drain_source};
pub use track::{TrackIdentity, TrackRecord, parse_added_at};
