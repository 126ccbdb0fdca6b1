use crate::{error::ScoutError, types::PlaylistTrackItem};

use super::{
    aggregator::TopKAggregator,
    exclusion::ExclusionSetBuilder,
    track::{TrackIdentity, TrackRecord},
};

/// Lazily produces the items of one playlist, a page at a time.
///
/// `Ok(None)` marks the end of the playlist. A source is not restartable.
#[allow(async_fn_in_trait)]
pub trait PlaylistSource {
    async fn next_page(&mut self) -> Result<Option<Vec<PlaylistTrackItem>>, ScoutError>;
}

/// Counts of one drained playlist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainStats {
    pub items: usize,
    pub skipped: usize,
}

/// Feeds every identity of `source` into `builder`.
pub async fn drain_exclusions<S: PlaylistSource>(
    source: &mut S,
    builder: &mut ExclusionSetBuilder,
) -> Result<DrainStats, ScoutError> {
    let mut stats = DrainStats::default();

    while let Some(page) = source.next_page().await? {
        for item in &page {
            stats.items += 1;
            match TrackIdentity::from_item(item) {
                Some(identity) => {
                    builder.add(identity);
                }
                None => stats.skipped += 1,
            }
        }
    }

    builder.finish_playlist();
    Ok(stats)
}

/// Offers every record of `source` to `aggregator`, page by page.
///
/// A broken `added_at` aborts immediately; the aggregator is then only
/// partially fed and must be thrown away.
pub async fn drain_source<S: PlaylistSource>(
    source: &mut S,
    aggregator: &mut TopKAggregator,
) -> Result<DrainStats, ScoutError> {
    let mut stats = DrainStats::default();

    while let Some(page) = source.next_page().await? {
        for item in &page {
            stats.items += 1;
            match TrackRecord::from_item(item)? {
                Some(record) => {
                    aggregator.offer(record);
                }
                None => stats.skipped += 1,
            }
        }
    }

    Ok(stats)
}
