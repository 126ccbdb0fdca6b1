use super::{exclusion::ExclusionSet, track::TrackRecord};

/// What [`TopKAggregator::offer`] did with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// Record was kept (it may still be evicted by newer ones later).
    Accepted,
    /// Kept list is full and the record is not newer than its oldest entry.
    Stale,
    /// Identity is excluded or was already selected.
    Excluded,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub accepted: usize,
    pub stale: usize,
    pub excluded: usize,
    pub evicted: usize,
}

/// Streaming top-K selection of the most recently added unique tracks.
///
/// Records are offered one by one; the aggregator only ever holds `capacity`
/// of them. Every accepted identity is added to the exclusion set, so the
/// same track can't be picked twice even when a later playlist lists it
/// under another catalog id.
#[derive(Debug)]
pub struct TopKAggregator {
    capacity: usize,
    // sorted by added_at, newest first; equal timestamps keep arrival order
    kept: Vec<TrackRecord>,
    exclusion: ExclusionSet,
    stats: AggregateStats,
}

impl TopKAggregator {
    pub fn new(exclusion: ExclusionSet, capacity: usize) -> Self {
        Self {
            capacity,
            kept: Vec::with_capacity(capacity.min(1024) + 1),
            exclusion,
            stats: AggregateStats::default(),
        }
    }

    pub fn offer(&mut self, record: TrackRecord) -> Offer {
        if self.is_stale(&record) {
            self.stats.stale += 1;
            return Offer::Stale;
        }

        if self.exclusion.contains(record.identity()) {
            self.stats.excluded += 1;
            return Offer::Excluded;
        }

        self.exclusion.insert(record.identity().clone());

        // behind every entry that is at least as new, which keeps ties stable
        let at = self
            .kept
            .partition_point(|kept| kept.added_at() >= record.added_at());
        self.kept.insert(at, record);
        if self.kept.len() > self.capacity {
            self.kept.pop();
            self.stats.evicted += 1;
        }

        self.stats.accepted += 1;
        Offer::Accepted
    }

    /// Offers every record of one playlist, stopping at the first error.
    pub fn offer_all<I, E>(&mut self, records: I) -> Result<(), E>
    where
        I: IntoIterator<Item = Result<TrackRecord, E>>,
    {
        for record in records {
            self.offer(record?);
        }
        Ok(())
    }

    pub fn kept(&self) -> &[TrackRecord] {
        &self.kept
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> AggregateStats {
        self.stats
    }

    pub fn exclusion(&self) -> &ExclusionSet {
        &self.exclusion
    }

    /// Final selection, newest first.
    pub fn finish(self) -> Vec<TrackRecord> {
        self.kept
    }

    /// Final selection plus the exclusion set grown during the run.
    pub fn into_parts(self) -> (Vec<TrackRecord>, ExclusionSet) {
        (self.kept, self.exclusion)
    }

    fn is_stale(&self, record: &TrackRecord) -> bool {
        if self.capacity == 0 {
            return true;
        }
        self.kept.len() >= self.capacity
            && self
                .kept
                .last()
                .is_some_and(|oldest| record.added_at() <= oldest.added_at())
    }
}

/// Runs a whole aggregation over already decoded playlists.
///
/// Playlists are consumed in the given order and each one to exhaustion
/// before the next. The first error aborts the run and no partial result is
/// returned.
pub fn aggregate<P, I, E>(
    source_playlists: P,
    exclusion: ExclusionSet,
    capacity: usize,
) -> Result<Vec<TrackRecord>, E>
where
    P: IntoIterator<Item = I>,
    I: IntoIterator<Item = Result<TrackRecord, E>>,
{
    let mut aggregator = TopKAggregator::new(exclusion, capacity);
    for playlist in source_playlists {
        aggregator.offer_all(playlist)?;
    }
    Ok(aggregator.finish())
}
