use std::collections::HashSet;

use super::track::TrackIdentity;

/// Identities that must not end up in a scoutlist.
///
/// Seeded from the exclude playlists, then grown by
/// [`TopKAggregator`](super::TopKAggregator) with every track it accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    identities: HashSet<TrackIdentity>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the identity was not yet excluded.
    pub fn insert(&mut self, identity: TrackIdentity) -> bool {
        self.identities.insert(identity)
    }

    pub fn contains(&self, identity: &TrackIdentity) -> bool {
        self.identities.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackIdentity> {
        self.identities.iter()
    }
}

impl FromIterator<TrackIdentity> for ExclusionSet {
    fn from_iter<T: IntoIterator<Item = TrackIdentity>>(iter: T) -> Self {
        Self {
            identities: iter.into_iter().collect(),
        }
    }
}

impl Extend<TrackIdentity> for ExclusionSet {
    fn extend<T: IntoIterator<Item = TrackIdentity>>(&mut self, iter: T) {
        self.identities.extend(iter);
    }
}

/// Collects the identities of the exclude playlists.
///
/// Playlists may be fed whole with [`add_playlist`](Self::add_playlist) or
/// one track at a time with [`add`](Self::add) while pages arrive.
#[derive(Debug, Default)]
pub struct ExclusionSetBuilder {
    set: ExclusionSet,
    playlists: usize,
}

impl ExclusionSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, identity: TrackIdentity) -> &mut Self {
        self.set.insert(identity);
        self
    }

    pub fn add_playlist<I>(&mut self, tracks: I) -> &mut Self
    where
        I: IntoIterator<Item = TrackIdentity>,
    {
        self.set.extend(tracks);
        self.finish_playlist()
    }

    /// Marks the end of one exclude playlist fed through [`add`](Self::add).
    pub fn finish_playlist(&mut self) -> &mut Self {
        self.playlists += 1;
        self
    }

    pub fn playlists(&self) -> usize {
        self.playlists
    }

    pub fn build(self) -> ExclusionSet {
        self.set
    }
}

/// Union of the identities of all given playlists.
pub fn build_exclusion_set<P, I>(exclude_playlists: P) -> ExclusionSet
where
    P: IntoIterator<Item = I>,
    I: IntoIterator<Item = TrackIdentity>,
{
    let mut builder = ExclusionSetBuilder::new();
    for playlist in exclude_playlists {
        builder.add_playlist(playlist);
    }
    builder.build()
}
