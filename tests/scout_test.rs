use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use scoutlist::ScoutError;
use scoutlist::scout::*;
use scoutlist::types::PlaylistTrackItem;
use serde_json::json;

// Helper function to create a playlist item the way Spotify returns it
fn item(id: Option<&str>, name: &str, artists: &[&str], added_at: Option<&str>) -> PlaylistTrackItem {
    serde_json::from_value(json!({
        "added_at": added_at,
        "track": {
            "id": id,
            "name": name,
            "artists": artists
                .iter()
                .map(|a| json!({ "id": a, "name": format!("Artist {}", a) }))
                .collect::<Vec<_>>(),
        }
    }))
    .unwrap()
}

// Helper function to create a record added at midnight of `date`
fn record(id: &str, name: &str, artists: &[&str], date: &str) -> TrackRecord {
    TrackRecord::from_item(&item(Some(id), name, artists, Some(date)))
        .unwrap()
        .unwrap()
}

fn ok_stream(records: Vec<TrackRecord>) -> Vec<Result<TrackRecord, ScoutError>> {
    records.into_iter().map(Ok).collect()
}

fn ids(records: &[TrackRecord]) -> Vec<&str> {
    records.iter().map(|r| r.track_id()).collect()
}

#[test]
fn test_identity_ignores_artist_order_and_track_id() {
    let a = TrackIdentity::from_item(&item(Some("id1"), "Song", &["a1", "a2"], None)).unwrap();
    let b = TrackIdentity::from_item(&item(Some("id2"), "Song", &["a2", "a1"], None)).unwrap();
    assert_eq!(a, b);

    let mut set = HashSet::new();
    set.insert(a);
    assert!(set.contains(&b));
}

#[test]
fn test_identity_differs_by_name_or_artists() {
    let base = TrackIdentity::new("Song", ["a1"]);
    assert_ne!(base, TrackIdentity::new("Song (Remix)", ["a1"]));
    assert_ne!(base, TrackIdentity::new("Song", ["a1", "a2"]));
    assert_ne!(base, TrackIdentity::new("song", ["a1"]));
}

#[test]
fn test_identity_collapses_repeated_artists() {
    let identity = TrackIdentity::new("Song", ["a1", "a1", "a2"]);
    assert_eq!(identity.artist_ids().len(), 2);
    assert_eq!(identity, TrackIdentity::new("Song", ["a2", "a1"]));
}

#[test]
fn test_unplayable_items_are_skipped() {
    // local file: no track id
    let local = item(None, "Local", &["a1"], Some("2020-01-01T00:00:00Z"));
    assert!(TrackIdentity::from_item(&local).is_none());
    assert!(TrackRecord::from_item(&local).unwrap().is_none());

    // removed track
    let removed: PlaylistTrackItem =
        serde_json::from_value(json!({ "added_at": "2020-01-01T00:00:00Z", "track": null }))
            .unwrap();
    assert!(TrackRecord::from_item(&removed).unwrap().is_none());

    // no usable artist id
    let anonymous: PlaylistTrackItem = serde_json::from_value(json!({
        "added_at": "2020-01-01T00:00:00Z",
        "track": { "id": "id1", "name": "Anon", "artists": [{ "id": null, "name": "?" }] }
    }))
    .unwrap();
    assert!(TrackIdentity::from_item(&anonymous).is_none());
}

#[test]
fn test_record_requires_valid_timestamp() {
    let broken = item(Some("id1"), "Song", &["a1"], Some("yesterday"));
    match TrackRecord::from_item(&broken) {
        Err(ScoutError::Timestamp { track_id, value }) => {
            assert_eq!(track_id, "id1");
            assert_eq!(value, "yesterday");
        }
        other => panic!("expected timestamp error, got {:?}", other),
    }

    let missing = item(Some("id1"), "Song", &["a1"], None);
    assert!(matches!(
        TrackRecord::from_item(&missing),
        Err(ScoutError::MissingTimestamp(_))
    ));
}

#[test]
fn test_record_keeps_payload() {
    let r = record("id1", "Song", &["a1", "a2"], "2020-01-02T03:04:05Z");
    assert_eq!(r.track_id(), "id1");
    assert_eq!(r.uri(), "spotify:track:id1");
    assert_eq!(r.artists(), ["Artist a1", "Artist a2"]);
    assert_eq!(r.identity(), &TrackIdentity::new("Song", ["a1", "a2"]));
    assert_eq!(
        r.added_at(),
        Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap()
    );
}

#[test]
fn test_parse_added_at_formats() {
    let expected = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
    assert_eq!(parse_added_at("2020-01-02T03:04:05Z"), Some(expected));
    assert_eq!(parse_added_at("2020-01-02T05:04:05+02:00"), Some(expected));
    assert_eq!(parse_added_at("2020-01-02T03:04:05"), Some(expected));
    assert_eq!(parse_added_at("2020-01-02 03:04:05"), Some(expected));
    assert_eq!(
        parse_added_at("2020-01-02"),
        Some(Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap())
    );
    assert_eq!(parse_added_at("not a date"), None);
    assert_eq!(parse_added_at(""), None);
}

#[test]
fn test_build_exclusion_set_unions_playlists() {
    let p1 = vec![TrackIdentity::new("X", ["a1"]), TrackIdentity::new("Y", ["a2"])];
    let p2 = vec![TrackIdentity::new("X", ["a1"]), TrackIdentity::new("Z", ["a3"])];

    let set = build_exclusion_set(vec![p1.clone(), p2.clone()]);
    assert_eq!(set.len(), 3);
    assert!(set.contains(&TrackIdentity::new("Z", ["a3"])));
    assert_eq!(set.iter().filter(|i| i.name() == "X").count(), 1);

    // order of playlists does not matter
    assert_eq!(set, build_exclusion_set(vec![p2, p1]));
}

#[test]
fn test_exclusion_builder_counts_playlists() {
    let mut builder = ExclusionSetBuilder::new();
    builder
        .add(TrackIdentity::new("X", ["a1"]))
        .add(TrackIdentity::new("X", ["a1"]))
        .finish_playlist()
        .add_playlist(vec![TrackIdentity::new("Y", ["a2"])]);

    assert_eq!(builder.playlists(), 2);
    let set = builder.build();
    assert_eq!(set.len(), 2);
    assert!(!set.is_empty());
}

#[test]
fn test_scenario_a_keeps_most_recent() {
    let source = ok_stream(vec![
        record("T1", "One", &["a1"], "2020-01-01"),
        record("T2", "Two", &["a1"], "2020-01-03"),
        record("T3", "Three", &["a1"], "2020-01-02"),
    ]);

    let result = aggregate(vec![source], ExclusionSet::new(), 2).unwrap();
    assert_eq!(ids(&result), ["T2", "T3"]);
}

#[test]
fn test_scenario_b_excludes_by_identity() {
    let exclusion = build_exclusion_set(vec![
        vec![TrackIdentity::new("X", ["a1"])],
        vec![TrackIdentity::new("X", ["a1"])],
    ]);
    let source = ok_stream(vec![
        record("other-id", "X", &["a1"], "2020-01-05"),
        record("Y1", "Y", &["a1"], "2020-01-01"),
    ]);

    let result = aggregate(vec![source], exclusion, 10).unwrap();
    assert_eq!(ids(&result), ["Y1"]);
}

#[test]
fn test_scenario_c_later_playlist_evicts() {
    let mut aggregator = TopKAggregator::new(ExclusionSet::new(), 1);

    aggregator
        .offer_all(ok_stream(vec![record("T_old", "Old", &["a1"], "2020-01-01")]))
        .unwrap();
    assert_eq!(ids(aggregator.kept()), ["T_old"]);

    aggregator
        .offer_all(ok_stream(vec![record("T_new", "New", &["a2"], "2020-01-05")]))
        .unwrap();
    assert_eq!(ids(aggregator.kept()), ["T_new"]);
    assert_eq!(aggregator.stats().evicted, 1);
    assert_eq!(aggregator.capacity(), 1);
    // the evicted identity stays excluded
    assert_eq!(aggregator.exclusion().len(), 2);
}

#[test]
fn test_scenario_d_null_id_never_selected() {
    let items = vec![
        item(None, "Local", &["a1"], Some("2030-01-01T00:00:00Z")),
        item(Some("T1"), "Song", &["a1"], Some("2020-01-01T00:00:00Z")),
    ];
    let records: Vec<Result<TrackRecord, ScoutError>> = items
        .iter()
        .filter_map(|i| TrackRecord::from_item(i).transpose())
        .collect();

    let (result, exclusion) = {
        let mut aggregator = TopKAggregator::new(ExclusionSet::new(), 5);
        aggregator.offer_all(records).unwrap();
        aggregator.into_parts()
    };

    assert_eq!(ids(&result), ["T1"]);
    assert_eq!(exclusion.len(), 1);
    assert!(!exclusion.contains(&TrackIdentity::new("Local", ["a1"])));
}

#[test]
fn test_duplicates_across_playlists_are_selected_once() {
    let p1 = ok_stream(vec![record("single", "Hit", &["a1"], "2020-01-01")]);
    let p2 = ok_stream(vec![
        record("album", "Hit", &["a1"], "2020-02-01"),
        record("other", "B-Side", &["a1"], "2020-01-15"),
    ]);

    let result = aggregate(vec![p1, p2], ExclusionSet::new(), 10).unwrap();
    // first sighting wins even though the album copy is newer
    assert_eq!(ids(&result), ["other", "single"]);
}

#[test]
fn test_offer_reports_outcome() {
    let mut aggregator = TopKAggregator::new(
        build_exclusion_set(vec![vec![TrackIdentity::new("X", ["a1"])]]),
        1,
    );

    assert_eq!(
        aggregator.offer(record("1", "X", &["a1"], "2020-01-03")),
        Offer::Excluded
    );
    assert_eq!(
        aggregator.offer(record("2", "Y", &["a1"], "2020-01-02")),
        Offer::Accepted
    );
    assert_eq!(
        aggregator.offer(record("3", "Z", &["a1"], "2020-01-01")),
        Offer::Stale
    );
    assert_eq!(
        aggregator.offer(record("4", "Y", &["a1"], "2020-01-05")),
        Offer::Excluded
    );

    let stats = aggregator.stats();
    assert_eq!((stats.accepted, stats.excluded, stats.stale), (1, 2, 1));
}

#[test]
fn test_equal_timestamps_prefer_first_seen() {
    let result = aggregate(
        vec![ok_stream(vec![
            record("A", "A", &["a1"], "2020-01-01"),
            record("B", "B", &["a1"], "2020-01-01"),
        ])],
        ExclusionSet::new(),
        1,
    )
    .unwrap();
    assert_eq!(ids(&result), ["A"]);

    // a newer track pushes out the later of two tied ones
    let result = aggregate(
        vec![ok_stream(vec![
            record("A", "A", &["a1"], "2020-01-01"),
            record("B", "B", &["a1"], "2020-01-01"),
            record("C", "C", &["a1"], "2020-01-02"),
        ])],
        ExclusionSet::new(),
        2,
    )
    .unwrap();
    assert_eq!(ids(&result), ["C", "A"]);

    // ties stay in arrival order inside the kept list
    let result = aggregate(
        vec![ok_stream(vec![
            record("A", "A", &["a1"], "2020-01-01"),
            record("B", "B", &["a1"], "2020-01-01"),
            record("C", "C", &["a1"], "2020-01-01"),
        ])],
        ExclusionSet::new(),
        5,
    )
    .unwrap();
    assert_eq!(ids(&result), ["A", "B", "C"]);
}

#[test]
fn test_zero_capacity_is_empty() {
    let mut aggregator = TopKAggregator::new(ExclusionSet::new(), 0);
    assert_eq!(
        aggregator.offer(record("1", "X", &["a1"], "2020-01-01")),
        Offer::Stale
    );
    let (result, exclusion) = aggregator.into_parts();
    assert!(result.is_empty());
    assert!(exclusion.is_empty());
}

#[test]
fn test_error_aborts_aggregation() {
    let source: Vec<Result<TrackRecord, ScoutError>> = vec![
        Ok(record("1", "X", &["a1"], "2020-01-01")),
        Err(ScoutError::MissingTimestamp("2".to_string())),
        Ok(record("3", "Y", &["a1"], "2020-01-02")),
    ];

    let result = aggregate(vec![source], ExclusionSet::new(), 5);
    assert!(matches!(result, Err(ScoutError::MissingTimestamp(id)) if id == "2"));
}

// Deterministic pseudo random playlists for the property checks below
fn generated_playlists(seed: u64, playlists: usize, tracks: usize) -> Vec<Vec<TrackRecord>> {
    let mut state = seed;
    let mut next = move |bound: u64| {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) % bound
    };

    (0..playlists)
        .map(|p| {
            (0..tracks)
                .map(|t| {
                    let name = format!("song{}", next(40));
                    let artist = format!("artist{}", next(5));
                    let day = 1 + next(28);
                    record(
                        &format!("p{}t{}", p, t),
                        &name,
                        &[artist.as_str()],
                        &format!("2021-02-{:02}", day),
                    )
                })
                .collect()
        })
        .collect()
}

fn run(playlists: &[Vec<TrackRecord>], exclusion: ExclusionSet, k: usize) -> Vec<TrackRecord> {
    aggregate(
        playlists.iter().map(|p| ok_stream(p.clone())),
        exclusion,
        k,
    )
    .unwrap()
}

#[test]
fn test_aggregate_properties() {
    for seed in 0..20 {
        let playlists = generated_playlists(seed, 3, 60);
        let seed_set = build_exclusion_set(vec![playlists[0]
            .iter()
            .take(5)
            .map(|r| r.identity().clone())
            .collect::<Vec<_>>()]);

        for k in [0, 1, 3, 10, 1000] {
            let result = run(&playlists, seed_set.clone(), k);

            // capacity bound
            assert!(result.len() <= k);

            // non-increasing recency
            assert!(result.windows(2).all(|w| w[0].added_at() >= w[1].added_at()));

            // unique identities, none from the seed
            let identities: HashSet<_> = result.iter().map(|r| r.identity().clone()).collect();
            assert_eq!(identities.len(), result.len());
            assert!(identities.iter().all(|i| !seed_set.contains(i)));

            // rerunning with the selection excluded picks none of it again
            let mut reseeded = seed_set.clone();
            reseeded.extend(identities.iter().cloned());
            let again = run(&playlists, reseeded, k);
            assert!(
                again
                    .iter()
                    .all(|r| !identities.contains(r.identity()))
            );
        }
    }
}

#[test]
fn test_rerun_with_grown_exclusion_set_is_empty() {
    let playlists = generated_playlists(7, 2, 50);

    let mut aggregator = TopKAggregator::new(ExclusionSet::new(), 1000);
    for playlist in &playlists {
        aggregator.offer_all(ok_stream(playlist.clone())).unwrap();
    }
    let (first, exclusion) = aggregator.into_parts();
    assert!(!first.is_empty());

    // with unbounded capacity every distinct identity was accepted once
    assert!(run(&playlists, exclusion, 1000).is_empty());
}

#[test]
fn test_matches_full_sort_reference() {
    for seed in 0..10 {
        let playlists = generated_playlists(seed, 2, 40);
        let k = 7;

        // reference: first occurrence of each identity, stable sort, take k.
        // Only valid when no identity repeats, so dedupe the input first.
        let mut seen = HashSet::new();
        let unique: Vec<TrackRecord> = playlists
            .iter()
            .flatten()
            .filter(|r| seen.insert(r.identity().clone()))
            .cloned()
            .collect();
        let mut expected = unique.clone();
        expected.sort_by(|a, b| b.added_at().cmp(&a.added_at()));
        expected.truncate(k);

        let result = run(&[unique], ExclusionSet::new(), k);
        assert_eq!(ids(&result), ids(&expected));
    }
}
