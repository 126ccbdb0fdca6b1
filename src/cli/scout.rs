use std::{path::PathBuf, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tabled::Table;

use crate::{
    config::ScoutConfig,
    error, info,
    management::TokenManager,
    scout::{ExclusionSetBuilder, TopKAggregator, TrackRecord, drain_exclusions, drain_source},
    spotify::{self, tracks::SpotifyPlaylistSource},
    success,
    types::PlaylistRef,
    utils, warning,
};

#[derive(Debug, Clone, Default)]
pub struct ScoutArgs {
    pub length: Option<usize>,
    pub config: Option<PathBuf>,
    pub sources: Vec<PlaylistRef>,
    pub excludes: Vec<PlaylistRef>,
    pub public: bool,
    pub dry_run: bool,
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

/// Builds a scoutlist.
///
/// Exclude playlists are read first, then the source playlists are fed
/// through the top-K aggregator in configured order. Unless `dry_run` is
/// set, a new playlist is created and filled with the selection, newest
/// track first.
pub async fn scout(args: ScoutArgs) {
    let cfg = match ScoutConfig::load(args.config.clone()).await {
        Ok(cfg) => cfg.merge(args.length, args.public, args.sources, args.excludes),
        Err(e) => error!("{}", e),
    };

    if cfg.sources.is_empty() {
        error!(
            "No source playlists configured. Add them to {} or pass --source owner:playlist_id",
            ScoutConfig::default_path().display()
        );
    }

    let mut token_mgr = match TokenManager::load().await {
        Ok(t) => t,
        Err(e) => error!("Failed to load token: {}", e),
    };

    let client = Client::new();
    let tracks = select_tracks(&client, &mut token_mgr, &cfg).await;

    if args.dry_run {
        println!("{}", Table::new(utils::scout_table_rows(&tracks)));
        success!("{} tracks selected (dry run, nothing written)", tracks.len());
        return;
    }

    if tracks.is_empty() {
        warning!("No tracks left after exclusions, no playlist created.");
        return;
    }

    write_scoutlist(&client, &mut token_mgr, &cfg, &tracks).await;
}

async fn select_tracks(
    client: &Client,
    token_mgr: &mut TokenManager,
    cfg: &ScoutConfig,
) -> Vec<TrackRecord> {
    let pb = spinner();

    let mut builder = ExclusionSetBuilder::new();
    let mut skipped = 0;
    for playlist in &cfg.excludes {
        pb.set_message(format!(
            "Reading exclude playlist {}...",
            utils::playlist_label(playlist)
        ));
        let mut source = SpotifyPlaylistSource::new(client, token_mgr, playlist.clone(), false);
        match drain_exclusions(&mut source, &mut builder).await {
            Ok(stats) => skipped += stats.skipped,
            Err(e) => {
                pb.finish_and_clear();
                error!(
                    "Failed to read exclude playlist {}: {}",
                    utils::playlist_label(playlist),
                    e
                );
            }
        }
    }

    let exclusion = builder.build();
    pb.println(format!("Excluded tracks: {}", exclusion.len()));

    let mut aggregator = TopKAggregator::new(exclusion, cfg.length());
    let mut scanned = 0;
    for playlist in &cfg.sources {
        pb.set_message(format!(
            "Reading source playlist {}...",
            utils::playlist_label(playlist)
        ));
        let mut source = SpotifyPlaylistSource::new(client, token_mgr, playlist.clone(), true);
        match drain_source(&mut source, &mut aggregator).await {
            Ok(stats) => {
                scanned += stats.items;
                skipped += stats.skipped;
            }
            Err(e) => {
                pb.finish_and_clear();
                error!(
                    "Failed to read source playlist {}: {}",
                    utils::playlist_label(playlist),
                    e
                );
            }
        }
    }

    pb.finish_and_clear();

    let stats = aggregator.stats();
    info!(
        "Scanned {} tracks: {} kept, {} excluded or duplicate, {} too old",
        scanned,
        aggregator.kept().len(),
        stats.excluded,
        stats.stale + stats.evicted
    );
    if skipped > 0 {
        info!("Skipped {} local or unavailable tracks", skipped);
    }

    aggregator.finish()
}

async fn write_scoutlist(
    client: &Client,
    token_mgr: &mut TokenManager,
    cfg: &ScoutConfig,
    tracks: &[TrackRecord],
) {
    let user = match crate::config::spotify_user() {
        Ok(user) => user,
        Err(e) => error!("{}", e),
    };

    let token = match token_mgr.get_valid_token().await {
        Ok(t) => t,
        Err(e) => error!("Failed to refresh token: {}", e),
    };

    let name = utils::scoutlist_name_now();
    let playlist =
        match spotify::playlist::create(client, &token, &user, name.clone(), cfg.public).await {
            Ok(p) => p,
            Err(e) => error!("Failed to create playlist {}: {}", name, e),
        };
    success!("Created playlist {}", playlist.name);

    let uris: Vec<String> = tracks.iter().map(TrackRecord::uri).collect();
    for (position, batch) in utils::batches(&uris) {
        let token = match token_mgr.get_valid_token().await {
            Ok(t) => t,
            Err(e) => error!("Failed to refresh token: {}", e),
        };

        if let Err(e) =
            spotify::playlist::add_tracks(client, &token, &playlist.id, batch, position).await
        {
            error!(
                "Failed to add tracks {}..{} to {}: {}",
                position,
                position + batch.len(),
                playlist.name,
                e
            );
        }
    }

    success!("{} tracks added", uris.len());
}
