use reqwest::Client;
use tabled::Table;

use crate::{
    error,
    management::TokenManager,
    spotify::{self, playlist::PLAYLISTS_PAGE_SIZE},
    success,
    types::UserPlaylist,
    utils,
};

/// Lists the current user's playlists.
///
/// Prints a table and, below it, one JSON reference per playlist that can be
/// copied into the `sources` or `excludes` of `scout.json`.
pub async fn playlists(search: Option<String>) {
    let mut token_mgr = match TokenManager::load().await {
        Ok(t) => t,
        Err(e) => error!("Failed to load token: {}", e),
    };

    let client = Client::new();
    let mut playlists: Vec<UserPlaylist> = Vec::new();
    let mut offset = 0;

    loop {
        let token = match token_mgr.get_valid_token().await {
            Ok(t) => t,
            Err(e) => error!("Failed to refresh token: {}", e),
        };

        let page = match spotify::playlist::get_user_playlists(
            &client,
            &token,
            PLAYLISTS_PAGE_SIZE,
            offset,
        )
        .await
        {
            Ok(page) => page,
            Err(e) => error!("Failed to fetch playlists: {}", e),
        };

        let fetched = page.items.len();
        playlists.extend(page.items);

        offset += PLAYLISTS_PAGE_SIZE;
        if fetched == 0 || offset >= page.total {
            break;
        }
    }

    let total = playlists.len();
    if let Some(term) = search {
        let term = term.to_lowercase();
        playlists.retain(|p| p.name.to_lowercase().contains(&term));
    }

    println!("{}", Table::new(utils::playlist_table_rows(&playlists)));

    for playlist_ref in utils::playlist_refs(&playlists) {
        match serde_json::to_string(&playlist_ref) {
            Ok(line) => println!("{},", line),
            Err(e) => error!("Failed to format playlist reference: {}", e),
        }
    }

    success!("{} of {} playlists shown", playlists.len(), total);
}
