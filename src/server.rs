use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{api, error::ScoutError, types::PkceToken};

pub fn router(state: Arc<Mutex<Option<PkceToken>>>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

/// Serves the OAuth callback on an already bound listener until aborted.
pub async fn start_api_server(
    listener: TcpListener,
    state: Arc<Mutex<Option<PkceToken>>>,
) -> Result<(), ScoutError> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}
