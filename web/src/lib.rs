/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

mod endpoints;
pub mod error;
pub mod status;

use axum::Router;
use axum::routing::{get, post};
use bridge_core::types::ServerState;
use connector::ChangesClient;
use feed::KeywordTable;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared state of the HTTP surface.
pub struct WebState {
    pub server: Arc<ServerState>,
    /// `None` when no build service is configured.
    pub changes: Option<ChangesClient>,
    pub keywords: KeywordTable,
}

impl WebState {
    pub fn new(server: Arc<ServerState>, keywords: KeywordTable) -> Self {
        let changes = match server.changes_config() {
            Ok(config) => match ChangesClient::new(config) {
                Ok(client) => Some(client),
                Err(e) => {
                    warn!(error = %e, "Could not create build service client");
                    None
                }
            },
            Err(e) => {
                warn!(reason = %e, "Build service is not configured");
                None
            }
        };

        Self {
            server,
            changes,
            keywords,
        }
    }
}

pub fn create_router(state: Arc<WebState>) -> Router {
    Router::new()
        .route("/changes/inline", get(endpoints::inline::get_inline))
        .route(
            "/api/v1/diffs/{diff_id}/build",
            post(endpoints::builds::post_diff_build),
        )
        .route("/api/v1/feed", post(endpoints::feed::post_feed))
        .route("/api/health", get(endpoints::get_health))
        .fallback(endpoints::handle_404)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve_web(state: Arc<WebState>) -> std::io::Result<()> {
    let server_url = format!("{}:{}", state.server.cli.ip, state.server.cli.port);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&server_url).await?;
    info!(address = %server_url, "Listening");

    axum::serve(listener, app).await
}
