/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use bridge_core::input::load_secret;
use bridge_core::types::{Cli, ServerState};
use clap::Parser;
use connector::conduit::ConduitClient;
use feed::KeywordTable;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use web::WebState;

fn init_state(cli: Cli) -> io::Result<Arc<ServerState>> {
    let token = load_secret(&cli.conduit_token_file);
    let conduit = Arc::new(
        ConduitClient::new(
            &cli.conduit_uri,
            token,
            Duration::from_secs(cli.request_timeout),
        )
        .map_err(io::Error::other)?,
    );

    Ok(Arc::new(ServerState {
        cli,
        patches: conduit.clone(),
        oracle: conduit.clone(),
        revisions: conduit.clone(),
        comments: conduit,
    }))
}

#[tokio::main]
pub async fn main() -> io::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Changes Bridge on {}:{}", cli.ip, cli.port);

    let state = init_state(cli)?;
    let keywords = KeywordTable::with_defaults().map_err(io::Error::other)?;

    web::serve_web(Arc::new(WebState::new(state, keywords))).await
}
