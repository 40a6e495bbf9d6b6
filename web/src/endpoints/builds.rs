/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::WebState;
use crate::error::WebResult;
use axum::extract::{Json, Path, State};
use bridge_core::types::{BaseResponse, DiffId, ServiceBuild};
use builder::{BuildContext, Buildable, execute_build};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
pub struct BuildTrigger {
    #[serde(default)]
    pub build_target: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BuildReport {
    pub effect: String,
    pub transcript: Vec<String>,
    pub builds: Vec<ServiceBuild>,
}

pub async fn post_diff_build(
    state: State<Arc<WebState>>,
    Path(diff_id): Path<DiffId>,
    body: Option<Json<BuildTrigger>>,
) -> WebResult<Json<BaseResponse<BuildReport>>> {
    let trigger = body.map(|Json(trigger)| trigger).unwrap_or_default();
    let server = &state.server;
    let diff = server.patches.load_diff(diff_id).await?;

    let ctx = BuildContext {
        client: state.changes.as_ref(),
        patches: server.patches.as_ref(),
        oracle: server.oracle.as_ref(),
        revisions: server.revisions.as_ref(),
        max_hops: server.cli.max_ancestry_hops,
    };

    let outcome = execute_build(&ctx, Buildable::Diff(diff), trigger.build_target).await;
    let effect = outcome.effect();

    if outcome.is_success() {
        info!(diff_id, "{}", effect);
    } else {
        warn!(diff_id, "{}", effect);
    }

    Ok(Json(BaseResponse {
        error: !outcome.is_success(),
        message: BuildReport {
            effect,
            transcript: outcome.transcript,
            builds: outcome.result.unwrap_or_default(),
        },
    }))
}
