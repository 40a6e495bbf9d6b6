/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::WebState;
use crate::error::{WebError, WebResult};
use crate::status::{RenderedStatus, render};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Json, Query, State};
use bridge_core::consts::{NO_BUILDS_FOUND, NOT_CONFIGURED_MESSAGE};
use bridge_core::types::{BaseResponse, BuildStatusEntry, DiffId, RevisionId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct InlineQuery {
    pub revision_id: RevisionId,
    pub diff_id: DiffId,
}

#[derive(Debug, Serialize)]
pub struct InlineStatus {
    pub note: Option<String>,
    pub builds: Vec<RenderedStatus>,
}

impl InlineStatus {
    fn note(note: &str) -> Self {
        Self {
            note: Some(note.to_string()),
            builds: Vec::new(),
        }
    }
}

pub async fn get_inline(
    state: State<Arc<WebState>>,
    query: Result<Query<InlineQuery>, QueryRejection>,
) -> WebResult<Json<BaseResponse<InlineStatus>>> {
    let Query(query) = query.map_err(|e| WebError::BadRequest(e.body_text()))?;

    let Some(client) = &state.changes else {
        return Ok(Json(BaseResponse {
            error: false,
            message: InlineStatus::note(NOT_CONFIGURED_MESSAGE),
        }));
    };

    let entries = client
        .inline_builds(query.revision_id, query.diff_id)
        .await?
        .into_iter()
        .map(BuildStatusEntry::from)
        .collect::<Vec<_>>();

    if entries.is_empty() {
        return Ok(Json(BaseResponse {
            error: false,
            message: InlineStatus::note(NO_BUILDS_FOUND),
        }));
    }

    let builds = render(&entries)
        .into_iter()
        .map(|mut status| {
            status.href = status
                .build_id
                .as_deref()
                .map(|build_id| client.config().build_link(query.revision_id, build_id));
            status
        })
        .collect();

    Ok(Json(BaseResponse {
        error: false,
        message: InlineStatus { note: None, builds },
    }))
}
