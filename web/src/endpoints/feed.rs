/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::WebState;
use crate::error::{WebError, WebResult};
use axum::extract::{Json, State};
use axum::extract::rejection::JsonRejection;
use bridge_core::types::BaseResponse;
use feed::{FeedContext, FeedStory, publish_story};
use std::sync::Arc;

pub async fn post_feed(
    state: State<Arc<WebState>>,
    body: Result<Json<FeedStory>, JsonRejection>,
) -> WebResult<Json<BaseResponse<usize>>> {
    let Json(story) = body.map_err(WebError::from)?;

    let ctx = FeedContext {
        changes: state.changes.as_ref(),
        revisions: state.server.revisions.as_ref(),
        comments: state.server.comments.as_ref(),
    };

    let handled = publish_story(&state.keywords, &story, &ctx).await?;

    Ok(Json(BaseResponse {
        error: false,
        message: handled,
    }))
}
