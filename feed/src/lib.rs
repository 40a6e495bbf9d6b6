/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod keywords;
pub mod retry;
pub mod story;

pub use keywords::{FeedContext, KeywordHandler, KeywordTable};
pub use retry::RetryKeywordHandler;
pub use story::{FeedStory, FeedTransaction, TransactionKind};

use bridge_core::BridgeResult;
use tracing::{debug, instrument};

/// Hands a feed story to the keyword table. Only comment stories on
/// revisions get that far; the revision is loaded only when some keyword
/// matches. Returns the number of handlers that ran.
#[instrument(skip_all, fields(object = %story.object_phid))]
pub async fn publish_story(
    table: &KeywordTable,
    story: &FeedStory,
    ctx: &FeedContext<'_>,
) -> BridgeResult<usize> {
    let Some(revision_id) = story.revision_id() else {
        debug!("Story is not about a revision");
        return Ok(0);
    };

    let Some(comment) = story.comment() else {
        debug!(revision_id, "Story carries no comment");
        return Ok(0);
    };

    if !table.matches(comment) {
        return Ok(0);
    }

    let revision = ctx.revisions.load_revision(revision_id).await?;

    Ok(table
        .dispatch(comment, &revision, &story.viewer(), ctx)
        .await)
}
