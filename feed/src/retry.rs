/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::keywords::{FeedContext, KeywordHandler};
use async_trait::async_trait;
use bridge_core::BridgeResult;
use bridge_core::consts::NO_ACTIVE_DIFF;
use bridge_core::types::{Revision, User};
use connector::retry::describe_retry;
use tracing::{debug, info, instrument, warn};

/// Restarts the builds of a revision's active diff and reports back with a
/// comment from the bot account.
pub struct RetryKeywordHandler;

#[async_trait]
impl KeywordHandler for RetryKeywordHandler {
    fn name(&self) -> &'static str {
        "retry"
    }

    #[instrument(skip_all, fields(revision_id = revision.id, viewer = %viewer.phid))]
    async fn run_on_object(
        &self,
        revision: &Revision,
        viewer: &User,
        ctx: &FeedContext<'_>,
    ) -> BridgeResult<()> {
        let Some(client) = ctx.changes else {
            debug!("Changes is not configured, ignoring retry");
            return Ok(());
        };

        let Some(bot_username) = client.config().bot_username.as_deref() else {
            debug!("No bot account configured, ignoring retry");
            return Ok(());
        };

        let Some(bot) = ctx.comments.find_user(bot_username).await? else {
            warn!(bot_username, "Bot account does not exist, ignoring retry");
            return Ok(());
        };

        let message = match revision.active_diff {
            None => NO_ACTIVE_DIFF.to_string(),
            Some(diff_id) => {
                let result = client.retry(diff_id).await;

                if let Err(e) = &result {
                    warn!(diff_id, error = %e, "Retry failed");
                }

                describe_retry(&result)
            }
        };

        ctx.comments.post_comment(revision, &bot, &message).await?;
        info!(message = %message, "Posted retry result");

        Ok(())
    }
}
