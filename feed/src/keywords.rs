/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::retry::RetryKeywordHandler;
use async_trait::async_trait;
use bridge_core::BridgeResult;
use bridge_core::consts::RETRY_KEYWORD;
use bridge_core::sources::{CommentPublisher, RevisionSource};
use bridge_core::types::{Revision, User};
use connector::ChangesClient;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, warn};

/// Collaborators available to keyword handlers.
pub struct FeedContext<'a> {
    /// `None` when no build service is configured.
    pub changes: Option<&'a ChangesClient>,
    pub revisions: &'a dyn RevisionSource,
    pub comments: &'a dyn CommentPublisher,
}

#[async_trait]
pub trait KeywordHandler: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run_on_object(
        &self,
        revision: &Revision,
        viewer: &User,
        ctx: &FeedContext<'_>,
    ) -> BridgeResult<()>;
}

struct KeywordEntry {
    pattern: Regex,
    handler: Arc<dyn KeywordHandler>,
}

/// Ordered `(pattern, handler)` pairs tried against every comment.
#[derive(Default)]
pub struct KeywordTable {
    entries: Vec<KeywordEntry>,
}

impl KeywordTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Result<Self, regex::Error> {
        let mut table = Self::new();
        table.register(RETRY_KEYWORD, Arc::new(RetryKeywordHandler))?;
        Ok(table)
    }

    pub fn register(
        &mut self,
        pattern: &str,
        handler: Arc<dyn KeywordHandler>,
    ) -> Result<(), regex::Error> {
        self.entries.push(KeywordEntry {
            pattern: Regex::new(pattern)?,
            handler,
        });

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn matches(&self, comment: &str) -> bool {
        self.entries.iter().any(|entry| entry.pattern.is_match(comment))
    }

    /// Runs every handler whose pattern matches `comment`, in registration
    /// order. Handler failures are logged and do not stop later handlers.
    pub async fn dispatch(
        &self,
        comment: &str,
        revision: &Revision,
        viewer: &User,
        ctx: &FeedContext<'_>,
    ) -> usize {
        let mut ran = 0;

        for entry in self
            .entries
            .iter()
            .filter(|entry| entry.pattern.is_match(comment))
        {
            debug!(handler = entry.handler.name(), revision_id = revision.id, "Keyword matched");
            ran += 1;

            if let Err(e) = entry.handler.run_on_object(revision, viewer, ctx).await {
                warn!(handler = entry.handler.name(), error = %e, "Keyword handler failed");
            }
        }

        ran
    }
}
