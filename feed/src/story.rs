/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use bridge_core::consts::REVISION_PHID_PREFIX;
use bridge_core::types::{RevisionId, User};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TransactionKind {
    #[serde(rename = "core:comment", alias = "comment")]
    Comment,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    pub comment: Option<String>,
}

/// A feed story as pushed by the review platform. The first transaction is
/// the primary one.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedStory {
    pub object_phid: String,
    #[serde(default)]
    pub object_id: Option<RevisionId>,
    #[serde(default)]
    pub author_phid: Option<String>,
    #[serde(default)]
    pub author_username: Option<String>,
    #[serde(default)]
    pub transactions: Vec<FeedTransaction>,
}

impl FeedStory {
    pub fn revision_id(&self) -> Option<RevisionId> {
        if self.object_phid.starts_with(REVISION_PHID_PREFIX) {
            self.object_id
        } else {
            None
        }
    }

    pub fn comment(&self) -> Option<&str> {
        self.transactions
            .first()
            .filter(|primary| primary.kind == TransactionKind::Comment)
            .and_then(|primary| primary.comment.as_deref())
            .filter(|comment| !comment.is_empty())
    }

    pub fn viewer(&self) -> User {
        User {
            phid: self.author_phid.clone().unwrap_or_default(),
            username: self.author_username.clone().unwrap_or_default(),
        }
    }
}
