/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_core::SourceError;
use bridge_core::sources::{CommentPublisher, RevisionSource};
use bridge_core::types::{Revision, RevisionId, User};
use mockall::mock;

mock! {
    pub Revisions {}

    #[async_trait]
    impl RevisionSource for Revisions {
        async fn load_revision(&self, revision_id: RevisionId) -> Result<Revision, SourceError>;
    }
}

mock! {
    pub Publisher {}

    #[async_trait]
    impl CommentPublisher for Publisher {
        async fn find_user(&self, username: &str) -> Result<Option<User>, SourceError>;

        async fn post_comment(
            &self,
            revision: &Revision,
            author: &User,
            content: &str,
        ) -> Result<(), SourceError>;
    }
}

pub fn revision(active_diff: Option<u64>) -> Revision {
    Revision {
        id: 4,
        phid: "PHID-DREV-4".to_string(),
        title: "Count things".to_string(),
        summary: String::new(),
        author: None,
        repository: None,
        active_diff,
    }
}

pub fn bot() -> User {
    User {
        phid: "PHID-USER-BOT".to_string(),
        username: "changesbot".to_string(),
    }
}

pub fn viewer() -> User {
    User {
        phid: "PHID-USER-1".to_string(),
        username: "jane".to_string(),
    }
}
