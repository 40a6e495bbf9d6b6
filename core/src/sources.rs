/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Read/write seams to the host review platform.

use async_trait::async_trait;

use super::error::SourceError;
use super::types::{Diff, DiffId, Repository, Revision, RevisionId, User};

#[async_trait]
pub trait PatchSource: Send + Sync {
    async fn load_diff(&self, diff_id: DiffId) -> Result<Diff, SourceError>;

    /// Raw unified diff text of a single diff.
    async fn raw_diff(&self, diff_id: DiffId) -> Result<String, SourceError>;

    /// Every diff, across all revisions, that mentions `commit` among its
    /// local commits.
    async fn diffs_with_commit(&self, commit: &str) -> Result<Vec<Diff>, SourceError>;
}

#[async_trait]
pub trait RepositoryOracle: Send + Sync {
    async fn is_landed(&self, repository: &Repository, commit: &str) -> Result<bool, SourceError>;
}

#[async_trait]
pub trait RevisionSource: Send + Sync {
    async fn load_revision(&self, revision_id: RevisionId) -> Result<Revision, SourceError>;
}

#[async_trait]
pub trait CommentPublisher: Send + Sync {
    async fn find_user(&self, username: &str) -> Result<Option<User>, SourceError>;

    async fn post_comment(
        &self,
        revision: &Revision,
        author: &User,
        content: &str,
    ) -> Result<(), SourceError>;
}
