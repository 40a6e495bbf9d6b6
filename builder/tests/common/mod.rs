/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_core::SourceError;
use bridge_core::sources::*;
use bridge_core::types::*;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory diff graph standing in for the review platform.
#[derive(Default)]
pub struct FakeGraph {
    pub diffs: Vec<Diff>,
    pub raw: HashMap<DiffId, String>,
    pub landed: HashSet<String>,
    pub revisions: HashMap<RevisionId, Revision>,
    pub landed_checks: AtomicUsize,
}

impl FakeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a diff with a single local commit `head` on top of `base`.
    pub fn with_diff(mut self, id: DiffId, head: &str, base: &str) -> Self {
        self.diffs.push(Diff {
            id,
            revision_id: Some(id * 10),
            base_revision: Some(base.to_string()),
            local_commits: vec![LocalCommit {
                commit: head.to_string(),
                parents: vec![base.to_string()],
                time: id as i64,
            }],
        });
        self.raw.insert(id, format!("patch-{}\n", id));
        self
    }

    pub fn with_landed(mut self, commit: &str) -> Self {
        self.landed.insert(commit.to_string());
        self
    }

    pub fn with_revision(mut self, revision: Revision) -> Self {
        self.revisions.insert(revision.id, revision);
        self
    }

    pub fn diff(&self, id: DiffId) -> Diff {
        self.diffs.iter().find(|d| d.id == id).cloned().unwrap()
    }

    pub fn checks(&self) -> usize {
        self.landed_checks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PatchSource for FakeGraph {
    async fn load_diff(&self, diff_id: DiffId) -> Result<Diff, SourceError> {
        self.diffs
            .iter()
            .find(|d| d.id == diff_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("diff {}", diff_id)))
    }

    async fn raw_diff(&self, diff_id: DiffId) -> Result<String, SourceError> {
        self.raw
            .get(&diff_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("diff {}", diff_id)))
    }

    async fn diffs_with_commit(&self, commit: &str) -> Result<Vec<Diff>, SourceError> {
        Ok(self
            .diffs
            .iter()
            .filter(|d| d.local_commits.iter().any(|c| c.commit == commit))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RepositoryOracle for FakeGraph {
    async fn is_landed(&self, _repository: &Repository, commit: &str) -> Result<bool, SourceError> {
        self.landed_checks.fetch_add(1, Ordering::SeqCst);
        Ok(self.landed.contains(commit))
    }
}

#[async_trait]
impl RevisionSource for FakeGraph {
    async fn load_revision(&self, revision_id: RevisionId) -> Result<Revision, SourceError> {
        self.revisions
            .get(&revision_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("revision D{}", revision_id)))
    }
}

pub fn git_repository() -> Repository {
    Repository {
        phid: "PHID-REPO-1".to_string(),
        name: "server".to_string(),
        callsign: Some("SRV".to_string()),
        vcs: VcsKind::Git,
    }
}

pub fn revision(id: RevisionId) -> Revision {
    Revision {
        id,
        phid: format!("PHID-DREV-{}", id),
        title: "Teach the server to count".to_string(),
        summary: "@channel it counts now".to_string(),
        author: Some(Author {
            real_name: "Jane Doe".to_string(),
            email: Some("jane@example.com".to_string()),
        }),
        repository: Some(git_repository()),
        active_diff: None,
    }
}
