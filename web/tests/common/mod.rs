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
use feed::KeywordTable;
use std::sync::{Arc, Mutex};
use web::WebState;

/// One revision (D4) with two stacked diffs on top of a landed `root`.
#[derive(Default)]
pub struct FakePlatform {
    pub comments: Mutex<Vec<String>>,
}

fn diff(id: DiffId, head: &str, base: &str) -> Diff {
    Diff {
        id,
        revision_id: Some(4),
        base_revision: Some(base.to_string()),
        local_commits: vec![LocalCommit {
            commit: head.to_string(),
            parents: vec![base.to_string()],
            time: id as i64,
        }],
    }
}

fn diffs() -> Vec<Diff> {
    vec![diff(11, "c1", "root"), diff(12, "c2", "c1")]
}

#[async_trait]
impl PatchSource for FakePlatform {
    async fn load_diff(&self, diff_id: DiffId) -> Result<Diff, SourceError> {
        diffs()
            .into_iter()
            .find(|d| d.id == diff_id)
            .ok_or_else(|| SourceError::NotFound(format!("diff {}", diff_id)))
    }

    async fn raw_diff(&self, diff_id: DiffId) -> Result<String, SourceError> {
        Ok(format!("patch-{}\n", diff_id))
    }

    async fn diffs_with_commit(&self, commit: &str) -> Result<Vec<Diff>, SourceError> {
        Ok(diffs()
            .into_iter()
            .filter(|d| d.local_commits.iter().any(|c| c.commit == commit))
            .collect())
    }
}

#[async_trait]
impl RepositoryOracle for FakePlatform {
    async fn is_landed(&self, _repository: &Repository, commit: &str) -> Result<bool, SourceError> {
        Ok(commit == "root")
    }
}

#[async_trait]
impl RevisionSource for FakePlatform {
    async fn load_revision(&self, revision_id: RevisionId) -> Result<Revision, SourceError> {
        if revision_id != 4 {
            return Err(SourceError::NotFound(format!("revision D{}", revision_id)));
        }

        Ok(Revision {
            id: 4,
            phid: "PHID-DREV-4".to_string(),
            title: "Count things".to_string(),
            summary: "Counts.".to_string(),
            author: Some(Author {
                real_name: "Jane Doe".to_string(),
                email: None,
            }),
            repository: Some(Repository {
                phid: "PHID-REPO-1".to_string(),
                name: "server".to_string(),
                callsign: Some("SRV".to_string()),
                vcs: VcsKind::Git,
            }),
            active_diff: Some(12),
        })
    }
}

#[async_trait]
impl CommentPublisher for FakePlatform {
    async fn find_user(&self, username: &str) -> Result<Option<User>, SourceError> {
        Ok((username == "changesbot").then(|| User {
            phid: "PHID-USER-BOT".to_string(),
            username: username.to_string(),
        }))
    }

    async fn post_comment(
        &self,
        _revision: &Revision,
        _author: &User,
        content: &str,
    ) -> Result<(), SourceError> {
        self.comments.lock().unwrap().push(content.to_string());
        Ok(())
    }
}

pub fn create_mock_cli(changes_uri: Option<String>) -> Cli {
    Cli {
        log_level: "debug".to_string(),
        ip: "127.0.0.1".to_string(),
        port: 3100,
        changes_uri,
        changes_auth_header_name: None,
        changes_auth_header_value_file: None,
        changes_bot_username: Some("changesbot".to_string()),
        conduit_uri: "https://phabricator.example.com".to_string(),
        conduit_token_file: "test_token".to_string(),
        production_uri: Some("https://phabricator.example.com".to_string()),
        submit_timeout: 60,
        request_timeout: 10,
        max_ancestry_hops: 256,
        patch_staging_dir: None,
    }
}

pub fn create_mock_state(changes_uri: Option<String>) -> (Arc<WebState>, Arc<FakePlatform>) {
    let platform = Arc::new(FakePlatform::default());
    let server = Arc::new(ServerState {
        cli: create_mock_cli(changes_uri),
        patches: platform.clone(),
        oracle: platform.clone(),
        revisions: platform.clone(),
        comments: platform.clone(),
    });

    let keywords = KeywordTable::with_defaults().unwrap();

    (Arc::new(WebState::new(server, keywords)), platform)
}
