/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Host platform collaborators backed by the Conduit API.

use crate::restricted_redirects;
use async_trait::async_trait;
use bridge_core::SourceError;
use bridge_core::input::{join_service_path, validate_service_url};
use bridge_core::sources::*;
use bridge_core::types::*;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, instrument, warn};

#[derive(Debug, Deserialize)]
struct ConduitResponse<T> {
    result: Option<T>,
    error_code: Option<String>,
    error_info: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct PhidItem {
    phid: String,
}

#[derive(Debug, Deserialize)]
struct RepositoryItem {
    phid: String,
    fields: RepositoryFields,
}

#[derive(Debug, Deserialize)]
struct RepositoryFields {
    name: String,
    callsign: Option<String>,
    vcs: String,
}

#[derive(Debug, Deserialize)]
struct UserItem {
    phid: String,
    fields: UserFields,
}

#[derive(Debug, Deserialize)]
struct UserFields {
    username: String,
}

#[derive(Debug, Deserialize)]
struct WhoAmI {
    phid: String,
    #[serde(rename = "userName", default)]
    user_name: String,
}

#[derive(Debug, Deserialize)]
struct UserQueryItem {
    #[serde(rename = "realName")]
    real_name: String,
    #[serde(rename = "primaryEmail", default)]
    primary_email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConduitClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl ConduitClient {
    pub fn new(base_url: &str, token: String, timeout: Duration) -> Result<Self, SourceError> {
        let url = validate_service_url(base_url).map_err(|e| SourceError::Conduit {
            method: "conduit.connect".to_string(),
            message: e,
        })?;

        let client = reqwest::Client::builder()
            .redirect(restricted_redirects())
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: url.as_str().trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, SourceError> {
        let mut params = params;
        if let Value::Object(map) = &mut params {
            map.insert("__conduit__".to_string(), json!({ "token": self.token }));
        }

        let res = self
            .client
            .post(join_service_path(&self.base_url, &format!("api/{}", method)))
            .form(&[
                ("params", params.to_string()),
                ("output", "json".to_string()),
                ("__conduit__", "1".to_string()),
            ])
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let bytes = res
            .bytes()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let response: ConduitResponse<T> =
            serde_json::from_slice(&bytes).map_err(|e| SourceError::Decode {
                method: method.to_string(),
                message: e.to_string(),
            })?;

        if let Some(code) = response.error_code {
            return Err(SourceError::Conduit {
                method: method.to_string(),
                message: format!("{}: {}", code, response.error_info.unwrap_or_default()),
            });
        }

        response.result.ok_or_else(|| SourceError::Decode {
            method: method.to_string(),
            message: "missing result".to_string(),
        })
    }

    async fn query_diffs(&self, params: Value) -> Result<Vec<Diff>, SourceError> {
        let result: Value = self.call("differential.querydiffs", params).await?;

        let entries = match result {
            Value::Object(map) => map.into_iter().map(|(_, diff)| diff).collect(),
            Value::Array(diffs) => diffs,
            _ => vec![],
        };

        Ok(entries.iter().filter_map(parse_diff).collect())
    }

    async fn load_author(&self, phid: &str) -> Result<Option<Author>, SourceError> {
        let users: Vec<UserQueryItem> = self.call("user.query", json!({ "phids": [phid] })).await?;

        Ok(users.into_iter().next().map(|user| Author {
            real_name: user.real_name,
            email: user.primary_email,
        }))
    }

    async fn load_repository(&self, phid: &str) -> Result<Option<Repository>, SourceError> {
        let repositories: SearchResponse<RepositoryItem> = self
            .call(
                "diffusion.repository.search",
                json!({ "constraints": { "phids": [phid] } }),
            )
            .await?;

        Ok(repositories.data.into_iter().next().map(|repo| Repository {
            phid: repo.phid,
            name: repo.fields.name,
            callsign: repo.fields.callsign,
            vcs: VcsKind::from(repo.fields.vcs),
        }))
    }
}

fn id_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_local_commit(value: &Value) -> Option<LocalCommit> {
    let commit = str_field(value, "commit").or_else(|| str_field(value, "rev"))?;

    let parents = value
        .get("parents")
        .and_then(Value::as_array)
        .map(|parents| {
            parents
                .iter()
                .filter_map(|parent| match parent {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(_) => str_field(parent, "rev"),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    let time = value
        .get("time")
        .and_then(|time| match time {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        })
        .unwrap_or_default();

    Some(LocalCommit {
        commit,
        parents,
        time,
    })
}

fn parse_diff(value: &Value) -> Option<Diff> {
    let id = value.get("id").and_then(id_from_value)?;

    let mut local_commits = match value.pointer("/properties/local:commits") {
        Some(Value::Object(commits)) => commits.values().filter_map(parse_local_commit).collect(),
        Some(Value::Array(commits)) => commits.iter().filter_map(parse_local_commit).collect(),
        _ => Vec::<LocalCommit>::new(),
    };
    local_commits.sort_by(|a, b| b.time.cmp(&a.time));

    Some(Diff {
        id,
        revision_id: value.get("revisionID").and_then(id_from_value),
        base_revision: str_field(value, "sourceControlBaseRevision"),
        local_commits,
    })
}

#[async_trait]
impl PatchSource for ConduitClient {
    #[instrument(skip(self))]
    async fn load_diff(&self, diff_id: DiffId) -> Result<Diff, SourceError> {
        self.query_diffs(json!({ "ids": [diff_id] }))
            .await?
            .into_iter()
            .find(|diff| diff.id == diff_id)
            .ok_or_else(|| SourceError::NotFound(format!("diff {}", diff_id)))
    }

    #[instrument(skip(self))]
    async fn raw_diff(&self, diff_id: DiffId) -> Result<String, SourceError> {
        self.call("differential.getrawdiff", json!({ "diffID": diff_id }))
            .await
    }

    #[instrument(skip(self))]
    async fn diffs_with_commit(&self, commit: &str) -> Result<Vec<Diff>, SourceError> {
        let revisions: Vec<Value> = self
            .call(
                "differential.query",
                json!({ "commitHashes": [["gtcm", commit], ["hgcm", commit]] }),
            )
            .await?;

        let revision_ids = revisions
            .iter()
            .filter_map(|revision| revision.get("id").and_then(id_from_value))
            .collect::<Vec<_>>();

        if revision_ids.is_empty() {
            return Ok(vec![]);
        }

        let diffs = self
            .query_diffs(json!({ "revisionIDs": revision_ids }))
            .await?
            .into_iter()
            .filter(|diff| diff.local_commits.iter().any(|c| c.commit == commit))
            .collect::<Vec<_>>();

        debug!(candidates = diffs.len(), "Found diffs mentioning commit");
        Ok(diffs)
    }
}

#[async_trait]
impl RepositoryOracle for ConduitClient {
    #[instrument(skip(self, repository), fields(repository = %repository.name))]
    async fn is_landed(&self, repository: &Repository, commit: &str) -> Result<bool, SourceError> {
        let commits: SearchResponse<PhidItem> = self
            .call(
                "diffusion.commit.search",
                json!({
                    "constraints": {
                        "repositories": [repository.phid],
                        "identifiers": [commit],
                    },
                    "limit": 1,
                }),
            )
            .await?;

        Ok(!commits.data.is_empty())
    }
}

#[async_trait]
impl RevisionSource for ConduitClient {
    #[instrument(skip(self))]
    async fn load_revision(&self, revision_id: RevisionId) -> Result<Revision, SourceError> {
        let revisions: Vec<Value> = self
            .call("differential.query", json!({ "ids": [revision_id] }))
            .await?;

        let revision = revisions
            .into_iter()
            .find(|revision| revision.get("id").and_then(id_from_value) == Some(revision_id))
            .ok_or_else(|| SourceError::NotFound(format!("revision D{}", revision_id)))?;

        let author = match str_field(&revision, "authorPHID") {
            Some(phid) => self.load_author(&phid).await?,
            None => None,
        };

        let repository = match str_field(&revision, "repositoryPHID") {
            Some(phid) => self.load_repository(&phid).await?,
            None => None,
        };

        let active_diff = revision
            .get("diffs")
            .and_then(Value::as_array)
            .and_then(|diffs| diffs.iter().filter_map(id_from_value).max());

        Ok(Revision {
            id: revision_id,
            phid: str_field(&revision, "phid").unwrap_or_default(),
            title: str_field(&revision, "title").unwrap_or_default(),
            summary: str_field(&revision, "summary").unwrap_or_default(),
            author,
            repository,
            active_diff,
        })
    }
}

#[async_trait]
impl CommentPublisher for ConduitClient {
    async fn find_user(&self, username: &str) -> Result<Option<User>, SourceError> {
        let users: SearchResponse<UserItem> = self
            .call(
                "user.search",
                json!({ "constraints": { "usernames": [username] } }),
            )
            .await?;

        Ok(users.data.into_iter().next().map(|user| User {
            phid: user.phid,
            username: user.fields.username,
        }))
    }

    /// Comments are authored by the owner of the Conduit token. A token
    /// owned by anyone other than `author` is reported but not refused.
    #[instrument(skip(self, revision, content), fields(revision_id = revision.id, author = %author.username))]
    async fn post_comment(
        &self,
        revision: &Revision,
        author: &User,
        content: &str,
    ) -> Result<(), SourceError> {
        match self.call::<WhoAmI>("user.whoami", json!({})).await {
            Ok(owner) if owner.phid != author.phid => {
                warn!(
                    token_owner = %owner.user_name,
                    token_owner_phid = %owner.phid,
                    "Conduit token does not belong to the comment author"
                );
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "Could not identify Conduit token owner"),
        }

        let _: Value = self
            .call(
                "differential.revision.edit",
                json!({
                    "objectIdentifier": revision.phid,
                    "transactions": [{ "type": "comment", "value": content }],
                }),
            )
            .await?;

        Ok(())
    }
}
