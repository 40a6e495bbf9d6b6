/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::consts::*;
use super::error::{BridgeError, BridgeResult};
use super::input::{
    deserialize_service_timestamp, format_author, greater_than_zero, join_service_path,
    load_secret, port_in_range, validate_service_url,
};
use super::sources::{CommentPublisher, PatchSource, RepositoryOracle, RevisionSource};
use chrono::NaiveDateTime;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "Changes Bridge", display_name = "Changes Bridge", bin_name = "changes-bridge", author = "Wavelens", version, about, long_about = None)]
pub struct Cli {
    #[arg(long, env = "CHANGES_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
    #[arg(long, env = "CHANGES_IP", default_value = "127.0.0.1")]
    pub ip: String,
    #[arg(long, env = "CHANGES_PORT", value_parser = port_in_range, default_value_t = 3100)]
    pub port: u16,
    #[arg(long, env = "CHANGES_URI")]
    pub changes_uri: Option<String>,
    #[arg(long, env = "CHANGES_AUTH_HEADER_NAME")]
    pub changes_auth_header_name: Option<String>,
    #[arg(long, env = "CHANGES_AUTH_HEADER_VALUE_FILE")]
    pub changes_auth_header_value_file: Option<String>,
    #[arg(long, env = "CHANGES_BOT_USERNAME")]
    pub changes_bot_username: Option<String>,
    #[arg(long, env = "CHANGES_CONDUIT_URI")]
    pub conduit_uri: String,
    #[arg(long, env = "CHANGES_CONDUIT_TOKEN_FILE")]
    pub conduit_token_file: String,
    #[arg(long, env = "CHANGES_PRODUCTION_URI")]
    pub production_uri: Option<String>,
    #[arg(long, env = "CHANGES_SUBMIT_TIMEOUT", value_parser = greater_than_zero::<u64>, default_value_t = DEFAULT_SUBMIT_TIMEOUT_SECS)]
    pub submit_timeout: u64,
    #[arg(long, env = "CHANGES_REQUEST_TIMEOUT", value_parser = greater_than_zero::<u64>, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout: u64,
    #[arg(long, env = "CHANGES_MAX_ANCESTRY_HOPS", value_parser = greater_than_zero::<usize>, default_value_t = DEFAULT_MAX_ANCESTRY_HOPS)]
    pub max_ancestry_hops: usize,
    #[arg(long, env = "CHANGES_PATCH_STAGING_DIR")]
    pub patch_staging_dir: Option<String>,
}

/// Everything needed to talk to the build service, resolved once from [`Cli`]
/// and passed explicitly to each call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangesConfig {
    pub base_url: String,
    pub auth_header: Option<(String, String)>,
    pub bot_username: Option<String>,
    pub production_uri: Option<String>,
    pub submit_timeout: Duration,
    pub request_timeout: Duration,
    pub staging_dir: Option<PathBuf>,
}

impl ChangesConfig {
    pub fn new(base_url: &str) -> BridgeResult<Self> {
        let url = validate_service_url(base_url).map_err(BridgeError::NotConfigured)?;

        Ok(Self {
            base_url: url.as_str().trim_end_matches('/').to_string(),
            auth_header: None,
            bot_username: None,
            production_uri: None,
            submit_timeout: Duration::from_secs(DEFAULT_SUBMIT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            staging_dir: None,
        })
    }

    pub fn from_cli(cli: &Cli) -> BridgeResult<Self> {
        let base_url = cli
            .changes_uri
            .as_deref()
            .map(str::trim)
            .filter(|uri| !uri.is_empty())
            .ok_or_else(|| BridgeError::NotConfigured(NOT_CONFIGURED_MESSAGE.to_string()))?;

        let mut config = Self::new(base_url)?;

        if let (Some(name), Some(value_file)) = (
            cli.changes_auth_header_name.as_ref(),
            cli.changes_auth_header_value_file.as_ref(),
        ) {
            config.auth_header = Some((name.clone(), load_secret(value_file)));
        }

        config.bot_username = cli
            .changes_bot_username
            .clone()
            .filter(|name| !name.trim().is_empty());
        config.production_uri = cli.production_uri.clone();
        config.submit_timeout = Duration::from_secs(cli.submit_timeout);
        config.request_timeout = Duration::from_secs(cli.request_timeout);
        config.staging_dir = cli.patch_staging_dir.as_ref().map(PathBuf::from);

        Ok(config)
    }

    pub fn endpoint(&self, path: &str) -> String {
        join_service_path(&self.base_url, path)
    }

    pub fn revision_url(&self, revision: &Revision) -> String {
        match &self.production_uri {
            Some(production) => join_service_path(production, &revision.monogram()),
            None => format!("/{}", revision.monogram()),
        }
    }

    pub fn build_link(&self, revision_id: RevisionId, build_id: &str) -> String {
        format!(
            "{}?buildID={}",
            join_service_path(&self.base_url, &format!("v2/diff/D{}/", revision_id)),
            build_id
        )
    }
}

pub struct ServerState {
    pub cli: Cli,
    pub patches: Arc<dyn PatchSource>,
    pub oracle: Arc<dyn RepositoryOracle>,
    pub revisions: Arc<dyn RevisionSource>,
    pub comments: Arc<dyn CommentPublisher>,
}

impl ServerState {
    pub fn changes_config(&self) -> BridgeResult<ChangesConfig> {
        ChangesConfig::from_cli(&self.cli)
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BaseResponse<T> {
    pub error: bool,
    pub message: T,
}

pub type DiffId = u64;
pub type RevisionId = u64;

/// A commit recorded in a diff's metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalCommit {
    pub commit: String,
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default)]
    pub time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diff {
    pub id: DiffId,
    pub revision_id: Option<RevisionId>,
    pub base_revision: Option<String>,
    /// Most recent first.
    #[serde(default)]
    pub local_commits: Vec<LocalCommit>,
}

impl Diff {
    pub fn head_commit(&self) -> Option<&str> {
        self.local_commits.first().map(|c| c.commit.as_str())
    }

    /// First parent of the oldest local commit by author time.
    pub fn natural_base(&self) -> Option<&str> {
        let mut commits = self.local_commits.iter().collect::<Vec<_>>();
        commits.sort_by_key(|c| c.time);

        commits
            .first()
            .and_then(|c| c.parents.first())
            .map(String::as_str)
    }

    /// The recorded source control base revision, falling back to
    /// [`Diff::natural_base`].
    pub fn base_hash(&self) -> Option<&str> {
        self.base_revision
            .as_deref()
            .map(str::trim)
            .filter(|hash| !hash.is_empty())
            .or_else(|| self.natural_base())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VcsKind {
    Git,
    Mercurial,
    Other(String),
}

impl VcsKind {
    pub fn is_supported(&self) -> bool {
        !matches!(self, VcsKind::Other(_))
    }
}

impl From<String> for VcsKind {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "git" => VcsKind::Git,
            "hg" | "mercurial" => VcsKind::Mercurial,
            _ => VcsKind::Other(s),
        }
    }
}

impl From<VcsKind> for String {
    fn from(kind: VcsKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VcsKind::Git => write!(f, "git"),
            VcsKind::Mercurial => write!(f, "hg"),
            VcsKind::Other(other) => write!(f, "{}", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub phid: String,
    pub name: String,
    pub callsign: Option<String>,
    pub vcs: VcsKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub real_name: String,
    pub email: Option<String>,
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_author(&self.real_name, self.email.as_deref()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub id: RevisionId,
    pub phid: String,
    pub title: String,
    pub summary: String,
    pub author: Option<Author>,
    pub repository: Option<Repository>,
    pub active_diff: Option<DiffId>,
}

impl Revision {
    pub fn monogram(&self) -> String {
        format!("D{}", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub phid: String,
    pub username: String,
}

/// Diffs walked to reach a landed base commit, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestryChain {
    pub landed: String,
    pub diffs: Vec<DiffId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildMetadata {
    pub diff_id: DiffId,
    pub revision_id: RevisionId,
    pub revision_url: String,
    pub build_target_phid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildRequest {
    pub label: String,
    pub message: String,
    pub callsign: Option<String>,
    pub author: Option<String>,
    pub sha: String,
    #[serde(skip)]
    pub patch: String,
    pub metadata: BuildMetadata,
}

impl BuildRequest {
    /// Scalar form fields in transmission order. The patch body travels
    /// separately as a file part.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("label", self.label.clone()),
            ("message", self.message.clone()),
            ("tag", DIFF_BUILD_TAG.to_string()),
            (
                "phabricator.buildTargetPHID",
                self.metadata.build_target_phid.clone().unwrap_or_default(),
            ),
            (
                "phabricator.callsign",
                self.callsign.clone().unwrap_or_default(),
            ),
            ("phabricator.diffID", self.metadata.diff_id.to_string()),
            (
                "phabricator.revisionID",
                self.metadata.revision_id.to_string(),
            ),
            ("phabricator.revisionURL", self.metadata.revision_url.clone()),
            ("sha", self.sha.clone()),
        ];

        if let Some(author) = &self.author {
            fields.push(("author", author.clone()));
        }

        fields
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    Queued,
    InProgress,
    Finished,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildResult {
    Passed,
    Failed,
    Aborted,
    InfraFailed,
    Skipped,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceProject {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub id: BuildStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceResult {
    #[serde(default)]
    pub id: BuildResult,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStats {
    #[serde(default)]
    pub test_failures: Option<u64>,
}

/// Build object as the build service encodes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceBuild {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub project: ServiceProject,
    #[serde(default)]
    pub status: ServiceStatus,
    #[serde(default)]
    pub result: ServiceResult,
    #[serde(
        rename = "dateCreated",
        default,
        deserialize_with = "deserialize_service_timestamp"
    )]
    pub date_created: Option<NaiveDateTime>,
    #[serde(default)]
    pub stats: ServiceStats,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStatusEntry {
    pub build_id: Option<String>,
    pub project: String,
    pub status: BuildStatus,
    /// Meaningful only when `status` is [`BuildStatus::Finished`].
    pub result: BuildResult,
    pub created_at: Option<NaiveDateTime>,
    pub test_failures: Option<u64>,
}

impl From<ServiceBuild> for BuildStatusEntry {
    fn from(build: ServiceBuild) -> Self {
        Self {
            build_id: build.id,
            project: build.project.name,
            status: build.status.id,
            result: build.result.id,
            created_at: build.date_created,
            test_failures: build.stats.test_failures,
        }
    }
}
