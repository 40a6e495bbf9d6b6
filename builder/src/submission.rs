/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::aggregate::aggregate_patches;
use super::ancestry::resolve_ancestry;
use bridge_core::consts::NOT_CONFIGURED_MESSAGE;
use bridge_core::sources::{PatchSource, RepositoryOracle, RevisionSource};
use bridge_core::types::*;
use bridge_core::{BridgeError, BridgeResult};
use connector::ChangesClient;
use tracing::{error, info, instrument};

/// Objects a build can be requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Buildable {
    Diff(Diff),
    /// A landed commit, identified by hash. Not buildable through this
    /// bridge yet.
    Commit(String),
}

impl Buildable {
    pub fn kind(&self) -> &'static str {
        match self {
            Buildable::Diff(_) => "diff",
            Buildable::Commit(_) => "commit",
        }
    }
}

/// Collaborators and settings for a single build submission.
pub struct BuildContext<'a> {
    /// `None` when no build service is configured.
    pub client: Option<&'a ChangesClient>,
    pub patches: &'a dyn PatchSource,
    pub oracle: &'a dyn RepositoryOracle,
    pub revisions: &'a dyn RevisionSource,
    pub max_hops: usize,
}

#[derive(Debug)]
pub struct BuildOutcome {
    pub revision_id: Option<RevisionId>,
    pub diff_id: Option<DiffId>,
    pub transcript: Vec<String>,
    pub result: BridgeResult<Vec<ServiceBuild>>,
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    fn prefix(&self) -> String {
        match (self.revision_id, self.diff_id) {
            (Some(revision_id), Some(diff_id)) => format!("D{}:{}", revision_id, diff_id),
            (None, Some(diff_id)) => format!("diff {}", diff_id),
            _ => "unknown".to_string(),
        }
    }

    /// One line summary for rule effect logs.
    pub fn effect(&self) -> String {
        match &self.result {
            Ok(builds) => format!(
                "[{}] Started {} build(s): {}.",
                self.prefix(),
                builds.len(),
                builds
                    .iter()
                    .map(|build| build.project.name.as_str())
                    .filter(|name| !name.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Err(e) => format!(
                "[{}] Failed to start build(s). {}.",
                self.prefix(),
                e.to_string().trim_end_matches('.')
            ),
        }
    }
}

/// Assembles the build request for a diff: revision metadata, the resolved
/// landed base and the aggregated patch of every diff stacked on top of it.
pub async fn build_request(
    ctx: &BuildContext<'_>,
    config: &ChangesConfig,
    diff: &Diff,
    build_target: Option<String>,
) -> BridgeResult<BuildRequest> {
    let revision_id = diff.revision_id.ok_or(BridgeError::MissingRevision)?;
    let revision = ctx.revisions.load_revision(revision_id).await?;
    let repository = revision
        .repository
        .as_ref()
        .ok_or(BridgeError::MissingRepository)?;

    let chain = resolve_ancestry(ctx.patches, ctx.oracle, repository, diff, ctx.max_hops).await?;
    let patch = aggregate_patches(ctx.patches, &chain.diffs).await?;

    Ok(BuildRequest {
        label: revision.title.clone(),
        message: revision.summary.clone(),
        callsign: repository.callsign.clone(),
        author: revision.author.as_ref().map(ToString::to_string),
        sha: chain.landed,
        patch,
        metadata: BuildMetadata {
            diff_id: diff.id,
            revision_id,
            revision_url: config.revision_url(&revision),
            build_target_phid: build_target,
        },
    })
}

/// Runs the whole submission pipeline for `buildable`. Failures never escape
/// as errors; they end up in the outcome and its transcript.
#[instrument(skip(ctx, buildable, build_target), fields(kind = buildable.kind()))]
pub async fn execute_build(
    ctx: &BuildContext<'_>,
    buildable: Buildable,
    build_target: Option<String>,
) -> BuildOutcome {
    let mut outcome = BuildOutcome {
        revision_id: None,
        diff_id: None,
        transcript: Vec::new(),
        result: Ok(Vec::new()),
    };

    if let Buildable::Diff(diff) = &buildable {
        outcome.revision_id = diff.revision_id;
        outcome.diff_id = Some(diff.id);
    }

    let Some(client) = ctx.client else {
        outcome.transcript.push(NOT_CONFIGURED_MESSAGE.to_string());
        outcome.result = Err(BridgeError::NotConfigured(NOT_CONFIGURED_MESSAGE.to_string()));
        return outcome;
    };

    outcome
        .transcript
        .push(format!("Changes URI is \"{}\".", client.config().base_url));

    let diff = match buildable {
        Buildable::Diff(diff) => diff,
        other => {
            let e = BridgeError::UnsupportedObject(other.kind().to_string());
            outcome.transcript.push(e.to_string());
            outcome.result = Err(e);
            return outcome;
        }
    };

    outcome.transcript.push(format!(
        "Identifying build parameters for diff {}{}.",
        diff.id,
        diff.revision_id
            .map(|id| format!(" (D{})", id))
            .unwrap_or_default()
    ));

    let request = match build_request(ctx, client.config(), &diff, build_target).await {
        Ok(request) => request,
        Err(e) => {
            error!(error = %e, "Failed to assemble build request");
            outcome.transcript.push(e.to_string());
            outcome.result = Err(e);
            return outcome;
        }
    };

    outcome.transcript.push(format!(
        "Request params:\n{}",
        serde_json::to_string_pretty(&request).unwrap_or_default()
    ));

    outcome.result = client.submit(&request).await;

    match &outcome.result {
        Ok(builds) => {
            info!(builds = builds.len(), sha = %request.sha, "Started builds");
            outcome.transcript.push(format!(
                "Response was:\n{}",
                serde_json::to_string_pretty(builds).unwrap_or_default()
            ));
        }
        Err(e) => {
            error!(error = %e, "Build submission failed");
            outcome.transcript.push(format!("Submission failed: {}", e));
        }
    }

    outcome
}
