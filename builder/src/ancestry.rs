/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use bridge_core::sources::{PatchSource, RepositoryOracle};
use bridge_core::types::{AncestryChain, Diff, Repository};
use bridge_core::{BridgeError, BridgeResult};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Walks backwards from `start` until a base commit is found that the
/// repository already contains.
///
/// Each step looks for a diff whose most recent local commit is the current
/// base and continues from that diff's own base. When several diffs qualify
/// the first one returned by `patches` is taken. The walk gives up after
/// `max_hops` steps or as soon as a base hash repeats.
///
/// The returned chain is oldest first: its first element is the diff applied
/// directly on top of the landed commit and its last element is `start`.
#[instrument(skip_all, fields(diff_id = start.id, repository = %repository.name))]
pub async fn resolve_ancestry(
    patches: &dyn PatchSource,
    oracle: &dyn RepositoryOracle,
    repository: &Repository,
    start: &Diff,
    max_hops: usize,
) -> BridgeResult<AncestryChain> {
    if !repository.vcs.is_supported() {
        return Err(BridgeError::UnsupportedRepository(repository.vcs.to_string()));
    }

    let unresolved = |hops: usize| BridgeError::AncestryUnresolved {
        diff_id: start.id,
        hops,
    };

    let mut proposed = start
        .base_hash()
        .ok_or(BridgeError::MissingParent)?
        .to_string();
    let mut chain = vec![start.id];
    let mut visited = HashSet::new();

    loop {
        let hops = chain.len() - 1;

        if !visited.insert(proposed.clone()) {
            debug!(commit = %proposed, hops, "Base commit seen twice, diff graph is cyclic");
            return Err(unresolved(hops));
        }

        if oracle.is_landed(repository, &proposed).await? {
            chain.reverse();
            debug!(landed = %proposed, chain = ?chain, "Resolved landed base");

            return Ok(AncestryChain {
                landed: proposed,
                diffs: chain,
            });
        }

        if hops >= max_hops {
            return Err(unresolved(hops));
        }

        let parent = patches
            .diffs_with_commit(&proposed)
            .await?
            .into_iter()
            .find(|diff| diff.head_commit() == Some(proposed.as_str()))
            .ok_or_else(|| unresolved(hops))?;

        debug!(commit = %proposed, parent_diff = parent.id, "Base is not landed, following parent diff");

        proposed = parent
            .base_hash()
            .ok_or_else(|| unresolved(hops + 1))?
            .to_string();
        chain.push(parent.id);
    }
}
