/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use bridge_core::BridgeResult;
use bridge_core::sources::PatchSource;
use bridge_core::types::DiffId;
use tracing::{debug, instrument};

/// Concatenates the raw patches of `chain` in the given order. Unified diff
/// blocks are self delimiting, so nothing is inserted between them.
#[instrument(skip(patches))]
pub async fn aggregate_patches(patches: &dyn PatchSource, chain: &[DiffId]) -> BridgeResult<String> {
    let mut patch = String::new();

    for diff_id in chain {
        let raw = patches.raw_diff(*diff_id).await?;
        debug!(diff_id, bytes = raw.len(), "Appending raw diff");
        patch.push_str(&raw);
    }

    Ok(patch)
}
