/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod aggregate;
pub mod ancestry;
pub mod submission;

pub use aggregate::aggregate_patches;
pub use ancestry::resolve_ancestry;
pub use submission::{BuildContext, BuildOutcome, Buildable, build_request, execute_build};
