/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod consts;
pub mod error;
pub mod input;
pub mod sources;
pub mod types;

pub use error::{BridgeError, BridgeResult, SourceError};
