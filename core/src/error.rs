/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::types::DiffId;
use thiserror::Error;

/// Failure reported by one of the host platform collaborators.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("conduit call `{method}` failed: {message}")]
    Conduit { method: String, message: String },

    #[error("could not reach host platform: {0}")]
    Transport(String),

    #[error("could not decode response of `{method}`: {message}")]
    Decode { method: String, message: String },
}

#[derive(Debug, Error)]
pub enum BridgeError {
    /// The build service is not configured. Never raised to a job; callers
    /// turn it into a status message.
    #[error("{0}")]
    NotConfigured(String),

    #[error("no landed ancestor found for diff {diff_id} after {hops} hop(s)")]
    AncestryUnresolved { diff_id: DiffId, hops: usize },

    #[error("unsupported repository type `{0}`")]
    UnsupportedRepository(String),

    #[error("Unable to create a build for object type {0} (not supported)")]
    UnsupportedObject(String),

    #[error("Not attached to a revision")]
    MissingRevision,

    #[error("Missing repository for diff")]
    MissingRepository,

    #[error("Unable to detect parent revision")]
    MissingParent,

    /// The build service answered with an explicit `error` message.
    #[error("{0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("build service responded with HTTP {status}: {body}")]
    Service { status: u16, body: String },

    #[error("malformed response from build service: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Connection-level failures may succeed on a later attempt. Nothing in
    /// this workspace retries them automatically.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BridgeError::Transport(_) | BridgeError::Source(SourceError::Transport(_))
        )
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            BridgeError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;
