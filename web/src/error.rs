/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bridge_core::types::BaseResponse;
use bridge_core::{BridgeError, SourceError};
use std::fmt;

#[derive(Debug)]
pub enum WebError {
    BadRequest(String),
    NotFound(String),
    JsonParsing(JsonRejection),
    Bridge(BridgeError),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            WebError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            WebError::JsonParsing(err) => write!(f, "JSON parsing error: {}", err),
            WebError::Bridge(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for WebError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WebError::JsonParsing(err) => Some(err),
            WebError::Bridge(err) => Some(err),
            _ => None,
        }
    }
}

impl From<JsonRejection> for WebError {
    fn from(err: JsonRejection) -> Self {
        WebError::JsonParsing(err)
    }
}

impl From<BridgeError> for WebError {
    fn from(err: BridgeError) -> Self {
        WebError::Bridge(err)
    }
}

impl From<SourceError> for WebError {
    fn from(err: SourceError) -> Self {
        WebError::Bridge(BridgeError::Source(err))
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            WebError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            WebError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            WebError::JsonParsing(err) => {
                (StatusCode::BAD_REQUEST, format!("Invalid JSON: {}", err))
            }
            WebError::Bridge(err) => {
                let status = match &err {
                    BridgeError::Source(SourceError::NotFound(_)) => StatusCode::NOT_FOUND,
                    BridgeError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
                    BridgeError::Rejected(_)
                    | BridgeError::Transport(_)
                    | BridgeError::Service { .. }
                    | BridgeError::MalformedResponse(_)
                    | BridgeError::Source(_) => StatusCode::BAD_GATEWAY,
                    _ => StatusCode::UNPROCESSABLE_ENTITY,
                };

                if status == StatusCode::BAD_GATEWAY {
                    tracing::error!("Upstream error: {}", err);
                }

                (status, err.to_string())
            }
        };

        let body = Json(BaseResponse {
            error: true,
            message: error_message,
        });

        (status, body).into_response()
    }
}

pub type WebResult<T> = Result<T, WebError>;
