/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod builds;
pub mod conduit;
pub mod retry;
pub mod status;

use bridge_core::consts::ALLOWED_SCHEMES;
use bridge_core::types::ChangesConfig;
use bridge_core::{BridgeError, BridgeResult};
use reqwest::StatusCode;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub type RequestType = reqwest::Method;

/// Body shape the build service uses to explain a rejected request.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the Changes build service.
#[derive(Debug, Clone)]
pub struct ChangesClient {
    config: ChangesConfig,
    client: reqwest::Client,
}

impl ChangesClient {
    pub fn new(config: ChangesConfig) -> BridgeResult<Self> {
        let client = reqwest::Client::builder()
            .redirect(restricted_redirects())
            .build()
            .map_err(|e| BridgeError::Transport(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ChangesConfig {
        &self.config
    }

    fn get_client(
        &self,
        request_type: RequestType,
        endpoint: &str,
        timeout: Duration,
    ) -> reqwest::RequestBuilder {
        let mut client = self
            .client
            .request(request_type, self.config.endpoint(endpoint))
            .timeout(timeout);

        if let Some((name, value)) = &self.config.auth_header {
            client = client.header(name.as_str(), value.as_str());
        }

        client
    }
}

/// Redirects may only stay on http(s).
pub(crate) fn restricted_redirects() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() > 10 {
            attempt.error("too many redirects")
        } else if ALLOWED_SCHEMES.contains(&attempt.url().scheme()) {
            attempt.follow()
        } else {
            attempt.stop()
        }
    })
}

pub(crate) fn transport_error(e: reqwest::Error) -> BridgeError {
    if e.is_timeout() {
        BridgeError::Transport(format!("request timed out: {}", e))
    } else {
        BridgeError::Transport(e.to_string())
    }
}

async fn read_response(res: reqwest::Response) -> BridgeResult<(StatusCode, Vec<u8>)> {
    let status = res.status();
    let bytes = res.bytes().await.map_err(transport_error)?;

    Ok((status, bytes.to_vec()))
}

/// Maps a build service reply onto the error taxonomy: 200 decodes as JSON,
/// 400 with an `error` field is a rejection, anything else is a service error.
fn parse_response<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> BridgeResult<T> {
    if status == StatusCode::OK {
        return serde_json::from_slice::<T>(body)
            .map_err(|e| BridgeError::MalformedResponse(e.to_string()));
    }

    if status == StatusCode::BAD_REQUEST {
        if let Ok(error_res) = serde_json::from_slice::<ErrorBody>(body) {
            return Err(BridgeError::Rejected(error_res.error));
        }
    }

    Err(BridgeError::Service {
        status: status.as_u16(),
        body: String::from_utf8_lossy(body).to_string(),
    })
}
