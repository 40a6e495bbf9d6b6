/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::*;
use bridge_core::consts::{
    GENERIC_RETRY_ERROR, NO_BUILDS_RESTARTED, RETRY_DIFF_PATH, RETRY_UNREACHABLE,
};
use bridge_core::types::{DiffId, ServiceBuild};
use tracing::{debug, instrument};

impl ChangesClient {
    /// Asks the build service to restart the builds of a diff.
    #[instrument(skip(self))]
    pub async fn retry(&self, diff_id: DiffId) -> BridgeResult<Vec<ServiceBuild>> {
        let res = self
            .get_client(
                RequestType::POST,
                &format!("{}/{}/retry/", RETRY_DIFF_PATH, diff_id),
                self.config.request_timeout,
            )
            .send()
            .await
            .map_err(transport_error)?;

        let (status, body) = read_response(res).await?;
        debug!(status = status.as_u16(), "Retry answered");

        parse_response(status, &body)
    }
}

/// Human readable outcome of a retry, suitable for a revision comment.
pub fn describe_retry(result: &BridgeResult<Vec<ServiceBuild>>) -> String {
    match result {
        Ok(builds) if builds.is_empty() => NO_BUILDS_RESTARTED.to_string(),
        Ok(builds) => format!(
            "Builds restarted: {}",
            builds
                .iter()
                .map(|build| build.project.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Err(BridgeError::Rejected(message)) => message.clone(),
        Err(e) if e.is_transient() => RETRY_UNREACHABLE.to_string(),
        Err(BridgeError::Service { status, .. }) => {
            format!("{} (HTTP {})", GENERIC_RETRY_ERROR, status)
        }
        Err(_) => GENERIC_RETRY_ERROR.to_string(),
    }
}
