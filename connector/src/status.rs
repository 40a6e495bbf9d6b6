/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::*;
use bridge_core::consts::INLINE_STATUS_PATH;
use bridge_core::types::{DiffId, RevisionId, ServiceBuild};
use serde_json::Value;
use tracing::instrument;

impl ChangesClient {
    /// Builds the service knows for a revision/diff pair.
    #[instrument(skip(self))]
    pub async fn inline_builds(
        &self,
        revision_id: RevisionId,
        diff_id: DiffId,
    ) -> BridgeResult<Vec<ServiceBuild>> {
        let res = self
            .get_client(
                RequestType::GET,
                INLINE_STATUS_PATH,
                self.config.request_timeout,
            )
            .query(&[
                ("revision_id", revision_id.to_string()),
                ("diff_id", diff_id.to_string()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let (status, body) = read_response(res).await?;

        if !status.is_success() {
            return parse_response(status, &body);
        }

        let data: Value = serde_json::from_slice(&body).map_err(|e| {
            BridgeError::MalformedResponse(format!("expected JSON response from Changes: {}", e))
        })?;

        if let Some(error) = data.get("error").filter(|error| is_truthy(error)) {
            let message = error
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(BridgeError::Rejected(format!(
                "Received error from Changes: {}",
                message
            )));
        }

        match data {
            Value::Null => Ok(vec![]),
            data => serde_json::from_value(data)
                .map_err(|e| BridgeError::MalformedResponse(e.to_string())),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
