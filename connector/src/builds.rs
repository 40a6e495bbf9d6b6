/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::*;
use bridge_core::consts::{NOTIFY_DIFF_PATH, PATCH_FILE_PREFIX};
use bridge_core::input::escape_field_value;
use bridge_core::types::{BuildRequest, ServiceBuild};
use reqwest::Body;
use reqwest::multipart::{Form, Part};
use std::io::{self, Write};
use std::path::Path;
use tempfile::{Builder, NamedTempFile};
use tokio_util::io::ReaderStream;
use tracing::{debug, instrument, warn};

/// Patch body staged on disk for upload. The file is removed when the value
/// is dropped, on every exit path of the owning scope.
#[derive(Debug)]
pub struct PatchFile {
    file: NamedTempFile,
}

impl PatchFile {
    pub fn stage(patch: &str, dir: Option<&Path>) -> io::Result<Self> {
        let mut builder = Builder::new();
        builder.prefix(PATCH_FILE_PREFIX).suffix(".diff");

        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        file.write_all(patch.as_bytes())?;
        file.flush()?;

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    async fn part(&self) -> io::Result<Part> {
        let file = tokio::fs::File::open(self.path()).await?;
        let length = file.metadata().await?.len();
        let body = Body::wrap_stream(ReaderStream::new(file));

        Ok(Part::stream_with_length(body, length).file_name("patch.diff"))
    }
}

pub fn build_form(request: &BuildRequest) -> Form {
    request
        .form_fields()
        .into_iter()
        .fold(Form::new(), |form, (name, value)| {
            form.text(name, escape_field_value(&value).into_owned())
        })
}

impl ChangesClient {
    /// Posts a build request with the patch attached as a file part.
    #[instrument(skip(self, request), fields(diff_id = request.metadata.diff_id, revision_id = request.metadata.revision_id))]
    pub async fn submit(&self, request: &BuildRequest) -> BridgeResult<Vec<ServiceBuild>> {
        let patch_file = if request.patch.is_empty() {
            warn!("Submitting build without a patch");
            None
        } else {
            Some(PatchFile::stage(
                &request.patch,
                self.config.staging_dir.as_deref(),
            )?)
        };

        let mut form = build_form(request);

        form = match &patch_file {
            Some(patch_file) => {
                debug!(path = %patch_file.path().display(), bytes = request.patch.len(), "Staged patch");
                form.part("patch", patch_file.part().await?)
            }
            None => form.text("patch", ""),
        };

        let res = self
            .get_client(
                RequestType::POST,
                NOTIFY_DIFF_PATH,
                self.config.submit_timeout,
            )
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let (status, body) = read_response(res).await?;
        debug!(status = status.as_u16(), "Build service answered");

        parse_response(status, &body)
    }
}
