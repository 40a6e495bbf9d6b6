/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::ops::RangeInclusive;

pub const PORT_RANGE: RangeInclusive<usize> = 1..=65535;

pub const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

pub const NOTIFY_DIFF_PATH: &str = "api/0/phabricator/notify-diff/";
pub const RETRY_DIFF_PATH: &str = "api/0/phabricator_diffs";
pub const INLINE_STATUS_PATH: &str = "api/0/phabricator/inline/";

pub const DEFAULT_MAX_ANCESTRY_HOPS: usize = 256;
pub const DEFAULT_SUBMIT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

pub const PATCH_FILE_PREFIX: &str = "changes-patch";
pub const DIFF_BUILD_TAG: &str = "diff";

pub const NOT_CONFIGURED_MESSAGE: &str = "Missing changes.uri setting";
pub const GENERIC_RETRY_ERROR: &str = "An unknown error occurred while retrying the builds.";
pub const RETRY_UNREACHABLE: &str = "Unable to connect to Changes to restart the builds.";
pub const NO_BUILDS_RESTARTED: &str = "No builds restarted.";
pub const NO_ACTIVE_DIFF: &str = "This revision has no active diff, so there are no builds to restart.";
pub const NO_BUILDS_FOUND: &str = "No builds found";

pub const RETRY_KEYWORD: &str = "!retry";
pub const REVISION_PHID_PREFIX: &str = "PHID-DREV-";
