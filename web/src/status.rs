/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Turns build service results into the per-project status list shown on a
//! revision.

use bridge_core::types::{BuildResult, BuildStatus, BuildStatusEntry};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusIcon {
    Question,
    Clock,
    Check,
    Times,
    Chevron,
}

impl StatusIcon {
    pub fn css_class(&self) -> &'static str {
        match self {
            StatusIcon::Question => "fa-question-circle",
            StatusIcon::Clock => "fa-clock-o",
            StatusIcon::Check => "fa-check-circle",
            StatusIcon::Times => "fa-times-circle",
            StatusIcon::Chevron => "fa-chevron-circle-right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Gray,
    Green,
    Red,
    Yellow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedStatus {
    pub project: String,
    pub build_id: Option<String>,
    pub icon: StatusIcon,
    pub color: StatusColor,
    pub label: &'static str,
    pub note: Option<String>,
    pub href: Option<String>,
}

/// Most recent entry of every project, ordered by project name. An entry
/// only replaces an earlier one of the same project when it is strictly
/// newer.
pub fn latest_per_project(entries: &[BuildStatusEntry]) -> Vec<BuildStatusEntry> {
    let mut latest: BTreeMap<&str, &BuildStatusEntry> = BTreeMap::new();

    for entry in entries {
        match latest.get(entry.project.as_str()) {
            Some(seen) if seen.created_at >= entry.created_at => {}
            _ => {
                latest.insert(entry.project.as_str(), entry);
            }
        }
    }

    latest.into_values().cloned().collect()
}

pub fn classify(entry: &BuildStatusEntry) -> (StatusIcon, StatusColor, &'static str, Option<String>) {
    match entry.status {
        BuildStatus::Other => (StatusIcon::Question, StatusColor::Gray, "Unknown", None),
        BuildStatus::Queued => (StatusIcon::Clock, StatusColor::Gray, "Not yet started", None),
        BuildStatus::InProgress => (StatusIcon::Clock, StatusColor::Gray, "Running now", None),
        BuildStatus::Finished => match entry.result {
            BuildResult::Passed => (StatusIcon::Check, StatusColor::Green, "Passed", None),
            BuildResult::Failed | BuildResult::Aborted | BuildResult::InfraFailed => {
                let label = if entry.result == BuildResult::Aborted {
                    "Aborted"
                } else {
                    "Failed"
                };

                let note = match entry.test_failures {
                    Some(failures) if failures > 0 => format!("{} tests failed", failures),
                    _ => "No test failures".to_string(),
                };

                (StatusIcon::Times, StatusColor::Red, label, Some(note))
            }
            BuildResult::Skipped => (StatusIcon::Chevron, StatusColor::Yellow, "Skipped", None),
            BuildResult::Other => (
                StatusIcon::Question,
                StatusColor::Gray,
                "Finished, but unknown",
                None,
            ),
        },
    }
}

pub fn render(entries: &[BuildStatusEntry]) -> Vec<RenderedStatus> {
    latest_per_project(entries)
        .into_iter()
        .map(|entry| {
            let (icon, color, label, note) = classify(&entry);

            RenderedStatus {
                project: entry.project,
                build_id: entry.build_id,
                icon,
                color,
                label,
                note,
                href: None,
            }
        })
        .collect()
}
