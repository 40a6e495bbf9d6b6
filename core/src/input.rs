/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::borrow::Cow;
use url::Url;

use super::consts::*;

pub fn port_in_range(s: &str) -> Result<u16, String> {
    let port: usize = s
        .parse()
        .map_err(|_| format!("`{s}` is not a port number"))?;

    if PORT_RANGE.contains(&port) {
        Ok(port as u16)
    } else {
        Err(format!(
            "port not in range {}-{}",
            PORT_RANGE.start(),
            PORT_RANGE.end()
        ))
    }
}

pub fn greater_than_zero<
    T: std::str::FromStr + std::cmp::PartialOrd + std::fmt::Display + Default,
>(
    s: &str,
) -> Result<T, String> {
    let num: T = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid number", s))?;

    if num > T::default() {
        Ok(num)
    } else {
        Err(format!("`{}` is not larger than 0", s))
    }
}

pub fn load_secret(f: &str) -> String {
    let s = std::fs::read_to_string(f).unwrap_or_default();
    s.trim().replace(char::from(25), "")
}

/// Accepts only absolute `http`/`https` URLs.
pub fn validate_service_url(s: &str) -> Result<Url, String> {
    let url = Url::parse(s.trim()).map_err(|e| format!("`{}` is not a valid URL: {}", s, e))?;

    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(format!(
            "`{}` uses unsupported scheme `{}`, expected http or https",
            s,
            url.scheme()
        ));
    }

    if url.host_str().is_none() {
        return Err(format!("`{}` has no host", s));
    }

    Ok(url)
}

pub fn join_service_path(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// A value starting with `@` is read as a file reference by form encoders
/// that follow the curl convention, so it gets a leading space.
pub fn escape_field_value(value: &str) -> Cow<'_, str> {
    if value.starts_with('@') {
        Cow::Owned(format!(" {}", value))
    } else {
        Cow::Borrowed(value)
    }
}

pub fn format_author(real_name: &str, email: Option<&str>) -> String {
    match email.map(str::trim).filter(|e| !e.is_empty()) {
        Some(email) => format!("{} <{}>", real_name, email),
        None => real_name.to_string(),
    }
}

/// Build service timestamps come without an offset (`2015-03-02T18:14:09.123`),
/// but RFC 3339 is accepted as well.
pub fn parse_service_timestamp(s: &str) -> Result<NaiveDateTime, String> {
    let s = s.trim();

    if let Ok(parsed) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(parsed);
    }

    DateTime::parse_from_rfc3339(s)
        .map(|parsed| parsed.naive_utc())
        .map_err(|_| format!("`{}` is not a valid timestamp", s))
}

pub fn deserialize_service_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.trim().is_empty() => parse_service_timestamp(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}
