// File: attribute.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CensusError;

/// Value recorded when a successful response does not carry the header.
pub const UNAVAILABLE: &str = "unavailable";

static SERVER_BANNER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([^/\s]+)(?:/(\S+))?").expect("server banner pattern"));

pub type Extractor = fn(&HeaderMap) -> String;

/// A tracked response attribute. Five map directly onto response headers,
/// `ServerName` and `ServerVersion` are split out of the `Server` banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Server,
    XFrameOptions,
    XContentTypeOptions,
    ReferrerPolicy,
    XssProtection,
    ServerName,
    ServerVersion,
}

impl Attribute {
    pub const ALL: [Attribute; 7] = [
        Attribute::Server,
        Attribute::XFrameOptions,
        Attribute::XContentTypeOptions,
        Attribute::ReferrerPolicy,
        Attribute::XssProtection,
        Attribute::ServerName,
        Attribute::ServerVersion,
    ];

    /// The attributes read straight from a response header.
    pub const HEADERS: [Attribute; 5] = [
        Attribute::Server,
        Attribute::XFrameOptions,
        Attribute::XContentTypeOptions,
        Attribute::ReferrerPolicy,
        Attribute::XssProtection,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Server => "server",
            Attribute::XFrameOptions => "x_frame_options",
            Attribute::XContentTypeOptions => "x_content_type_options",
            Attribute::ReferrerPolicy => "referrer_policy",
            Attribute::XssProtection => "xss_protection",
            Attribute::ServerName => "server_name",
            Attribute::ServerVersion => "server_version",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Attribute::Server => "Server",
            Attribute::XFrameOptions => "X-Frame-Options",
            Attribute::XContentTypeOptions => "X-Content-Type-Options",
            Attribute::ReferrerPolicy => "Referrer-Policy",
            Attribute::XssProtection => "X-XSS-Protection",
            Attribute::ServerName => "Server Name",
            Attribute::ServerVersion => "Server Version",
        }
    }

    pub fn extractor(&self) -> Extractor {
        match self {
            Attribute::Server => extract_server,
            Attribute::XFrameOptions => extract_x_frame_options,
            Attribute::XContentTypeOptions => extract_x_content_type_options,
            Attribute::ReferrerPolicy => extract_referrer_policy,
            Attribute::XssProtection => extract_xss_protection,
            Attribute::ServerName => extract_server_name,
            Attribute::ServerVersion => extract_server_version,
        }
    }

    pub fn extract(&self, headers: &HeaderMap) -> String {
        (self.extractor())(headers)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = CensusError;

    /// Accepts the snake_case name as well as the raw header spelling,
    /// e.g. `x_frame_options` and `X-Frame-Options`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "server" => Ok(Attribute::Server),
            "x_frame_options" => Ok(Attribute::XFrameOptions),
            "x_content_type_options" => Ok(Attribute::XContentTypeOptions),
            "referrer_policy" => Ok(Attribute::ReferrerPolicy),
            "xss_protection" | "x_xss_protection" => Ok(Attribute::XssProtection),
            "server_name" => Ok(Attribute::ServerName),
            "server_version" => Ok(Attribute::ServerVersion),
            _ => Err(CensusError::UnknownAttribute(s.to_string())),
        }
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .unwrap_or_else(|| UNAVAILABLE.to_string())
}

fn extract_server(headers: &HeaderMap) -> String {
    header_value(headers, "server")
}

fn extract_x_frame_options(headers: &HeaderMap) -> String {
    header_value(headers, "x-frame-options")
}

fn extract_x_content_type_options(headers: &HeaderMap) -> String {
    header_value(headers, "x-content-type-options")
}

fn extract_referrer_policy(headers: &HeaderMap) -> String {
    header_value(headers, "referrer-policy")
}

fn extract_xss_protection(headers: &HeaderMap) -> String {
    header_value(headers, "x-xss-protection")
}

fn extract_server_name(headers: &HeaderMap) -> String {
    split_server_banner(&extract_server(headers)).0
}

fn extract_server_version(headers: &HeaderMap) -> String {
    split_server_banner(&extract_server(headers))
        .1
        .unwrap_or_else(|| UNAVAILABLE.to_string())
}

/// Splits a banner such as `Apache/2.4.41 (Ubuntu)` into `("Apache", Some("2.4.41"))`.
/// A blank banner yields the sentinel name and no version.
pub fn split_server_banner(banner: &str) -> (String, Option<String>) {
    match SERVER_BANNER.captures(banner) {
        Some(caps) => {
            let name = caps
                .get(1)
                .map_or(UNAVAILABLE, |m| m.as_str())
                .to_string();
            let version = caps.get(2).map(|m| m.as_str().to_string());
            (name, version)
        }
        None => (UNAVAILABLE.to_string(), None),
    }
}
