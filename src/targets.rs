// File: targets.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use log::{info, warn};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use url::Url;

use crate::error::CensusResult;

/// Prefixes bare hosts with `http://`. Other schemes are kept so the probe
/// reports them as connection failures instead of silently dropping them.
pub fn normalize_target(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let target = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    match Url::parse(&target) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => warn!("{}: unsupported scheme '{}'", target, url.scheme()),
        Err(e) => warn!("{}: not a valid URL ({})", target, e),
    }
    Some(target)
}

pub fn read_targets<R: BufRead>(reader: R) -> CensusResult<Vec<String>> {
    let mut targets = Vec::new();
    for line in reader.lines() {
        if let Some(target) = normalize_target(&line?) {
            targets.push(target);
        }
    }
    Ok(targets)
}

pub fn load_targets(path: &Path) -> CensusResult<Vec<String>> {
    let file = File::open(path)?;
    read_targets(BufReader::new(file))
}

/// Drops repeated URLs, keeping the first occurrence of each.
pub fn dedup_targets(targets: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    targets
        .into_iter()
        .filter(|target| seen.insert(target.clone()))
        .collect()
}

/// Combines command-line URLs with an optional input file.
pub fn collect_targets(
    urls: &[String],
    input_file: Option<&Path>,
    dedup: bool,
) -> CensusResult<Vec<String>> {
    let mut targets: Vec<String> = urls.iter().filter_map(|u| normalize_target(u)).collect();
    if let Some(path) = input_file {
        targets.extend(load_targets(path)?);
    }
    if dedup {
        let before = targets.len();
        targets = dedup_targets(targets);
        if before != targets.len() {
            info!("removed {} duplicate url(s)", before - targets.len());
        }
    }
    Ok(targets)
}
