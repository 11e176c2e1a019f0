// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::attribute::Attribute;
use crate::error::{CensusError, CensusResult};
use crate::observation::{ObservationSet, Outcome};
use crate::stats::{distributions, server_versions, Distribution, NestedDistribution};

const RULE_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeSummary {
    pub total: usize,
    pub success: usize,
    pub timeout: usize,
    pub connection_error: usize,
    pub http_error: usize,
}

impl OutcomeSummary {
    pub fn from_observations(observations: &ObservationSet) -> Self {
        OutcomeSummary {
            total: observations.len(),
            success: observations.count(Outcome::Success),
            timeout: observations.count(Outcome::Timeout),
            connection_error: observations.count(Outcome::ConnectionError),
            http_error: observations.count(Outcome::HttpError),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CensusReport {
    pub generated_at: DateTime<Utc>,
    pub summary: OutcomeSummary,
    pub statistics: BTreeMap<Attribute, Distribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_versions: Option<NestedDistribution>,
    pub observations: ObservationSet,
}

impl CensusReport {
    pub fn new(
        observations: ObservationSet,
        attributes: &[Attribute],
        include_server_versions: bool,
    ) -> Self {
        let statistics = distributions(&observations, attributes);
        let server_versions = include_server_versions.then(|| server_versions(&observations));
        CensusReport {
            generated_at: Utc::now(),
            summary: OutcomeSummary::from_observations(&observations),
            statistics,
            server_versions,
            observations,
        }
    }
}

pub struct ReportGenerator;

impl ReportGenerator {
    pub fn render(report: &CensusReport, format: ReportFormat) -> CensusResult<String> {
        match format {
            ReportFormat::Text => Ok(Self::render_text(report)),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        }
    }

    pub fn render_text(report: &CensusReport) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut output = String::new();

        for (attribute, distribution) in &report.statistics {
            output.push('\n');
            output.push_str(&format!("{}\n", rule));
            output.push_str(&format!("Statistics for: {}\n", attribute.title()));
            output.push_str(&format!("{}\n", rule));
            push_entries(&mut output, distribution, "");
            output.push_str(&format!("{}\n", rule));
        }

        if let Some(nested) = &report.server_versions {
            output.push('\n');
            output.push_str(&format!("{}\n", rule));
            output.push_str("Statistics for: Server Versions\n");
            output.push_str(&format!("{}\n", rule));
            for (name, percentage) in nested.primary.sorted() {
                output.push_str(&format!("- {}: {:.2}%\n", name, percentage));
                if let Some(versions) = nested.secondary(name) {
                    push_entries(&mut output, versions, "    ");
                }
            }
            output.push_str(&format!("{}\n", rule));
        }

        output
    }

    pub fn generate_report(
        report: &CensusReport,
        output_path: &Path,
        format: ReportFormat,
    ) -> CensusResult<()> {
        let rendered = Self::render(report, format)?;
        let mut file = File::create(output_path)?;
        writeln!(file, "{}", rendered)?;
        Ok(())
    }
}

fn push_entries(output: &mut String, distribution: &Distribution, indent: &str) {
    for (label, percentage) in distribution.sorted() {
        output.push_str(&format!("{}- {}: {:.2}%\n", indent, label, percentage));
    }
}

/// Reads observations back from a JSON export, either a full report or a
/// bare array of observations.
pub fn load_observations(path: &Path) -> CensusResult<ObservationSet> {
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    let observations = match value {
        serde_json::Value::Object(mut map) => map.remove("observations").ok_or_else(|| {
            CensusError::InvalidObservation(format!(
                "{}: no 'observations' field",
                path.display()
            ))
        })?,
        other => other,
    };
    Ok(serde_json::from_value(observations)?)
}
