// File: report_tests.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

#[cfg(test)]
mod tests {
    use crate::attribute::Attribute;
    use crate::observation::{Observation, ObservationSet, Outcome};
    use crate::report::*;
    use reqwest::header::{HeaderMap, HeaderValue};
    use serde_json::Value;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_observations() -> ObservationSet {
        let mut nginx = HeaderMap::new();
        nginx.insert("server", HeaderValue::from_static("nginx/1.18.0"));
        nginx.insert("x-frame-options", HeaderValue::from_static("DENY"));

        let mut apache = HeaderMap::new();
        apache.insert("server", HeaderValue::from_static("Apache/2.4.41"));

        vec![
            Observation::from_headers("https://example.com", &nginx),
            Observation::from_headers("https://test.com", &nginx),
            Observation::from_headers("https://apache.example", &apache),
            Observation::failed("https://failed.com", Outcome::Timeout),
        ]
        .into()
    }

    #[test]
    fn test_report_summary_counts_outcomes() {
        let report = CensusReport::new(create_test_observations(), &Attribute::HEADERS, false);
        assert_eq!(report.summary.total, 4);
        assert_eq!(report.summary.success, 3);
        assert_eq!(report.summary.timeout, 1);
        assert_eq!(report.summary.connection_error, 0);
        assert_eq!(report.statistics.len(), Attribute::HEADERS.len());
        assert!(report.server_versions.is_none());
    }

    #[test]
    fn test_render_text_blocks() {
        let report = CensusReport::new(
            create_test_observations(),
            &[Attribute::Server, Attribute::XFrameOptions],
            false,
        );
        let text = ReportGenerator::render_text(&report);

        assert!(text.contains("Statistics for: Server\n"));
        assert!(text.contains("Statistics for: X-Frame-Options\n"));
        assert!(text.contains("- nginx/1.18.0: 50.00%\n"));
        assert!(text.contains("- Apache/2.4.41: 25.00%\n"));
        assert!(text.contains("- timeout: 25.00%\n"));
        assert!(text.contains("- DENY: 50.00%\n"));
        assert!(text.contains("- unavailable: 25.00%\n"));
        assert!(!text.contains("Server Versions"));
    }

    #[test]
    fn test_render_text_sorted_descending() {
        let report = CensusReport::new(create_test_observations(), &[Attribute::Server], false);
        let text = ReportGenerator::render_text(&report);

        let nginx = text.find("- nginx/1.18.0").unwrap();
        let apache = text.find("- Apache/2.4.41").unwrap();
        assert!(nginx < apache);
    }

    #[test]
    fn test_render_text_with_server_versions() {
        let report = CensusReport::new(create_test_observations(), &[Attribute::Server], true);
        let text = ReportGenerator::render_text(&report);

        assert!(text.contains("Statistics for: Server Versions\n"));
        assert!(text.contains("- nginx: 50.00%\n    - 1.18.0: 100.00%\n"));
        assert!(text.contains("- Apache: 25.00%\n    - 2.4.41: 100.00%\n"));
    }

    #[test]
    fn test_render_empty_set() {
        let report = CensusReport::new(ObservationSet::default(), &Attribute::HEADERS, true);
        let text = ReportGenerator::render_text(&report);

        assert!(text.contains("Statistics for: Server\n"));
        assert!(!text.contains("- "));
        assert!(report.statistics.values().all(|d| d.is_empty()));
    }

    #[test]
    fn test_generate_json_report() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stats.json");
        let report = CensusReport::new(create_test_observations(), &Attribute::HEADERS, true);

        ReportGenerator::generate_report(&report, &path, ReportFormat::Json).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let json: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["summary"]["total"], 4);
        assert_eq!(json["statistics"]["server"]["timeout"], 25.0);
        assert_eq!(json["server_versions"]["breakdown"]["nginx"]["1.18.0"], 100.0);
        assert_eq!(json["observations"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_generate_text_report() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stats.txt");
        let report = CensusReport::new(create_test_observations(), &[Attribute::Server], false);

        ReportGenerator::generate_report(&report, &path, ReportFormat::Text).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("- nginx/1.18.0: 50.00%"));
    }

    #[test]
    fn test_load_observations_from_report() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stats.json");
        let observations = create_test_observations();
        let report = CensusReport::new(observations.clone(), &Attribute::HEADERS, false);
        ReportGenerator::generate_report(&report, &path, ReportFormat::Json).unwrap();

        let loaded = load_observations(&path).unwrap();
        assert_eq!(loaded, observations);
    }

    #[test]
    fn test_load_observations_from_bare_array() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("observations.json");
        fs::write(
            &path,
            r#"[{"url":"https://a.example","outcome":"connection_error"}]"#,
        )
        .unwrap();

        let loaded = load_observations(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.count(Outcome::ConnectionError), 1);
    }

    #[test]
    fn test_load_observations_rejects_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(
            &path,
            r#"{"observations":[{"url":"https://a.example","outcome":"success"}]}"#,
        )
        .unwrap();

        assert!(load_observations(&path).is_err());
    }
}
