// File: observation.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::attribute::{split_server_banner, Attribute, UNAVAILABLE};
use crate::error::CensusError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Timeout,
    ConnectionError,
    HttpError,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Timeout => "timeout",
            Outcome::ConnectionError => "connection_error",
            Outcome::HttpError => "http_error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

/// The terminal result of probing one URL. Attribute values exist exactly
/// when the outcome is `Success`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawObservation")]
pub struct Observation {
    url: String,
    outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    attributes: Option<BTreeMap<Attribute, String>>,
}

#[derive(Deserialize)]
struct RawObservation {
    url: String,
    outcome: Outcome,
    #[serde(default)]
    attributes: Option<BTreeMap<Attribute, String>>,
}

impl Observation {
    pub fn from_headers(url: impl Into<String>, headers: &HeaderMap) -> Self {
        let attributes = Attribute::ALL
            .iter()
            .map(|attribute| (*attribute, attribute.extract(headers)))
            .collect();
        Observation {
            url: url.into(),
            outcome: Outcome::Success,
            attributes: Some(attributes),
        }
    }

    /// Records a failed probe. Passing `Outcome::Success` is a caller bug.
    pub fn failed(url: impl Into<String>, outcome: Outcome) -> Self {
        assert!(
            !outcome.is_success(),
            "a failed observation cannot carry a success outcome"
        );
        Observation {
            url: url.into(),
            outcome,
            attributes: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    pub fn attributes(&self) -> Option<&BTreeMap<Attribute, String>> {
        self.attributes.as_ref()
    }

    pub fn value(&self, attribute: Attribute) -> Option<&str> {
        self.attributes
            .as_ref()
            .and_then(|attributes| attributes.get(&attribute))
            .map(String::as_str)
    }
}

impl TryFrom<RawObservation> for Observation {
    type Error = CensusError;

    fn try_from(raw: RawObservation) -> Result<Self, Self::Error> {
        match (raw.outcome, raw.attributes) {
            (Outcome::Success, Some(mut attributes)) => {
                if let Some(missing) = Attribute::HEADERS
                    .iter()
                    .find(|attribute| !attributes.contains_key(*attribute))
                {
                    return Err(CensusError::InvalidObservation(format!(
                        "{}: successful probe is missing '{}'",
                        raw.url, missing
                    )));
                }
                let banner = attributes
                    .get(&Attribute::Server)
                    .cloned()
                    .unwrap_or_else(|| UNAVAILABLE.to_string());
                let (name, version) = split_server_banner(&banner);
                attributes.entry(Attribute::ServerName).or_insert(name);
                attributes
                    .entry(Attribute::ServerVersion)
                    .or_insert_with(|| version.unwrap_or_else(|| UNAVAILABLE.to_string()));
                Ok(Observation {
                    url: raw.url,
                    outcome: Outcome::Success,
                    attributes: Some(attributes),
                })
            }
            (Outcome::Success, None) => Err(CensusError::InvalidObservation(format!(
                "{}: successful probe without attributes",
                raw.url
            ))),
            (outcome, None) => Ok(Observation {
                url: raw.url,
                outcome,
                attributes: None,
            }),
            (outcome, Some(_)) => Err(CensusError::InvalidObservation(format!(
                "{}: {} probe must not carry attributes",
                raw.url,
                outcome.label()
            ))),
        }
    }
}

/// Every observation of one probing run, in completion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservationSet {
    observations: Vec<Observation>,
}

impl ObservationSet {
    pub fn new(observations: Vec<Observation>) -> Self {
        ObservationSet { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.observations
            .iter()
            .filter(|observation| observation.outcome() == outcome)
            .count()
    }
}

impl From<Vec<Observation>> for ObservationSet {
    fn from(observations: Vec<Observation>) -> Self {
        ObservationSet::new(observations)
    }
}

impl FromIterator<Observation> for ObservationSet {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        ObservationSet::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ObservationSet {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_success_populates_every_attribute() {
        let mut headers = HeaderMap::new();
        headers.insert("server", HeaderValue::from_static("nginx/1.25.3"));
        let observation = Observation::from_headers("https://example.com", &headers);

        assert!(observation.is_success());
        assert_eq!(observation.value(Attribute::Server), Some("nginx/1.25.3"));
        assert_eq!(observation.value(Attribute::XFrameOptions), Some(UNAVAILABLE));
        assert_eq!(observation.attributes().unwrap().len(), Attribute::ALL.len());
    }

    #[test]
    fn test_failure_has_no_attributes() {
        let observation = Observation::failed("https://example.com", Outcome::Timeout);
        assert_eq!(observation.outcome(), Outcome::Timeout);
        assert!(observation.attributes().is_none());
        assert_eq!(observation.value(Attribute::Server), None);
    }

    #[test]
    #[should_panic(expected = "cannot carry a success outcome")]
    fn test_failed_rejects_success() {
        let _ = Observation::failed("https://example.com", Outcome::Success);
    }

    #[test]
    fn test_json_roundtrip_keeps_invariant() {
        let set = ObservationSet::new(vec![
            Observation::from_headers("https://a.example", &HeaderMap::new()),
            Observation::failed("https://b.example", Outcome::ConnectionError),
        ]);
        let json = serde_json::to_string(&set).unwrap();
        let back: ObservationSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_deserialize_rejects_attributes_on_failure() {
        let json = r#"{"url":"https://a.example","outcome":"timeout","attributes":{"server":"nginx"}}"#;
        let result: Result<Observation, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_rejects_success_without_attributes() {
        let json = r#"{"url":"https://a.example","outcome":"success"}"#;
        let result: Result<Observation, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_derives_server_split() {
        let json = r#"{"url":"https://a.example","outcome":"success","attributes":{
            "server":"Apache/2.4.41 (Ubuntu)",
            "x_frame_options":"DENY",
            "x_content_type_options":"nosniff",
            "referrer_policy":"unavailable",
            "xss_protection":"unavailable"}}"#;
        let observation: Observation = serde_json::from_str(json).unwrap();
        assert_eq!(observation.value(Attribute::ServerName), Some("Apache"));
        assert_eq!(observation.value(Attribute::ServerVersion), Some("2.4.41"));
    }

    #[test]
    fn test_count_by_outcome() {
        let set: ObservationSet = vec![
            Observation::failed("a", Outcome::Timeout),
            Observation::failed("b", Outcome::Timeout),
            Observation::failed("c", Outcome::HttpError),
        ]
        .into();
        assert_eq!(set.count(Outcome::Timeout), 2);
        assert_eq!(set.count(Outcome::HttpError), 1);
        assert_eq!(set.count(Outcome::Success), 0);
    }
}
