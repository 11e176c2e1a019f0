// File: stats.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::attribute::{Attribute, UNAVAILABLE};
use crate::observation::{Observation, Outcome};

/// Label → percentage of the observations that produced it, rounded to two
/// decimals. Iteration order is unspecified; use [`Distribution::sorted`]
/// for presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distribution {
    percentages: HashMap<String, f64>,
}

impl Distribution {
    pub fn get(&self, label: &str) -> Option<f64> {
        self.percentages.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.percentages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.percentages.is_empty()
    }

    pub fn as_map(&self) -> &HashMap<String, f64> {
        &self.percentages
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.percentages
            .iter()
            .map(|(label, percentage)| (label.as_str(), *percentage))
    }

    pub fn total(&self) -> f64 {
        self.percentages.values().sum()
    }

    /// Descending by percentage, ties broken by label.
    pub fn sorted(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self.iter().collect();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        entries
    }
}

/// Per-call tally. Built fresh for every aggregation.
#[derive(Debug, Default)]
struct LabelCounter {
    counts: HashMap<String, usize>,
    total: usize,
}

impl LabelCounter {
    fn record(&mut self, label: &str) {
        *self.counts.entry(label.to_string()).or_insert(0) += 1;
        self.total += 1;
    }

    fn into_distribution(self) -> Distribution {
        if self.total == 0 {
            return Distribution::default();
        }
        let total = self.total as f64;
        let percentages = self
            .counts
            .into_iter()
            .map(|(label, count)| (label, round_percentage(count as f64 / total * 100.0)))
            .collect();
        Distribution { percentages }
    }
}

fn round_percentage(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// The single label an observation contributes for `attribute`.
fn label_for(observation: &Observation, attribute: Attribute) -> &str {
    match observation.outcome() {
        Outcome::Success => match observation.value(attribute) {
            Some(value) if value != UNAVAILABLE => value,
            Some(_) => UNAVAILABLE,
            None => panic!(
                "successful observation for {} has no value for '{}'",
                observation.url(),
                attribute
            ),
        },
        failure => failure.label(),
    }
}

pub fn distribution<'a, I>(observations: I, attribute: Attribute) -> Distribution
where
    I: IntoIterator<Item = &'a Observation>,
{
    let mut counter = LabelCounter::default();
    for observation in observations {
        counter.record(label_for(observation, attribute));
    }
    counter.into_distribution()
}

pub fn distributions<'a, I>(observations: I, attributes: &[Attribute]) -> BTreeMap<Attribute, Distribution>
where
    I: IntoIterator<Item = &'a Observation> + Copy,
{
    attributes
        .iter()
        .map(|attribute| (*attribute, distribution(observations, *attribute)))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NestedDistribution {
    pub primary: Distribution,
    pub breakdown: BTreeMap<String, Distribution>,
}

impl NestedDistribution {
    pub fn secondary(&self, primary_label: &str) -> Option<&Distribution> {
        self.breakdown.get(primary_label)
    }
}

/// Distribution of `primary` plus, for every real primary value, the
/// distribution of `secondary` within that group. Failed probes and
/// sentinel values only show up in the primary distribution.
pub fn nested_distribution<'a, I>(
    observations: I,
    primary: Attribute,
    secondary: Attribute,
) -> NestedDistribution
where
    I: IntoIterator<Item = &'a Observation> + Copy,
{
    let mut groups: BTreeMap<String, LabelCounter> = BTreeMap::new();
    for observation in observations {
        if !observation.is_success() {
            continue;
        }
        let primary_label = label_for(observation, primary);
        if primary_label == UNAVAILABLE {
            continue;
        }
        groups
            .entry(primary_label.to_string())
            .or_default()
            .record(label_for(observation, secondary));
    }

    NestedDistribution {
        primary: distribution(observations, primary),
        breakdown: groups
            .into_iter()
            .map(|(label, counter)| (label, counter.into_distribution()))
            .collect(),
    }
}

pub fn server_versions<'a, I>(observations: I) -> NestedDistribution
where
    I: IntoIterator<Item = &'a Observation> + Copy,
{
    nested_distribution(observations, Attribute::ServerName, Attribute::ServerVersion)
}
