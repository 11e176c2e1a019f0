// File: probe.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use log::{debug, trace};
use std::time::Duration;

use crate::error::CensusResult;
use crate::observation::{Observation, Outcome};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Issues a single bounded GET per URL and turns the result into an
/// [`Observation`]. The response body is never read.
#[derive(Debug, Clone)]
pub struct Prober {
    client: reqwest::Client,
    timeout: Duration,
}

impl Prober {
    pub fn new(timeout: Duration) -> CensusResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::with_client(client, timeout))
    }

    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Prober { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn probe(&self, url: &str) -> Observation {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .and_then(|resp| resp.error_for_status());

        match response {
            Ok(resp) => {
                trace!("{} answered {}", url, resp.status());
                Observation::from_headers(url, resp.headers())
            }
            Err(e) => {
                let outcome = classify(&e);
                debug!("{} failed with {}: {}", url, outcome.label(), e);
                Observation::failed(url, outcome)
            }
        }
    }
}

/// Maps a client error onto the failure taxonomy. Anything that is neither
/// a timeout nor a status error never produced a usable response and counts
/// as a connection failure: DNS, refused connections, TLS, malformed URLs
/// and redirect loops.
pub fn classify(error: &reqwest::Error) -> Outcome {
    if error.is_timeout() {
        Outcome::Timeout
    } else if error.is_status() {
        Outcome::HttpError
    } else {
        Outcome::ConnectionError
    }
}
