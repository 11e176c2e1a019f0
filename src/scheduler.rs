// File: scheduler.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use futures::stream::{self, StreamExt};
use governor::{clock::DefaultClock, state::InMemoryState, state::NotKeyed, Quota, RateLimiter};
use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use log::{debug, info};
use std::fmt::Write;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ConfigParameter;
use crate::error::{CensusError, CensusResult};
use crate::getstate::GetState;
use crate::observation::{Observation, ObservationSet};
use crate::probe::Prober;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Runs the prober over a batch of URLs with at most `workers` probes in
/// flight. Every input URL, duplicates included, yields one observation.
#[derive(Clone)]
pub struct Scheduler {
    prober: Arc<Prober>,
    state: Arc<GetState>,
    workers: usize,
    rate_limiter: Arc<DirectRateLimiter>,
    progress: bool,
}

impl Scheduler {
    pub fn new(state: Arc<GetState>, config: &ConfigParameter) -> CensusResult<Self> {
        config.validate()?;
        let rate_limit = NonZeroU32::new(config.rate_limit()).ok_or_else(|| {
            CensusError::Configuration("rate limit must be positive".to_string())
        })?;
        let prober = Prober::new(Duration::from_secs(config.timeout()))?;
        let mut scheduler = Self::with_prober(prober, state, config.workers(), rate_limit);
        scheduler.set_progress(config.progress());
        Ok(scheduler)
    }

    pub fn with_prober(
        prober: Prober,
        state: Arc<GetState>,
        workers: usize,
        rate_limit: NonZeroU32,
    ) -> Self {
        Scheduler {
            prober: Arc::new(prober),
            state,
            workers: workers.max(1),
            rate_limiter: Arc::new(RateLimiter::direct(Quota::per_second(rate_limit))),
            progress: false,
        }
    }

    pub fn set_progress(&mut self, progress: bool) {
        self.progress = progress;
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    fn progress_bar(&self, total: u64) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.green/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("eta", |state: &ProgressState, w: &mut dyn Write| {
            let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
        })
        .progress_chars("█▉▊▋▌▍▎▏  ");
        pb.set_style(style);
        pb.set_message("Getting sites infos");
        pb
    }

    pub async fn probe_all(&self, urls: &[String]) -> ObservationSet {
        self.state.set_total_requests(urls.len() as u64);
        self.state.mark_start();
        info!(
            "probing {} url(s) with {} worker(s), {}s timeout",
            urls.len(),
            self.workers,
            self.prober.timeout().as_secs()
        );

        let pb = self.progress_bar(urls.len() as u64);
        let mut completed = stream::iter(urls.iter().cloned())
            .map(|url| {
                let prober = Arc::clone(&self.prober);
                let state = Arc::clone(&self.state);
                let rate_limiter = Arc::clone(&self.rate_limiter);
                tokio::spawn(async move {
                    rate_limiter.until_ready().await;
                    let observation = prober.probe(&url).await;
                    state.record(observation.outcome());
                    observation
                })
            })
            .buffer_unordered(self.workers);

        let mut observations: Vec<Observation> = Vec::with_capacity(urls.len());
        while let Some(joined) = completed.next().await {
            match joined {
                Ok(observation) => {
                    debug!(
                        "{} -> {}",
                        observation.url(),
                        observation.outcome().label()
                    );
                    observations.push(observation);
                    pb.inc(1);
                }
                Err(e) => match e.try_into_panic() {
                    Ok(payload) => std::panic::resume_unwind(payload),
                    Err(e) => panic!("probe task did not complete: {}", e),
                },
            }
        }

        pb.finish_and_clear();
        self.state.mark_end();
        ObservationSet::new(observations)
    }
}
