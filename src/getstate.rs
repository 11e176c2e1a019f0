// File: getstate.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, AtomicU64, AtomicUsize, Ordering};

use crate::observation::Outcome;

/// Run counters shared between probing tasks.
#[derive(Debug, Default)]
pub struct GetState {
    total_requests: AtomicU64,
    successful_requests: AtomicUsize,
    timeouts: AtomicUsize,
    connection_errors: AtomicUsize,
    http_errors: AtomicUsize,
    start_time: AtomicI64,
    end_time: AtomicI64,
}

impl GetState {
    pub fn new() -> GetState {
        GetState::default()
    }

    pub fn record(&self, outcome: Outcome) {
        let counter = match outcome {
            Outcome::Success => &self.successful_requests,
            Outcome::Timeout => &self.timeouts,
            Outcome::ConnectionError => &self.connection_errors,
            Outcome::HttpError => &self.http_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    pub fn set_total_requests(&self, total_requests: u64) {
        self.total_requests.store(total_requests, Ordering::Relaxed);
    }

    pub fn successful_requests(&self) -> usize {
        self.successful_requests.load(Ordering::Relaxed)
    }

    pub fn failed_requests(&self) -> usize {
        self.timeouts() + self.connection_errors() + self.http_errors()
    }

    pub fn timeouts(&self) -> usize {
        self.timeouts.load(Ordering::Relaxed)
    }

    pub fn connection_errors(&self) -> usize {
        self.connection_errors.load(Ordering::Relaxed)
    }

    pub fn http_errors(&self) -> usize {
        self.http_errors.load(Ordering::Relaxed)
    }

    pub fn completed_requests(&self) -> usize {
        self.successful_requests() + self.failed_requests()
    }

    pub fn mark_start(&self) {
        self.start_time
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    pub fn mark_end(&self) {
        self.end_time
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.start_time.load(Ordering::Relaxed))
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.end_time.load(Ordering::Relaxed))
    }

    pub fn elapsed_ms(&self) -> i64 {
        let start = self.start_time.load(Ordering::Relaxed);
        let end = self.end_time.load(Ordering::Relaxed);
        (end - start).max(0)
    }

    pub fn summary(&self) -> String {
        let format_time = |time: Option<DateTime<Utc>>| {
            time.map_or_else(
                || "-".to_string(),
                |t| t.format("%Y-%m-%d %H:%M:%S").to_string(),
            )
        };
        format!(
            "{} requests. Started at {} / Ended at {}. {} ms. Successful: {}. Timeouts: {}. Connection errors: {}. HTTP errors: {}.",
            self.total_requests(),
            format_time(self.start_time()),
            format_time(self.end_time()),
            self.elapsed_ms(),
            self.successful_requests(),
            self.timeouts(),
            self.connection_errors(),
            self.http_errors()
        )
    }
}
