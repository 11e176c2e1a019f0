// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::error::{CensusError, CensusResult};

pub const DEFAULT_TIMEOUT: u64 = 10;
pub const MAX_DEFAULT_WORKERS: usize = 8;
pub const DEFAULT_RATE_LIMIT: u32 = 50;

pub fn default_workers() -> usize {
    num_cpus::get().clamp(1, MAX_DEFAULT_WORKERS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigParameter {
    timeout: u64,
    workers: usize,
    rate_limit: u32,
    dedup: bool,
    progress: bool,
}

impl Default for ConfigParameter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigParameter {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            workers: default_workers(),
            rate_limit: DEFAULT_RATE_LIMIT,
            dedup: false,
            progress: true,
        }
    }

    pub fn set_timeout(&mut self, timeout: u64) {
        self.timeout = timeout;
    }

    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    pub fn set_workers(&mut self, workers: usize) {
        self.workers = workers;
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn set_rate_limit(&mut self, rate_limit: u32) {
        self.rate_limit = rate_limit;
    }

    pub fn rate_limit(&self) -> u32 {
        self.rate_limit
    }

    pub fn set_dedup(&mut self, dedup: bool) {
        self.dedup = dedup;
    }

    pub fn dedup(&self) -> bool {
        self.dedup
    }

    pub fn set_progress(&mut self, progress: bool) {
        self.progress = progress;
    }

    pub fn progress(&self) -> bool {
        self.progress
    }

    pub fn validate(&self) -> CensusResult<()> {
        if self.timeout == 0 {
            return Err(CensusError::Configuration(
                "timeout must be at least one second".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(CensusError::Configuration(
                "worker count must be at least one".to_string(),
            ));
        }
        if self.rate_limit == 0 {
            return Err(CensusError::Configuration(
                "rate limit must be at least one request per second".to_string(),
            ));
        }
        Ok(())
    }
}
