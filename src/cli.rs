// File: cli.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

use crate::attribute::Attribute;
use crate::config::{default_workers, ConfigParameter, DEFAULT_RATE_LIMIT, DEFAULT_TIMEOUT};

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = env!("CARGO_PKG_DESCRIPTION"),
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(help = "URLs to probe, e.g. https://www.example.com")]
    pub urls: Vec<String>,

    #[arg(short = 'i', long = "input-file", help = "File with one URL per line")]
    pub input_file: Option<PathBuf>,

    #[arg(
        short = 't',
        long = "timeout",
        default_value_t = DEFAULT_TIMEOUT,
        help = "HTTP request timeout in seconds"
    )]
    pub timeout: u64,

    #[arg(
        short = 'w',
        long = "workers",
        help = "Number of concurrent probes [default: min(cpus, 8)]"
    )]
    pub workers: Option<usize>,

    #[arg(
        short = 'r',
        long = "rate-limit",
        default_value_t = DEFAULT_RATE_LIMIT,
        help = "Maximum requests per second"
    )]
    pub rate_limit: u32,

    #[arg(long = "dedup", help = "Probe each distinct URL only once")]
    pub dedup: bool,

    #[command(flatten)]
    pub output: OutputArgs,

    #[arg(
        long = "log-level",
        default_value = "warn",
        value_parser = parse_log_level,
        help = "Log level: off, error, warn, info, debug or trace",
        global = true
    )]
    pub log_level: LevelFilter,

    #[arg(
        short = 'q',
        long = "quiet",
        help = "Hide the progress bar and run summary",
        global = true
    )]
    pub quiet: bool,

    #[arg(long = "no-color", help = "Disable colored output", global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recompute statistics from a previous JSON export without probing
    Report(ReportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    #[arg(
        short = 's',
        long = "stats",
        value_delimiter = ',',
        help = "Attributes to report (server, x_frame_options, x_content_type_options, referrer_policy, xss_protection, server_name, server_version)",
        global = true
    )]
    pub stats: Vec<Attribute>,

    #[arg(
        long = "server-versions",
        help = "Break server names down by version",
        global = true
    )]
    pub server_versions: bool,

    #[arg(short = 'j', long = "json", help = "Write a JSON report to this path", global = true)]
    pub json: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[arg(help = "JSON file written by --json")]
    pub input: PathBuf,
}

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

fn parse_log_level(value: &str) -> Result<LevelFilter, String> {
    if !LOG_LEVELS.contains(&value.to_ascii_lowercase().as_str()) {
        return Err(format!("expected one of {}", LOG_LEVELS.join(", ")));
    }
    value
        .parse::<LevelFilter>()
        .map_err(|_| format!("expected one of {}", LOG_LEVELS.join(", ")))
}

impl OutputArgs {
    /// Falls back to every header-backed attribute when none were asked for.
    pub fn attributes(&self) -> Vec<Attribute> {
        if self.stats.is_empty() {
            return Attribute::HEADERS.to_vec();
        }
        let mut attributes = Vec::with_capacity(self.stats.len());
        for attribute in &self.stats {
            if !attributes.contains(attribute) {
                attributes.push(*attribute);
            }
        }
        attributes
    }
}

impl Cli {
    pub fn to_config(&self) -> ConfigParameter {
        let mut config = ConfigParameter::new();
        config.set_timeout(self.timeout);
        config.set_workers(self.workers.unwrap_or_else(default_workers));
        config.set_rate_limit(self.rate_limit);
        config.set_dedup(self.dedup);
        config.set_progress(!self.quiet);
        config
    }
}
