// File: main.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use simple_logger::SimpleLogger;
use std::sync::Arc;

use hdrcensus::cli::{Cli, Commands};
use hdrcensus::getstate::GetState;
use hdrcensus::observation::ObservationSet;
use hdrcensus::report::{load_observations, CensusReport, ReportFormat, ReportGenerator};
use hdrcensus::scheduler::Scheduler;
use hdrcensus::targets::collect_targets;

fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message);
}

fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue().bold(), message);
}

async fn run_scan(cli: &Cli) -> Result<ObservationSet> {
    let config = cli.to_config();
    let targets = collect_targets(&cli.urls, cli.input_file.as_deref(), config.dedup())
        .context("failed to read target list")?;
    if targets.is_empty() {
        print_warning("No URLs given. Pass them as arguments or with --input-file.");
    }

    let state = Arc::new(GetState::new());
    let scheduler =
        Scheduler::new(Arc::clone(&state), &config).context("invalid scan configuration")?;
    let observations = scheduler.probe_all(&targets).await;

    if !cli.quiet {
        print_info(&state.summary());
    }
    Ok(observations)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    SimpleLogger::new()
        .with_level(cli.log_level)
        .init()
        .context("failed to initialise logger")?;

    let observations = match &cli.command {
        Some(Commands::Report(args)) => load_observations(&args.input)
            .with_context(|| format!("failed to load {}", args.input.display()))?,
        None => run_scan(&cli).await?,
    };

    let report = CensusReport::new(
        observations,
        &cli.output.attributes(),
        cli.output.server_versions,
    );
    print!("{}", ReportGenerator::render_text(&report));

    if let Some(path) = &cli.output.json {
        ReportGenerator::generate_report(&report, path, ReportFormat::Json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        print_success(&format!("Report saved to: {}", path.display()));
    }

    Ok(())
}
