// File: lib.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::bool_assert_comparison)]
#![allow(clippy::new_without_default)]

pub mod attribute;
pub mod cli;
pub mod config;
pub mod error;
pub mod getstate;
pub mod observation;
pub mod probe;
pub mod report;
pub mod scheduler;
pub mod stats;
pub mod targets;

#[cfg(test)]
mod report_tests;
