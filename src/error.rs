// File: error.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use std::fmt;

#[derive(Debug)]
pub enum CensusError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
    Client(reqwest::Error),
    InvalidObservation(String),
    UnknownAttribute(String),
    Configuration(String),
}

impl fmt::Display for CensusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::Client(e) => write!(f, "HTTP client error: {}", e),
            Self::InvalidObservation(msg) => write!(f, "Invalid observation: {}", msg),
            Self::UnknownAttribute(name) => write!(f, "Unknown attribute: {}", name),
            Self::Configuration(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for CensusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Serialization(e) => Some(e),
            Self::Client(e) => Some(e),
            Self::InvalidObservation(_) => None,
            Self::UnknownAttribute(_) => None,
            Self::Configuration(_) => None,
        }
    }
}

impl From<std::io::Error> for CensusError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<serde_json::Error> for CensusError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error)
    }
}

impl From<reqwest::Error> for CensusError {
    fn from(error: reqwest::Error) -> Self {
        Self::Client(error)
    }
}

pub type CensusResult<T> = Result<T, CensusError>;
