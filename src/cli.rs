//! Command-line interface parsing for contest-cache
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into a validated [`Query`] before any network or cache access happens.

use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::data::Platform;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified platform name is not recognized
    #[error("Invalid platform: '{0}'. Valid platforms: codeforces, codechef, spoj, hackerrank, leetcode")]
    InvalidPlatform(String),
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TracingFormat {
    #[default]
    Pretty,
    Json,
}

/// contest-cache - Ongoing and upcoming programming contests
#[derive(Parser, Debug)]
#[command(name = "contest-cache")]
#[command(about = "Ongoing and upcoming programming contests, cached from clist.by")]
#[command(version)]
pub struct Cli {
    /// Only show contests from this platform (repeatable)
    ///
    /// Valid platforms: codeforces, codechef, spoj, hackerrank, leetcode
    #[arg(long = "platform", value_name = "SITE")]
    pub platforms: Vec<String>,

    /// Print the listing as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = TracingFormat::Pretty)]
    pub tracing: TracingFormat,
}

/// What the user asked to see
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    /// Platforms to show; empty means all contests
    pub platforms: Vec<Platform>,
    pub json: bool,
}

/// Parses a platform string argument into a Platform.
///
/// # Returns
/// * `Ok(Platform)` if the string names a supported platform
/// * `Err(CliError::InvalidPlatform)` if it doesn't
pub fn parse_platform_arg(s: &str) -> Result<Platform, CliError> {
    Platform::from_str(s).ok_or_else(|| CliError::InvalidPlatform(s.to_string()))
}

impl Query {
    /// Creates a Query from parsed CLI arguments, validating platforms
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mut platforms = Vec::with_capacity(cli.platforms.len());
        for arg in &cli.platforms {
            let platform = parse_platform_arg(arg)?;
            if !platforms.contains(&platform) {
                platforms.push(platform);
            }
        }
        Ok(Query {
            platforms,
            json: cli.json,
        })
    }
}
