//! Shared utilities for demos.
//!
//! Provides common functionality used across all demos:
//! - Command-line argument parsing
//! - Logging initialization
//! - Status display on stdout

#![allow(dead_code)]

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use tab_scraper::{StatusLevel, StatusSink};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Types
// ============================================================================

/// Command-line arguments for demos.
///
/// Flags: `--debug`, `--no-export`. Positional: `[page] [selector] [attribute]`.
#[derive(Debug, Clone)]
pub struct Args {
    pub debug: bool,
    pub no_export: bool,
    pub positional: Vec<String>,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self {
            debug: args.iter().any(|a| a == "--debug"),
            no_export: args.iter().any(|a| a == "--no-export"),
            positional: args.into_iter().filter(|a| !a.starts_with("--")).collect(),
        }
    }

    /// Positional argument `index`, or `default`.
    pub fn arg(&self, index: usize, default: &str) -> String {
        self.positional
            .get(index)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// Output directory for CSV files.
    pub fn out_dir(&self) -> PathBuf {
        std::env::temp_dir()
    }
}

/// Prints status messages the way the popup shows them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleStatus;

impl StatusSink for ConsoleStatus {
    fn show(&self, message: &str, level: StatusLevel, dismiss_after: Duration) {
        let marker = match level {
            StatusLevel::Progress => "..",
            StatusLevel::Success => "ok",
            StatusLevel::Error => "!!",
        };
        println!("    [{marker}] {message} ({}ms)", dismiss_after.as_millis());
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Initialize tracing/logging.
pub fn init_logging(debug: bool) {
    let filter = if debug {
        "tab_scraper=debug"
    } else {
        "tab_scraper=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}
