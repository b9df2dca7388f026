//! CSV export of scraped values.
//!
//! Format:
//!
//! ```text
//! Index,Content
//! 1,"first value"
//! 2,"value with ""quotes"""
//! ```
//!
//! Every content field is quoted with inner `"` doubled. Rows are joined
//! with `\n` and there is no trailing newline.

// ============================================================================
// Imports
// ============================================================================

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Header row.
pub const CSV_HEADER: &str = "Index,Content";

/// Filename prefix; the date and `.csv` follow.
pub const FILENAME_PREFIX: &str = "scraped-data-";

// ============================================================================
// Functions
// ============================================================================

/// Renders `values` as CSV text.
#[must_use]
pub fn to_csv(values: &[String]) -> String {
    let mut csv = String::from(CSV_HEADER);
    for (i, value) in values.iter().enumerate() {
        csv.push('\n');
        csv.push_str(&(i + 1).to_string());
        csv.push(',');
        csv.push_str(&quote(value));
    }
    csv
}

/// Returns `scraped-data-YYYY-MM-DD.csv` for `date`.
#[must_use]
pub fn export_filename(date: NaiveDate) -> String {
    format!("{FILENAME_PREFIX}{}.csv", date.format("%Y-%m-%d"))
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

// ============================================================================
// CsvExport
// ============================================================================

/// A rendered export ready to save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    filename: String,
    content: String,
}

impl CsvExport {
    /// Renders `values` with a filename for `date`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoData`] if `values` is empty.
    pub fn new(values: &[String], date: NaiveDate) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::NoData);
        }
        Ok(Self {
            filename: export_filename(date),
            content: to_csv(values),
        })
    }

    /// Renders `values` with today's (UTC) filename.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoData`] if `values` is empty.
    pub fn for_today(values: &[String]) -> Result<Self> {
        Self::new(values, Utc::now().date_naive())
    }

    /// Suggested download filename.
    #[inline]
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// CSV text.
    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Writes the file into `dir` and returns its path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be written.
    pub async fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        tokio::fs::write(&path, self.content.as_bytes()).await?;
        info!(path = %path.display(), bytes = self.content.len(), "CSV written");
        Ok(path)
    }
}

// ============================================================================
// Tests
// ============================================================================
