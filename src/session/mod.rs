//! The popup session: scrape, remember, export.
//!
//! A [`Session`] ties a tab host to a [`DeliveryStrategy`], a status
//! display and a [`SessionCache`]. `scrape` takes `&mut self`, so one
//! session runs at most one delivery at a time.
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `builder` | [`SessionBuilder`] |
//! | `cache` | [`SessionCache`] single-slot result holder |
//! | `preview` | [`Preview`] of a result for display |

// ============================================================================
// Submodules
// ============================================================================

mod builder;
mod cache;
mod preview;

// ============================================================================
// Imports
// ============================================================================

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::delivery::{DeliveryOutcome, DeliveryStrategy, TabHost};
use crate::error::{Error, Result};
use crate::export::CsvExport;
use crate::extract::Attribute;
use crate::request::{ExtractionRequest, ExtractionResult, Preset};
use crate::status::{StatusLevel, StatusSink};

pub use builder::SessionBuilder;
pub use cache::SessionCache;
pub use preview::{PREVIEW_CHARS, PREVIEW_ITEMS, Preview};

// ============================================================================
// Constants
// ============================================================================

/// Appended to failure messages.
const FAILURE_GUIDANCE: &str =
    "Try reloading the page and the extension, and make sure this is a regular webpage.";

// ============================================================================
// Session
// ============================================================================

/// One popup session over a tab.
pub struct Session<H> {
    host: H,
    strategy: DeliveryStrategy,
    status: Arc<dyn StatusSink>,
    cache: SessionCache,
}

impl<H: std::fmt::Debug> std::fmt::Debug for Session<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("host", &self.host)
            .field("strategy", &self.strategy)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl<H: TabHost> Session<H> {
    /// Starts configuring a session over `host`.
    #[inline]
    #[must_use]
    pub fn builder(host: H) -> SessionBuilder<H> {
        SessionBuilder::new(host)
    }

    /// Returns the tab host.
    #[inline]
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Returns the result cache.
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    /// Returns a preview of the cached result, if any.
    #[must_use]
    pub fn preview(&self) -> Option<Preview> {
        self.cache.get().map(|r| Preview::new(r))
    }

    /// Scrapes `selector`/`attribute` from the tab and caches the result.
    ///
    /// Progress and the outcome are reported to the status display.
    /// An empty result is cached and reported as "no elements found".
    ///
    /// # Errors
    ///
    /// - [`Error::EmptySelector`] before delivery
    /// - [`Error::RestrictedPage`] or [`Error::AllTiersExhausted`] from delivery
    pub async fn scrape(
        &mut self,
        selector: &str,
        attribute: impl Into<Attribute>,
    ) -> Result<&ExtractionResult> {
        let request = match ExtractionRequest::new(selector, attribute) {
            Ok(request) => request,
            Err(e) => {
                self.report_failure(&e);
                return Err(e);
            }
        };
        self.run(request).await
    }

    /// Scrapes one of the built-in presets.
    ///
    /// # Errors
    ///
    /// See [`Session::scrape`].
    pub async fn scrape_preset(&mut self, preset: Preset) -> Result<&ExtractionResult> {
        self.run(ExtractionRequest::from(preset)).await
    }

    /// Renders the cached result as CSV.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoData`] if nothing non-empty has been scraped.
    pub fn export_csv(&self) -> Result<CsvExport> {
        let values = self.cache.get().map(|r| r.as_slice()).unwrap_or_default();
        match CsvExport::for_today(values) {
            Ok(export) => Ok(export),
            Err(e) => {
                self.status.post("No data to export", StatusLevel::Error);
                Err(e)
            }
        }
    }

    /// Writes the cached result as CSV into `dir`.
    ///
    /// # Errors
    ///
    /// - [`Error::NoData`] if nothing non-empty has been scraped
    /// - [`Error::Io`] if the file cannot be written
    pub async fn export_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let export = self.export_csv()?;
        match export.write_to(dir).await {
            Ok(path) => {
                self.status
                    .post("CSV exported successfully!", StatusLevel::Success);
                Ok(path)
            }
            Err(e) => {
                self.report_failure(&e);
                Err(e)
            }
        }
    }

    async fn run(&mut self, request: ExtractionRequest) -> Result<&ExtractionResult> {
        debug!(
            selector = request.selector(),
            attribute = %request.attribute(),
            "Scrape requested"
        );
        self.status.post("Starting scrape...", StatusLevel::Progress);

        let outcome = self
            .strategy
            .deliver(&self.host, &request, self.status.as_ref())
            .await;

        match outcome {
            DeliveryOutcome::Success(result) => {
                let count = result.len();
                if count > 0 {
                    self.status
                        .post(&format!("Found {count} elements"), StatusLevel::Success);
                } else {
                    self.status.post(
                        "No elements found with that selector",
                        StatusLevel::Error,
                    );
                }
                info!(count, "Scrape finished");
                Ok(self.cache.store(result))
            }
            DeliveryOutcome::Failure(e) => {
                self.report_failure(&e);
                Err(e)
            }
        }
    }

    fn report_failure(&self, error: &Error) {
        error!(error = %error, kind = ?error.kind(), "Scrape failed");
        let message = match error {
            Error::EmptySelector => error.to_string(),
            e if e.is_request_error() => format!("Error: {e}"),
            e => format!("Error: {e} {FAILURE_GUIDANCE}"),
        };
        self.status.post(&message, StatusLevel::Error);
    }
}

// ============================================================================
// Tests
// ============================================================================
