//! Tab Scraper - selector-driven page scraping with tiered in-tab delivery.
//!
//! Point a CSS selector and an attribute at the active tab; get back the
//! trimmed, non-empty values of every matching element, with `href`/`src`
//! values made absolute. Results stay in the session and export to CSV.
//!
//! # Architecture
//!
//! - **Extractor**: runs in the page; turns `(selector, attribute)` into
//!   an ordered list of strings
//! - **Delivery Strategy**: gets the extractor to run inside the tab,
//!   trying three tiers in order (existing agent, inject and retry, direct
//!   execution)
//! - **Session**: the popup's state: one cached result, status messages,
//!   CSV export
//!
//! Tabs are reached through the [`TabHost`] trait. [`DocumentTab`] hosts a
//! static HTML document in-process; [`Tab`] drives a live browser tab over
//! the extension's WebSocket bridge.
//!
//! # Quick Start
//!
//! ```no_run
//! use tab_scraper::{DocumentTab, Preset, Result, Session, TabId};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let tab = DocumentTab::load(
//!         TabId::new(1).unwrap(),
//!         "https://example.com/",
//!         "saved-page.html",
//!     )
//!     .await?;
//!
//!     let mut session = Session::builder(tab).build()?;
//!     let links = session.scrape_preset(Preset::Links).await?;
//!     println!("{} links", links.len());
//!
//!     let path = session.export_to(".").await?;
//!     println!("wrote {}", path.display());
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`agent`] | In-page agent, JavaScript assets, [`DocumentTab`] |
//! | [`browser`] | Live [`Tab`] over the bridge |
//! | [`delivery`] | [`DeliveryStrategy`] and the [`TabHost`] seam |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`export`] | CSV rendering and filenames |
//! | [`extract`] | The extractor over a parsed [`Document`] |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | Agent messages and bridge commands |
//! | [`request`] | [`ExtractionRequest`], [`ExtractionResult`], [`Preset`] |
//! | [`session`] | [`Session`], [`SessionCache`], [`Preview`] |
//! | [`status`] | Status display collaborator |
//! | [`transport`] | WebSocket bridge server and connection |

// ============================================================================
// Modules
// ============================================================================

/// In-page extraction agent.
pub mod agent;

/// Live browser tabs.
pub mod browser;

/// Tiered delivery of the extractor into a tab.
pub mod delivery;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// CSV export.
pub mod export;

/// Value extraction from HTML documents.
pub mod extract;

/// Type-safe identifiers.
pub mod identifiers;

/// Agent messages and bridge commands.
pub mod protocol;

/// Extraction requests, results and presets.
pub mod request;

/// The popup session.
pub mod session;

/// Status display collaborator.
pub mod status;

/// WebSocket transport layer.
///
/// Internal module handling the bridge server and connection.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Agent and hosts
pub use agent::{DocumentTab, ExtractionAgent, PageContext};
pub use browser::Tab;

// Delivery
pub use delivery::{DeliveryConfig, DeliveryOutcome, DeliveryStrategy, TabHost, Tier};

// Error types
pub use error::{Error, ErrorKind, Result};

// Export
pub use export::CsvExport;

// Extraction
pub use extract::{Attribute, Document, NamedAttribute, PageDiagnostics, extract};

// Identifier types
pub use identifiers::{RequestId, TabId};

// Requests
pub use request::{ExtractionRequest, ExtractionResult, Preset};

// Session
pub use session::{Preview, Session, SessionBuilder, SessionCache};

// Status
pub use status::{StatusLevel, StatusLog, StatusSink, TracingStatus};
