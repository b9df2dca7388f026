//! Getting the extractor to run inside a tab.
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `config` | Tier timeouts and settle delay |
//! | `host` | [`TabHost`] trait and restricted-page check |
//! | `strategy` | [`DeliveryStrategy`] and its three tiers |
//!
//! # Example
//!
//! ```ignore
//! let strategy = DeliveryStrategy::new(DeliveryConfig::default());
//! let request = ExtractionRequest::new("a[href]", "href")?;
//!
//! match strategy.deliver(&tab, &request, &TracingStatus).await {
//!     DeliveryOutcome::Success(values) => println!("{} links", values.len()),
//!     DeliveryOutcome::Failure(e) => eprintln!("{e}"),
//! }
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod config;
mod host;
mod strategy;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{AGENT_TIMEOUT, DeliveryConfig, INJECTED_TIMEOUT, SETTLE_DELAY};
pub use host::{RESTRICTED_PREFIXES, TabHost, is_restricted};
pub use strategy::{DeliveryOutcome, DeliveryStrategy, Tier};
