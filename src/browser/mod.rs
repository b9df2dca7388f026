//! Live browser tabs reached through the extension bridge.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Tab`] | A tab driven over the bridge [`Connection`](crate::transport::Connection) |
//!
//! # Example
//!
//! ```no_run
//! use tab_scraper::{Result, Session, Tab};
//! use tab_scraper::transport::PendingServer;
//!
//! # async fn example() -> Result<()> {
//! let server = PendingServer::bind_localhost().await?;
//! println!("bridge url: {}", server.ws_url());
//!
//! let tab = Tab::connect(server).await?;
//! let mut session = Session::builder(tab).build()?;
//! session.scrape("h1, h2, h3", "textContent").await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Bridge-backed tab.
pub mod tab;

// ============================================================================
// Re-exports
// ============================================================================

pub use tab::Tab;
