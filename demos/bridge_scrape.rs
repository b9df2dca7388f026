//! Scraping a live tab through the extension bridge.
//!
//! Demonstrates:
//! - Binding the bridge server and waiting for the extension
//! - Delivering a request through the three tiers over WebSocket
//! - Exporting the result
//!
//! The extension's background script must connect to the printed URL and
//! send READY for the active tab.
//!
//! Usage:
//!   cargo run --example bridge_scrape
//!   cargo run --example bridge_scrape -- "h1, h2" textContent --debug

mod common;

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use common::{Args, ConsoleStatus};
use tab_scraper::transport::PendingServer;
use tab_scraper::{Result, Session, Tab};

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    common::init_logging(args.debug);

    if let Err(e) = run(args).await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    println!("=== Bridge scrape ===\n");

    // ========================================================================
    // Setup
    // ========================================================================

    let server = PendingServer::bind_localhost().await?;
    println!("[Setup] Waiting for extension at {}", server.ws_url());

    let tab = Tab::connect(server).await?;
    println!("        ✓ Connected to tab {}\n", tab.id());

    let mut session = Session::builder(tab.clone())
        .status(Arc::new(ConsoleStatus))
        .build()?;

    // ========================================================================
    // Scrape
    // ========================================================================

    let selector = args.arg(0, "h1, h2, h3, h4, h5, h6");
    let attribute = args.arg(1, "textContent");
    println!("[Scrape] {selector} / {attribute}");

    let result = session.scrape(&selector, attribute.as_str()).await?;
    println!("    {} values", result.len());
    if let Some(preview) = session.preview() {
        println!("{preview}\n");
    }

    // ========================================================================
    // Export
    // ========================================================================

    if args.no_export {
        println!("[--no-export] Skipping export");
    } else {
        let path = session.export_to(args.out_dir()).await?;
        println!("[Export] {}", path.display());
    }

    tab.close();
    println!("\n=== Done ===");
    Ok(())
}
