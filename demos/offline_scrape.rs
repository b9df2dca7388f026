//! Offline scraping of a saved page.
//!
//! Demonstrates:
//! - Loading an HTML file into a DocumentTab
//! - Tier fallthrough (no agent present, injection, direct execution)
//! - Presets and custom selectors
//! - Result preview and CSV export
//!
//! Usage:
//!   cargo run --example offline_scrape
//!   cargo run --example offline_scrape -- page.html "article h2" textContent
//!   cargo run --example offline_scrape -- --debug --no-export

mod common;

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use common::{Args, ConsoleStatus};
use tab_scraper::{DocumentTab, Preset, Result, Session, TabId, TabHost};

// ============================================================================
// Constants
// ============================================================================

const PAGE_URL: &str = "https://example.com/blog/";

const SAMPLE_PAGE: &str = r#"<!doctype html>
<html>
  <head><title>Sample blog</title></head>
  <body>
    <h1>Sample blog</h1>
    <article><h2>First post</h2><a href="posts/1">Read more</a></article>
    <article><h2>Second "quoted" post</h2><a href="/posts/2">Read more</a></article>
    <a href="mailto:editor@example.com">Contact</a>
    <img src="/static/logo.png" alt="Logo">
  </body>
</html>"#;

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
    println!("=== Offline scrape ===\n");

    // ========================================================================
    // Setup
    // ========================================================================

    let tab_id = TabId::new(1).expect("tab ids are nonzero");
    let tab = match args.positional.first() {
        Some(path) => DocumentTab::load(tab_id, PAGE_URL, path).await?,
        None => DocumentTab::new(tab_id, PAGE_URL, SAMPLE_PAGE),
    };

    let diagnostics = tab.document().diagnostics();
    println!(
        "[Setup] {} ({} elements, {} headings)\n",
        diagnostics.url, diagnostics.total_elements, diagnostics.heading_matches
    );

    let mut session = Session::builder(tab)
        .status(Arc::new(ConsoleStatus))
        .build()?;

    // ========================================================================
    // Presets
    // ========================================================================

    for preset in Preset::ALL {
        println!("[Preset] {preset:?}");
        let result = session.scrape_preset(preset).await?;
        println!("    {} values", result.len());
        if let Some(preview) = session.preview() {
            println!("{preview}\n");
        }
    }

    println!(
        "[Agent] loaded after presets: {}\n",
        session.host().is_agent_loaded()
    );

    // ========================================================================
    // Custom selector
    // ========================================================================

    let selector = args.arg(1, "article h2");
    let attribute = args.arg(2, "textContent");
    println!("[Custom] {selector} / {attribute}");
    session.scrape(&selector, attribute.as_str()).await?;
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

    println!(
        "\n=== Done (tab {}) ===",
        session.host().tab_id().map_or(0, |id| id.as_u32())
    );
    Ok(())
}
