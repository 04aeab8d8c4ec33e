use anyhow::{Context, Result};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use archive_reader::config::Config;
use archive_reader::loader::load_posts;
use archive_reader::query::{PageRequest, QueryEngine};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

/// Usage: `archive-reader [PAGE] [PAGE_SIZE] [SORT_BY] [SORT_ORDER]`
async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(data_path = %config.data_path.display(), sort = ?config.sort(), "Configuration loaded");

    let posts = load_posts(&config.data_path)
        .await
        .context("Failed to load export")?;
    let engine = QueryEngine::new(posts, config.sort());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let default_page_size = config.page_size.to_string();
    let mut request = PageRequest::parse(
        args.first().map(String::as_str),
        Some(args.get(1).map_or(default_page_size.as_str(), String::as_str)),
    );
    if let Some(key) = args.get(2) {
        let order = args.get(3).map_or(config.sort_order, |o| o.parse().unwrap_or_default());
        request = request.with_sort(key.parse().unwrap_or_default(), order);
    }

    let page = engine.query(&request);
    info!(
        page = page.page,
        page_size = page.page_size,
        total = page.total,
        items = page.items.len(),
        "Resolved page"
    );
    for post in &page.items {
        debug!(
            id = ?post.id,
            when = post.display_time().as_deref().unwrap_or("unknown"),
            fragments = post.fragments.len(),
            media = post.media.len(),
            "Post"
        );
    }

    let json = serde_json::to_string_pretty(&page).context("Failed to serialize page")?;
    println!("{json}");

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,archive_reader=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    // Logs go to stderr so stdout stays clean JSON
    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
