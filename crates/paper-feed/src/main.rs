//! Paper Feed - Entry Point
//!
//! Fetches the roster, runs one feed batch, and writes the JSON feed and
//! (optionally) the static page.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use paper_feed::config::{QueryStrategy, SearchFailurePolicy, TitleMatch};
use paper_feed::formatters::{self, HtmlOptions, PageTemplate};
use paper_feed::roster::{FileRoster, HttpRoster, RosterProvider};
use paper_feed::{ArxivClient, Config, FeedConfig, FeedPipeline};

#[derive(Parser, Debug)]
#[command(name = "paper-feed")]
#[command(about = "Ranked feed of recent arXiv papers by tracked researchers")]
#[command(version)]
struct Cli {
    /// URL of the roster (a JSON array of author names)
    #[arg(long, env = "PAPER_FEED_ROSTER_URL", conflicts_with = "roster_file")]
    roster_url: Option<Url>,

    /// Local roster file (a JSON array of author names)
    #[arg(long, env = "PAPER_FEED_ROSTER_FILE", required_unless_present = "roster_url")]
    roster_file: Option<PathBuf>,

    /// Query strategy
    #[arg(long, value_enum, default_value = "per-author")]
    strategy: QueryStrategy,

    /// What a failed per-author query does to the run
    #[arg(long, value_enum, default_value = "abort")]
    on_search_failure: SearchFailurePolicy,

    /// Title comparison when merging duplicates
    #[arg(long, value_enum, default_value = "exact")]
    title_match: TitleMatch,

    /// Maximum papers in the JSON feed
    #[arg(long)]
    output_limit: Option<usize>,

    /// Where to write the JSON feed
    #[arg(long, short, default_value = "papers.json")]
    output: PathBuf,

    /// Static page whose papers slot is refreshed in place
    #[arg(long)]
    page: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        strategy = ?cli.strategy,
        "Starting paper feed"
    );

    let mut feed_config = FeedConfig::from_env()?
        .with_strategy(cli.strategy)
        .with_failure_policy(cli.on_search_failure)
        .with_title_match(cli.title_match);
    if let Some(limit) = cli.output_limit {
        feed_config.output_limit = limit;
    }

    // Validate the page before any network traffic.
    let page = match &cli.page {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("reading page {}", path.display()))?;
            Some((path.clone(), PageTemplate::papers_page(source)?))
        }
        None => None,
    };

    let roster: Box<dyn RosterProvider> = match (&cli.roster_url, &cli.roster_file) {
        (Some(url), _) => Box::new(HttpRoster::new(url.clone())),
        (None, Some(path)) => Box::new(FileRoster::new(path.clone())),
        (None, None) => anyhow::bail!("either --roster-url or --roster-file is required"),
    };
    let authors = roster.fetch().await?;
    tracing::info!(authors = authors.len(), "Roster loaded");

    let html_options = HtmlOptions {
        max_papers: feed_config.html_papers,
        max_authors: feed_config.html_max_authors,
    };

    let client = ArxivClient::new(Config::from_env()?)?;
    let pipeline = FeedPipeline::new(client, feed_config);
    let output = pipeline.run(&authors).await?;

    // Render everything before writing anything.
    let json = formatters::papers_to_json(&output.papers)?;
    let rendered_page = match &page {
        Some((path, template)) => {
            let fragment = formatters::render_fragment(&output.papers, &html_options);
            Some((path, template.render_papers(&fragment)?))
        }
        None => None,
    };

    formatters::write_atomic(&cli.output, &json)?;
    tracing::info!(path = %cli.output.display(), papers = output.papers.len(), "Wrote feed");

    if let Some((path, html)) = rendered_page {
        formatters::write_atomic(path, &html)?;
        tracing::info!(path = %path.display(), "Updated page");
    }

    if !output.report.skipped_authors.is_empty() {
        tracing::warn!(
            skipped = ?output.report.skipped_authors,
            "Some authors were skipped after search failures"
        );
    }

    Ok(())
}
