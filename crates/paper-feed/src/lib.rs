//! Paper Feed
//!
//! Builds a ranked feed of recent arXiv papers written by a roster of tracked
//! researchers.
//!
//! # Features
//!
//! - **Two query strategies**: one query per author, or one OR-combined query
//! - **Exact name matching**: normalized token-set equality, no fuzzy guesses
//! - **Title dedup**: repeated papers merge their matching authors
//! - **Paced client**: lazy pagination with inter-request delay and bounded retries
//! - **Safe outputs**: atomic JSON writes and slot-validated HTML splicing
//!
//! # Example
//!
//! ```no_run
//! use paper_feed::{ArxivClient, Config, FeedConfig, FeedPipeline};
//! use paper_feed::roster::parse_roster;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ArxivClient::new(Config::from_env()?)?;
//!     let pipeline = FeedPipeline::new(client, FeedConfig::default());
//!
//!     let roster = parse_roster(r#"["Jane Doe", "John Smith"]"#)?;
//!     let output = pipeline.run(&roster).await?;
//!     println!("{} papers", output.papers.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod formatters;
pub mod models;
pub mod pipeline;
pub mod roster;

pub use client::{ArxivClient, SearchService};
pub use config::{Config, FeedConfig};
pub use error::{ClientError, FeedError};
pub use pipeline::{FeedOutput, FeedPipeline, RunReport};
