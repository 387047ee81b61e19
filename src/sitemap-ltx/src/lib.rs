//! # sitemap-ltx
//!
//! Generates llms.txt documents from a website's sitemap (or a list of URLs) and checks
//! whether a site's robots.txt blocks LLM crawlers.
//!
//! ## Features
//!
//! - Resolve sitemaps and nested sitemap indexes (depth-bounded, cycle-safe)
//! - Read URLs from CSV files
//! - Categorize URLs with an ordered keyword table
//! - Extract titles and descriptions, optionally rendering pages through WebDriver
//! - Optional AI descriptions through OpenRouter
//! - Concurrent processing with per-category worker pools, progress, and cancellation
//! - robots.txt checks for LLM crawler access
//!
//! ## Examples
//!
//! ```no_run
//! use sitemap_ltx::{GeneratorOptions, UrlSource, build_http_client, gen_llms_txt};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = GeneratorOptions::builder().workers_per_category(8).build();
//!     let client = build_http_client(&options)?;
//!
//!     let output = gen_llms_txt(
//!         client,
//!         options,
//!         &UrlSource::Sitemap("https://example.com/sitemap.xml".to_string()),
//!         None,
//!         None,
//!         None,
//!         None,
//!         CancellationToken::new(),
//!     )
//!     .await?;
//!     println!("{}", output);
//!     Ok(())
//! }
//! ```

pub mod categorize;
pub mod common;
pub mod config;
mod errors;
pub mod fetch;
mod generator;
pub mod html;
pub mod input;
pub mod llms;
pub mod llms_txt;
mod page_url;
pub mod pipeline;
pub mod processor;
pub mod robots;
pub mod sitemap;
pub mod text_utils;

pub use categorize::{CategorizedUrls, CategoryBucket, categorize};
pub use config::{CategoryRule, GeneratorOptions, GeneratorOptionsBuilder, default_categories};
pub use errors::{Error, Result};
pub use fetch::{PageFetcher, StaticFetcher, WebDriverFetcher, build_http_client};
pub use generator::{UrlSource, collect_urls, gen_llms_txt};
pub use llms::{DescribeError, DescriptionGenerator};
pub use llms_txt::{Features, SiteInfo, infer_site_info, render_llms_txt};
pub use page_url::PageUrl;
pub use pipeline::{CategoryResults, ProcessingPipeline, ProcessingReport, Progress};
pub use processor::{PageProcessor, PageResult};
pub use robots::{RobotsCheckResult, RobotsChecker, normalize_domain};
pub use sitemap::{SitemapNode, SitemapResolver};
