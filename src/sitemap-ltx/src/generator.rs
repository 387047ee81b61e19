//! End-to-end llms.txt generation: discover URLs, categorize, process, render.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use reqwest::Client;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::categorize::categorize;
use crate::config::GeneratorOptions;
use crate::errors::{Error, Result};
use crate::input::{urls_from_csv, validate_urls};
use crate::llms::DescriptionGenerator;
use crate::llms_txt::{Features, infer_site_info, render_llms_txt};
use crate::page_url::PageUrl;
use crate::pipeline::{ProcessingPipeline, Progress};
use crate::processor::PageProcessor;
use crate::sitemap::SitemapResolver;

/// Where the page URLs come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlSource {
    /// A sitemap or sitemap index URL.
    Sitemap(String),
    /// A CSV file with a URL column.
    Csv(PathBuf),
    /// URLs given directly.
    List(Vec<String>),
}

/// Collects and validates the page URLs of a source.
///
/// # Errors
///
/// [`Error::NoUrlsFound`] when the source yields no usable URL, I/O and CSV errors for
/// unreadable files.
pub async fn collect_urls(client: &Client, options: &GeneratorOptions, source: &UrlSource) -> Result<Vec<PageUrl>> {
    let urls = match source {
        UrlSource::Sitemap(sitemap_url) => {
            SitemapResolver::new(client.clone(), options.max_sitemap_depth)
                .resolve(sitemap_url)
                .await
        }
        UrlSource::Csv(path) => urls_from_csv(File::open(path)?)?,
        UrlSource::List(raw) => validate_urls(raw)?,
    };

    if urls.is_empty() {
        return Err(Error::NoUrlsFound);
    }
    tracing::info!("Found {} URLs", urls.len());
    Ok(urls)
}

/// Generates a complete llms.txt document.
///
/// `site_name` and `site_description` are inferred from the first page when missing.
/// Progress updates go to `progress`; firing `cancel` stops the run with [`Error::Cancelled`].
#[allow(clippy::too_many_arguments)]
pub async fn gen_llms_txt(
    client: Client,
    options: GeneratorOptions,
    source: &UrlSource,
    site_name: Option<String>,
    site_description: Option<String>,
    generator: Option<Arc<dyn DescriptionGenerator>>,
    progress: Option<&UnboundedSender<Progress>>,
    cancel: CancellationToken,
) -> Result<String> {
    let urls = collect_urls(&client, &options, source).await?;
    let categorized = categorize(&urls, &options.categories);
    tracing::info!(
        "Categorized {} URLs into {}",
        categorized.total(),
        categorized.names().join(", ")
    );

    let features = Features {
        js_rendering: options.renders_js(),
        ai_descriptions: generator.is_some(),
    };
    let processor = PageProcessor::from_options(client, options);
    let pipeline = ProcessingPipeline::new(processor.clone()).with_cancellation(cancel);

    let report = pipeline.run(&categorized, generator, progress).await?;

    let site = infer_site_info(
        processor.fetcher(),
        urls.first().map(|u| u.as_str()),
        site_name,
        site_description,
    )
    .await;

    Ok(render_llms_txt(&site, &report, &features, Local::now().naive_local()))
}
