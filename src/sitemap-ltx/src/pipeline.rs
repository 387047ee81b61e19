//! Bounded-concurrency processing of categorized URLs, with progress reporting and cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::categorize::{CategorizedUrls, CategoryBucket};
use crate::errors::{Error, Result};
use crate::llms::DescriptionGenerator;
use crate::processor::{PageProcessor, PageResult};

/// A progress update. `fraction` is in `[0, 1]`, never decreases during a run, and the last
/// update of a run is exactly `1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub message: String,
    pub fraction: f64,
}

/// Results of one category, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryResults {
    pub name: String,
    pub pages: Vec<PageResult>,
}

/// Results of a run, in category order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessingReport {
    pub categories: Vec<CategoryResults>,
}

impl ProcessingReport {
    pub fn total_pages(&self) -> usize {
        self.categories.iter().map(|c| c.pages.len()).sum()
    }

    pub fn get(&self, name: &str) -> Option<&[PageResult]> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.pages.as_slice())
    }
}

/// Runs a [`PageProcessor`] over every categorized URL.
///
/// Categories are processed one after another; within a category at most
/// `workers_per_category` pages (from the processor's options) are in flight.
pub struct ProcessingPipeline {
    processor: PageProcessor,
    workers: usize,
    cancel: CancellationToken,
}

impl ProcessingPipeline {
    pub fn new(processor: PageProcessor) -> Self {
        let workers = processor.options().workers_per_category.max(1);
        Self {
            processor,
            workers,
            cancel: CancellationToken::new(),
        }
    }

    /// Uses an externally owned token, e.g. one cancelled on Ctrl-C.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// A handle that cancels this pipeline's runs.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Processes every URL. Pages never fail individually; the only error is [`Error::Cancelled`].
    pub async fn run(
        &self,
        categorized: &CategorizedUrls,
        generator: Option<Arc<dyn DescriptionGenerator>>,
        progress: Option<&UnboundedSender<Progress>>,
    ) -> Result<ProcessingReport> {
        let total = categorized.total();
        let processed = AtomicUsize::new(0);
        let mut report = ProcessingReport::default();

        tracing::info!(
            "Processing {} URLs in {} categories with {} workers per category",
            total,
            categorized.buckets.len(),
            self.workers
        );

        for bucket in &categorized.buckets {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            send_progress(
                progress,
                format!("Processing {} URLs for {}...", bucket.urls.len(), bucket.name),
                fraction(processed.load(Ordering::SeqCst), total),
            );

            let pages = self
                .run_category(bucket, &generator, &processed, total, progress)
                .await?;
            report.categories.push(CategoryResults {
                name: bucket.name.clone(),
                pages,
            });
        }

        if total == 0 {
            send_progress(progress, "Processed 0/0 URLs".to_string(), 1.0);
        }

        Ok(report)
    }

    async fn run_category(
        &self,
        bucket: &CategoryBucket,
        generator: &Option<Arc<dyn DescriptionGenerator>>,
        processed: &AtomicUsize,
        total: usize,
        progress: Option<&UnboundedSender<Progress>>,
    ) -> Result<Vec<PageResult>> {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();

        for (index, url) in bucket.urls.iter().cloned().enumerate() {
            let semaphore = semaphore.clone();
            let processor = self.processor.clone();
            let generator = generator.clone();

            tasks.spawn(async move {
                // the semaphore is never closed, so a missing permit can't happen
                let _permit = semaphore.acquire_owned().await.ok();
                let result = processor.process(&url, generator.as_deref()).await;
                (index, result)
            });
        }

        let mut results: Vec<(usize, PageResult)> = Vec::with_capacity(bucket.urls.len());
        loop {
            let joined = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::warn!("Cancelled while processing {}; aborting {} tasks", bucket.name, tasks.len());
                    tasks.abort_all();
                    return Err(Error::Cancelled);
                }
                joined = tasks.join_next() => joined,
            };
            let Some(joined) = joined else {
                break;
            };

            let done = processed.fetch_add(1, Ordering::SeqCst) + 1;
            match joined {
                Ok(result) => results.push(result),
                Err(e) => tracing::error!("Page task in {} failed unexpectedly: {}", bucket.name, e),
            }
            send_progress(progress, format!("Processed {}/{} URLs", done, total), fraction(done, total));
        }

        results.sort_by_key(|(index, _)| *index);
        Ok(results.into_iter().map(|(_, result)| result).collect())
    }
}

fn fraction(done: usize, total: usize) -> f64 {
    if total == 0 { 1.0 } else { done as f64 / total as f64 }
}

fn send_progress(progress: Option<&UnboundedSender<Progress>>, message: String, fraction: f64) {
    if let Some(tx) = progress {
        // a dropped receiver only means nobody is watching
        let _ = tx.send(Progress { message, fraction });
    }
}
