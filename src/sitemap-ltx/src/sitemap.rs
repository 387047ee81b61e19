//! Sitemap fetching, parsing, and recursive resolution of sitemap indexes.

use std::collections::HashSet;

use quick_xml::Reader;
use quick_xml::events::Event;
use reqwest::Client;

use crate::errors::{Error, Result};
use crate::fetch::fetch_text;
use crate::page_url::PageUrl;

/// One parsed sitemap document.
///
/// Supports the two sitemap/0.9 shapes:
/// ```xml
/// <urlset>
///   <url><loc>https://example.com/page</loc></url>
/// </urlset>
///
/// <sitemapindex>
///   <sitemap><loc>https://example.com/sitemap-docs.xml</loc></sitemap>
/// </sitemapindex>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapNode {
    /// Page locations, in document order.
    Leaf(Vec<String>),
    /// Child sitemap locations, in document order.
    Index(Vec<String>),
}

/// Parses XML sitemap content.
///
/// Elements are matched by local name so prefixed namespaces (`<sm:loc>`) work too.
/// Any `<sitemap><loc>` entry makes the document an index; its `<url>` entries are then ignored.
pub fn parse_sitemap(xml: &str) -> Result<SitemapNode> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut page_locs = Vec::new();
    let mut sitemap_locs = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => path.push(e.local_name().as_ref().to_vec()),
            Ok(Event::End(_)) => {
                path.pop();
            }
            Ok(Event::Text(text)) => {
                let value = text
                    .unescape()
                    .map_err(|e| Error::Sitemap(format!("Invalid XML: {}", e)))?;
                record_loc(&path, value.trim(), &mut page_locs, &mut sitemap_locs);
            }
            Ok(Event::CData(data)) => {
                let raw = data.into_inner();
                let value = String::from_utf8_lossy(&raw);
                record_loc(&path, value.trim(), &mut page_locs, &mut sitemap_locs);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Sitemap(format!("XML parsing error: {}", e))),
            _ => {}
        }
    }

    if sitemap_locs.is_empty() {
        Ok(SitemapNode::Leaf(page_locs))
    } else {
        Ok(SitemapNode::Index(sitemap_locs))
    }
}

fn record_loc(path: &[Vec<u8>], value: &str, page_locs: &mut Vec<String>, sitemap_locs: &mut Vec<String>) {
    if value.is_empty() {
        return;
    }
    match path {
        [.., parent, loc] if loc.as_slice() == b"loc" => match parent.as_slice() {
            b"url" => page_locs.push(value.to_string()),
            b"sitemap" => sitemap_locs.push(value.to_string()),
            _ => {}
        },
        _ => {}
    }
}

/// Flattens a sitemap (or a tree of sitemap indexes) into page URLs.
///
/// Resolution is bounded: each sitemap URL is fetched at most once per call and index nesting
/// stops at `max_depth` levels below the root, so cyclic or adversarial indexes terminate.
#[derive(Debug, Clone)]
pub struct SitemapResolver {
    client: Client,
    max_depth: usize,
}

impl SitemapResolver {
    pub fn new(client: Client, max_depth: usize) -> Self {
        Self { client, max_depth }
    }

    /// Returns every page URL reachable from `sitemap_url`, in document order.
    ///
    /// Failures never propagate: a sitemap that can't be fetched or parsed contributes nothing,
    /// and an entry that isn't an http(s) URL is skipped. Both are logged.
    pub async fn resolve(&self, sitemap_url: &str) -> Vec<PageUrl> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut urls = Vec::new();
        // depth-first worklist; children are pushed in reverse so they pop in document order
        let mut pending: Vec<(String, usize)> = vec![(sitemap_url.trim().to_string(), 0)];

        while let Some((current, depth)) = pending.pop() {
            if !visited.insert(current.clone()) {
                tracing::warn!("Skipping already visited sitemap: {}", current);
                continue;
            }

            match self.fetch_node(&current).await {
                Ok(SitemapNode::Leaf(locs)) => {
                    tracing::debug!("Sitemap {} lists {} pages", current, locs.len());
                    for loc in locs {
                        match PageUrl::new(loc) {
                            Ok(url) => urls.push(url),
                            Err(e) => tracing::warn!("Skipping sitemap entry in {}: {}", current, e),
                        }
                    }
                }
                Ok(SitemapNode::Index(children)) => {
                    if depth >= self.max_depth {
                        tracing::warn!(
                            "Sitemap index {} is nested deeper than {} levels; skipping its {} children",
                            current,
                            self.max_depth,
                            children.len()
                        );
                        continue;
                    }
                    tracing::debug!("Sitemap index {} has {} children", current, children.len());
                    pending.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
                }
                Err(e) => tracing::warn!("Error processing sitemap {}: {}", current, e),
            }
        }

        urls
    }

    async fn fetch_node(&self, sitemap_url: &str) -> Result<SitemapNode> {
        let xml = fetch_text(&self.client, sitemap_url).await?;
        parse_sitemap(&xml)
    }
}
