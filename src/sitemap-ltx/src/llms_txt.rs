//! Rendering of the final llms.txt document.

use chrono::NaiveDateTime;
use scraper::Html;

use crate::fetch::PageFetcher;
use crate::html::{get_description, get_title};
use crate::pipeline::ProcessingReport;

pub const DEFAULT_SITE_NAME: &str = "Website";
pub const DEFAULT_SITE_DESCRIPTION: &str = "A comprehensive resource";

/// Header of the generated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteInfo {
    pub name: String,
    pub description: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_SITE_NAME.to_string(),
            description: DEFAULT_SITE_DESCRIPTION.to_string(),
        }
    }
}

/// Optional processing features, listed in the document footer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Features {
    pub js_rendering: bool,
    pub ai_descriptions: bool,
}

impl Features {
    pub fn describe(&self) -> String {
        let mut used = Vec::new();
        if self.js_rendering {
            used.push("JavaScript Rendering");
        }
        if self.ai_descriptions {
            used.push("AI Descriptions");
        }
        if used.is_empty() {
            "Standard Processing".to_string()
        } else {
            used.join(", ")
        }
    }
}

/// Renders the llms.txt document: a header, one section per non-empty category, and a
/// footer recording when and how it was generated.
pub fn render_llms_txt(
    site: &SiteInfo,
    report: &ProcessingReport,
    features: &Features,
    generated_at: NaiveDateTime,
) -> String {
    let mut lines: Vec<String> = vec![
        format!("# {}", site.name),
        String::new(),
        format!("> {}", site.description),
        String::new(),
    ];

    for category in report.categories.iter().filter(|c| !c.pages.is_empty()) {
        lines.push(format!("## {}", category.name));
        lines.push(String::new());

        for page in &category.pages {
            let mut line = format!("- [{}]({}): {}", page.title, page.url, page.description);
            if let Some(md_link) = &page.md_link {
                let filename = md_link.rsplit('/').next().unwrap_or(md_link);
                line.push_str(&format!(" ([{}]({}))", filename, md_link));
            }
            lines.push(line);
        }
        lines.push(String::new());
    }

    lines.push("<!-- Generated by sitemap-ltx -->".to_string());
    lines.push(format!("<!-- Date: {} -->", generated_at.format("%Y-%m-%d %H:%M:%S")));
    lines.push(format!("<!-- Features: {} -->", features.describe()));

    lines.join("\n")
}

/// Fills in a missing site name or description from the first page's `<title>` and meta
/// description, falling back to generic defaults.
pub async fn infer_site_info(
    fetcher: &dyn PageFetcher,
    first_url: Option<&str>,
    name: Option<String>,
    description: Option<String>,
) -> SiteInfo {
    let name = name.filter(|n| !n.trim().is_empty());
    let description = description.filter(|d| !d.trim().is_empty());

    let (inferred_name, inferred_description) = match (&name, &description, first_url) {
        (Some(_), Some(_), _) | (_, _, None) => (None, None),
        (_, _, Some(url)) => match fetcher.fetch(url).await {
            Ok(html) => {
                let document = Html::parse_document(&html);
                (get_title(&document), get_description(&document))
            }
            Err(e) => {
                tracing::warn!("Could not fetch {} to infer site info: {}", url, e);
                (None, None)
            }
        },
    };

    SiteInfo {
        name: name
            .or(inferred_name)
            .unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()),
        description: description
            .or(inferred_description)
            .unwrap_or_else(|| DEFAULT_SITE_DESCRIPTION.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use indoc::indoc;

    use super::*;
    use crate::errors::{Error, Result};
    use crate::pipeline::CategoryResults;
    use crate::processor::PageResult;

    fn page(title: &str, url: &str, description: &str, md_link: Option<&str>) -> PageResult {
        PageResult {
            url: url.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            md_link: md_link.map(|s| s.to_string()),
        }
    }

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(9, 26, 53)
            .unwrap()
    }

    #[test]
    fn test_render_llms_txt() {
        let report = ProcessingReport {
            categories: vec![
                CategoryResults {
                    name: "Introduction".to_string(),
                    pages: vec![page("About", "https://acme.io/about", "Who we are.", None)],
                },
                CategoryResults {
                    name: "Guides".to_string(),
                    pages: vec![],
                },
                CategoryResults {
                    name: "API Reference".to_string(),
                    pages: vec![page(
                        "Users",
                        "https://acme.io/api/users",
                        "User endpoints.",
                        Some("https://acme.io/api/users/index.md"),
                    )],
                },
            ],
        };
        let site = SiteInfo {
            name: "Acme".to_string(),
            description: "Acme developer docs".to_string(),
        };
        let features = Features {
            js_rendering: false,
            ai_descriptions: true,
        };

        let rendered = render_llms_txt(&site, &report, &features, timestamp());
        assert_eq!(
            rendered,
            indoc! {"
                # Acme

                > Acme developer docs

                ## Introduction

                - [About](https://acme.io/about): Who we are.

                ## API Reference

                - [Users](https://acme.io/api/users): User endpoints. ([index.md](https://acme.io/api/users/index.md))

                <!-- Generated by sitemap-ltx -->
                <!-- Date: 2025-03-14 09:26:53 -->
                <!-- Features: AI Descriptions -->"
            }
        );
    }

    #[test]
    fn test_features_describe() {
        assert_eq!(Features::default().describe(), "Standard Processing");
        assert_eq!(
            Features {
                js_rendering: true,
                ai_descriptions: true
            }
            .describe(),
            "JavaScript Rendering, AI Descriptions"
        );
    }

    struct OnePage(&'static str);

    #[async_trait]
    impl PageFetcher for OnePage {
        async fn fetch(&self, url: &str) -> Result<String> {
            if self.0.is_empty() {
                Err(Error::HttpStatus {
                    url: url.to_string(),
                    status: 404,
                })
            } else {
                Ok(self.0.to_string())
            }
        }

        fn kind(&self) -> &'static str {
            "one-page"
        }
    }

    #[tokio::test]
    async fn test_infer_site_info() {
        let fetcher = OnePage(r#"<html><head><title>Acme Docs</title><meta name="description" content="All about Acme"></head></html>"#);

        let info = infer_site_info(&fetcher, Some("https://acme.io/"), None, None).await;
        assert_eq!(info.name, "Acme Docs");
        assert_eq!(info.description, "All about Acme");

        let info = infer_site_info(&fetcher, Some("https://acme.io/"), Some("Mine".to_string()), None).await;
        assert_eq!(info.name, "Mine");
        assert_eq!(info.description, "All about Acme");
    }

    #[tokio::test]
    async fn test_infer_site_info_defaults() {
        let info = infer_site_info(&OnePage(""), Some("https://acme.io/"), None, Some(" ".to_string())).await;
        assert_eq!(info, SiteInfo::default());

        let info = infer_site_info(&OnePage(""), None, None, None).await;
        assert_eq!(info, SiteInfo::default());
    }
}
