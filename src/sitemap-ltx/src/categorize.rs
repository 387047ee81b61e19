//! Keyword-driven URL categorization.

use crate::config::{CategoryRule, OTHER_CATEGORY};
use crate::page_url::PageUrl;

/// URLs of one output section, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBucket {
    pub name: String,
    pub urls: Vec<PageUrl>,
}

/// Categorized URLs: buckets in configured category order, `Other` last, empty buckets omitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategorizedUrls {
    pub buckets: Vec<CategoryBucket>,
}

impl CategorizedUrls {
    /// Total number of URLs across every bucket.
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.urls.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn get(&self, name: &str) -> Option<&[PageUrl]> {
        self.buckets.iter().find(|b| b.name == name).map(|b| b.urls.as_slice())
    }

    pub fn names(&self) -> Vec<&str> {
        self.buckets.iter().map(|b| b.name.as_str()).collect()
    }

    /// Every URL, bucket by bucket.
    pub fn flatten(&self) -> Vec<PageUrl> {
        self.buckets.iter().flat_map(|b| b.urls.iter().cloned()).collect()
    }
}

/// Returns the name of the first category (in declared order) with a keyword contained in the
/// lower-cased URL, or `Other`.
pub fn category_for<'a>(url: &str, categories: &'a [CategoryRule]) -> &'a str {
    let url_lower = url.to_lowercase();
    categories
        .iter()
        .find(|category| category.keywords.iter().any(|keyword| url_lower.contains(keyword.as_str())))
        .map(|category| category.name.as_str())
        .unwrap_or(OTHER_CATEGORY)
}

/// Partitions URLs into category buckets.
///
/// Each URL lands in exactly one bucket. Matching checks the whole URL string, so a keyword in
/// the host name counts too.
pub fn categorize(urls: &[PageUrl], categories: &[CategoryRule]) -> CategorizedUrls {
    let mut buckets: Vec<CategoryBucket> = categories
        .iter()
        .filter(|category| category.name != OTHER_CATEGORY)
        .map(|category| CategoryBucket {
            name: category.name.clone(),
            urls: Vec::new(),
        })
        .collect();
    buckets.push(CategoryBucket {
        name: OTHER_CATEGORY.to_string(),
        urls: Vec::new(),
    });

    for url in urls {
        let name = category_for(url.as_str(), categories);
        if let Some(bucket) = buckets.iter_mut().find(|b| b.name == name) {
            bucket.urls.push(url.clone());
        }
    }

    buckets.retain(|b| !b.urls.is_empty());
    CategorizedUrls { buckets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_categories;

    fn urls(raw: &[&str]) -> Vec<PageUrl> {
        raw.iter().map(|u| PageUrl::parse(u).unwrap()).collect()
    }

    #[test]
    fn test_first_matching_category_wins() {
        let categories = default_categories();
        // "guide" is both a Get started and a Guides keyword; Get started is declared first
        assert_eq!(category_for("https://acme.io/user-guide", &categories), "Get started");
        // "tutorial" appears in both as well
        assert_eq!(category_for("https://acme.io/Tutorial/One", &categories), "Get started");
        assert_eq!(category_for("https://acme.io/about", &categories), "Introduction");
        assert_eq!(category_for("https://acme.io/graphql", &categories), "API Reference");
        assert_eq!(category_for("https://acme.io/walkthrough", &categories), "Guides");
        assert_eq!(category_for("https://acme.io/community", &categories), "Resources");
        assert_eq!(category_for("https://acme.io/pricing", &categories), "Other");
    }

    #[test]
    fn test_categorize_preserves_order_and_drops_empty() {
        let input = urls(&[
            "https://acme.io/pricing",
            "https://acme.io/api/users",
            "https://acme.io/about",
            "https://acme.io/api/orders",
            "https://acme.io/blog",
        ]);
        let categorized = categorize(&input, &default_categories());

        assert_eq!(categorized.names(), vec!["Introduction", "API Reference", "Other"]);
        assert_eq!(
            categorized.get("API Reference").unwrap(),
            urls(&["https://acme.io/api/users", "https://acme.io/api/orders"]).as_slice()
        );
        assert_eq!(
            categorized.get("Other").unwrap(),
            urls(&["https://acme.io/pricing", "https://acme.io/blog"]).as_slice()
        );
        assert!(categorized.get("Guides").is_none());
    }

    #[test]
    fn test_categorize_is_total_and_idempotent() {
        let input = urls(&[
            "https://acme.io/",
            "https://acme.io/docs/intro",
            "https://acme.io/install",
            "https://acme.io/examples/x",
            "https://acme.io/templates",
            "https://acme.io/careers",
            "https://acme.io/install",
        ]);
        let categories = default_categories();
        let categorized = categorize(&input, &categories);

        assert_eq!(categorized.total(), input.len());
        let mut flat: Vec<String> = categorized.flatten().into_iter().map(|u| u.extract()).collect();
        let mut expected: Vec<String> = input.iter().map(|u| u.to_string()).collect();
        flat.sort();
        expected.sort();
        assert_eq!(flat, expected);

        let again = categorize(&categorized.flatten(), &categories);
        assert_eq!(again, categorized);
    }

    #[test]
    fn test_categorize_empty_input() {
        let categorized = categorize(&[], &default_categories());
        assert!(categorized.is_empty());
        assert!(categorized.buckets.is_empty());
    }

    #[test]
    fn test_custom_table_order_is_respected() {
        let categories = vec![
            CategoryRule::new("Zeta", &["shared"]),
            CategoryRule::new("Alpha", &["shared", "alpha"]),
        ];
        let categorized = categorize(
            &urls(&["https://acme.io/alpha", "https://acme.io/shared"]),
            &categories,
        );
        assert_eq!(categorized.names(), vec!["Zeta", "Alpha"]);
        assert_eq!(categorized.get("Zeta").unwrap()[0].as_str(), "https://acme.io/shared");
    }
}
