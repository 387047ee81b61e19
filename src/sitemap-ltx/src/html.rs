//! HTML parsing utilities for extracting page metadata and main text.

use scraper::{ElementRef, Html, Node, Selector};

use crate::text_utils::{collapse_whitespace, first_sentence, title_from_url};

/// Elements whose text never counts as page content.
const BOILERPLATE_ELEMENTS: [&str; 6] = ["nav", "footer", "aside", "header", "script", "style"];

/// Class name fragments that mark an element as a main content area.
const CONTENT_CLASS_HINTS: [&str; 4] = ["content", "main", "article", "post"];

/// Minimum length of a first sentence used as a description when there's no meta description.
pub const MIN_SENTENCE_CHARS: usize = 20;

/// Everything the page processor needs from a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub title: String,
    /// Meta description, or the first sentence of the main text.
    pub description: Option<String>,
    /// Whitespace-collapsed main text; empty when the page has none.
    pub main_text: String,
}

/// Extracts title, description, and main text from a page.
///
/// The title falls back to a title derived from `url` when the document has none.
pub fn extract_page_info(html: &str, url: &str) -> PageInfo {
    let document = Html::parse_document(html);

    let title = get_title(&document).unwrap_or_else(|| title_from_url(url));
    let main_text = extract_main_text(&document);
    let description = get_description(&document).or_else(|| first_sentence(&main_text, MIN_SENTENCE_CHARS));

    PageInfo {
        title,
        description,
        main_text,
    }
}

/// Text of the first `<title>` element, trimmed. `None` when missing or blank.
pub fn get_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Content of `<meta name="description">`, trimmed. `None` when missing or blank.
pub fn get_description(document: &Html) -> Option<String> {
    let selector = Selector::parse(r#"meta[name="description"]"#).ok()?;

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Main text of the page with navigation, header, footer, aside, script, and style text removed.
///
/// Uses every `main`/`article`/`div` whose class looks like a content area; with none of those,
/// falls back to the text of all paragraphs.
pub fn extract_main_text(document: &Html) -> String {
    let areas: Vec<ElementRef> = match Selector::parse("main, article, div") {
        Ok(selector) => document
            .select(&selector)
            .filter(|element| has_content_class(element) && !inside_boilerplate(element.ancestors().map(|n| n.value())))
            .collect(),
        Err(_) => Vec::new(),
    };

    let chunks: Vec<String> = if !areas.is_empty() {
        areas.iter().map(|area| visible_text(*area)).collect()
    } else {
        match Selector::parse("p") {
            Ok(selector) => document
                .select(&selector)
                .filter(|p| !inside_boilerplate(p.ancestors().map(|n| n.value())))
                .map(visible_text)
                .collect(),
            Err(_) => Vec::new(),
        }
    };

    collapse_whitespace(&chunks.join(" "))
}

fn has_content_class(element: &ElementRef) -> bool {
    element.value().classes().any(|class| {
        let class = class.to_lowercase();
        CONTENT_CLASS_HINTS.iter().any(|hint| class.contains(hint))
    })
}

/// True when any of the given nodes (typically a node's ancestors) is a boilerplate element.
fn inside_boilerplate<'a>(mut nodes: impl Iterator<Item = &'a Node>) -> bool {
    nodes.any(|n| {
        n.as_element()
            .is_some_and(|e| BOILERPLATE_ELEMENTS.contains(&e.name()))
    })
}

fn visible_text(element: ElementRef) -> String {
    element
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Text(text) if !inside_boilerplate(node.ancestors().map(|n| n.value())) => Some(&**text),
            _ => None,
        })
        .collect()
}
