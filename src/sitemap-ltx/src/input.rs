//! URL input: validation of raw URL lists and URL extraction from CSV files.

use std::io::Read;

use regex::Regex;

use crate::errors::Result;
use crate::page_url::PageUrl;

/// Header names (case-insensitive) recognized as the URL column of a CSV file.
pub const URL_COLUMN_NAMES: [&str; 6] = ["url", "link", "href", "page", "address", "site"];

/// Keeps the entries that start with `http://` or `https://` and parse as page URLs.
/// Order is preserved; everything else is dropped with a warning.
pub fn validate_urls<I, S>(raw: I) -> Result<Vec<PageUrl>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let url_pattern = Regex::new(r"^https?://")?;

    let urls = raw
        .into_iter()
        .filter_map(|entry| {
            let entry = entry.as_ref().trim();
            if !url_pattern.is_match(entry) {
                tracing::warn!("Skipping non-URL entry: '{}'", entry);
                return None;
            }
            match PageUrl::parse(entry) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!("Skipping invalid URL: {}", e);
                    None
                }
            }
        })
        .collect();
    Ok(urls)
}

/// Reads page URLs from a headered CSV document.
///
/// The URL column is the first header matching one of [`URL_COLUMN_NAMES`], or the first
/// column when none does. Empty cells and unreadable rows are skipped, and the rest go
/// through [`validate_urls`]. Only an unreadable header or an I/O failure is an error.
pub fn urls_from_csv<R: Read>(reader: R) -> Result<Vec<PageUrl>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let column = {
        let headers = csv_reader.headers()?;
        headers
            .iter()
            .position(|h| URL_COLUMN_NAMES.iter().any(|name| h.eq_ignore_ascii_case(name)))
            .unwrap_or(0)
    };

    let mut cells = Vec::new();
    for record in csv_reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                tracing::warn!("Skipping malformed CSV row: {}", e);
                continue;
            }
        };
        if let Some(cell) = record.get(column).filter(|c| !c.is_empty()) {
            cells.push(cell.to_string());
        }
    }

    tracing::debug!("Read {} URL cells from CSV column {}", cells.len(), column);
    validate_urls(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(urls: Vec<PageUrl>) -> Vec<String> {
        urls.into_iter().map(|u| u.extract()).collect()
    }

    #[test]
    fn test_validate_urls_keeps_order_and_drops_junk() {
        let urls = validate_urls([
            "https://acme.io/b",
            "acme.io/no-scheme",
            "  http://acme.io/a ",
            "ftp://acme.io/file",
            "https://",
        ])
        .unwrap();
        assert_eq!(strings(urls), vec!["https://acme.io/b", "http://acme.io/a"]);
    }

    #[test]
    fn test_csv_named_column() {
        let data = "title,Link,notes\nHome,https://acme.io/,x\nBlank,,y\nDocs,https://acme.io/docs,z\n";
        let urls = urls_from_csv(data.as_bytes()).unwrap();
        assert_eq!(strings(urls), vec!["https://acme.io/", "https://acme.io/docs"]);
    }

    #[test]
    fn test_csv_falls_back_to_first_column() {
        let data = "location,title\nhttps://acme.io/a,A\nnot a url,B\nhttps://acme.io/b,C\n";
        let urls = urls_from_csv(data.as_bytes()).unwrap();
        assert_eq!(strings(urls), vec!["https://acme.io/a", "https://acme.io/b"]);
    }

    #[test]
    fn test_csv_malformed_row_is_skipped() {
        let data: &[u8] = b"url\nhttps://acme.io/a\nhttps://acme.io/\xff\xfe\nhttps://acme.io/b\n";
        let urls = urls_from_csv(data).unwrap();
        assert_eq!(strings(urls), vec!["https://acme.io/a", "https://acme.io/b"]);
    }

    #[test]
    fn test_csv_header_only() {
        let urls = urls_from_csv("url\n".as_bytes()).unwrap();
        assert!(urls.is_empty());
    }
}
