use url::Url;

use crate::errors::Error;

/// Construct a new zero-sized type wrapper around a to-be-validated value.
/// The newtype only exists for values that are valid according to the $is_valid function.
macro_rules! newtype_valid {
    ($name:ident, $inner:path, $is_valid:expr, $error:path, $new_error:expr) => {
        #[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
        pub struct $name($inner);

        impl std::fmt::Display for $name {
            /// Displays $inner only.
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl $name {
            /// Create a new instance of $name if the $inner value is valid. Returns an error on failure.
            pub fn new(maybe_valid_inner: $inner) -> Result<Self, $error> {
                if Self::is_valid(&maybe_valid_inner) {
                    Ok($name(maybe_valid_inner))
                } else {
                    let e: $error = $new_error(&maybe_valid_inner);
                    Err(e)
                }
            }

            /// True if the $inner value is a valid instance of $name. False otherwise.
            pub fn is_valid(maybe_valid_inner: &$inner) -> bool {
                $is_valid(maybe_valid_inner)
            }

            /// Destroys the $name wrapper, obtaining the $inner value directly.
            pub fn extract(self) -> $inner {
                self.0
            }
        }
    };
}

/// True for non-empty, absolute `http`/`https` URLs with a host.
fn is_page_url(candidate: &String) -> bool {
    match Url::parse(candidate.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}

newtype_valid!(PageUrl, String, is_page_url, Error, |s: &String| {
    Error::InvalidPageUrl(s.clone())
});

impl PageUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the raw text, trimming surrounding whitespace first.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        Self::new(raw.trim().to_string())
    }
}

impl AsRef<str> for PageUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(PageUrl::parse("https://example.com/docs").is_ok());
        assert!(PageUrl::parse("http://example.com").is_ok());
        assert_eq!(
            PageUrl::parse("  https://example.com/a  ").unwrap().as_str(),
            "https://example.com/a"
        );
    }

    #[test]
    fn test_rejects_non_page_urls() {
        for bad in ["", "   ", "example.com/docs", "ftp://example.com/file", "mailto:me@example.com", "/relative"] {
            assert!(PageUrl::parse(bad).is_err(), "expected '{}' to be rejected", bad);
        }
    }

    #[test]
    fn test_display_is_inner_value() {
        let url = PageUrl::parse("https://example.com/x").unwrap();
        assert_eq!(url.to_string(), "https://example.com/x");
        assert_eq!(url.extract(), "https://example.com/x".to_string());
    }
}
