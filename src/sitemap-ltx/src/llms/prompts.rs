use std::collections::HashMap;

use indoc::indoc;
use subst::substitute;

use crate::errors::Error;

const DESCRIBE_PAGE: &str = indoc! { "
  Please provide a concise, informative description (1-2 sentences, max 150 characters)
  for this webpage content. Focus on what information or functionality it provides:

  ${CONTENT}

  Description:"
};

/// Builds the page description prompt. `content` is inserted verbatim; truncate it first.
pub fn prompt_describe_page(content: &str) -> Result<String, Error> {
    let res = substitute(DESCRIBE_PAGE, &{
        let mut v = HashMap::new();
        v.insert("CONTENT".to_string(), content.to_string());
        v
    })?;
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_describe_page() {
        let p = prompt_describe_page("Install the CLI with cargo.").unwrap();
        assert_eq!(
            p,
            indoc! { "
              Please provide a concise, informative description (1-2 sentences, max 150 characters)
              for this webpage content. Focus on what information or functionality it provides:

              Install the CLI with cargo.

              Description:"
            }
        );
    }

    #[test]
    fn test_prompt_content_is_not_reinterpreted() {
        let p = prompt_describe_page("costs $5 or ${PRICE}").unwrap();
        assert!(p.contains("costs $5 or ${PRICE}"));
    }
}
