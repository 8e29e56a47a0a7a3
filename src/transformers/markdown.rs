//! Removes non-prose markdown content before sentence segmentation.
//!
//! Three kinds of content are removed, in that order:
//! 1. fenced code blocks (they can span over multiple lines),
//! 2. table cells (`| foo |`, on a single line),
//! 3. http(s) URLs.
//!
//! ~~~text
//! Voici un exemple :
//! ```python
//! print("hello")
//! ```
//! | a | b |
//! Voir https://example.org/page pour plus d'informations.
//! ~~~
//!
//! will be transformed into
//!
//! ~~~text
//! Voici un exemple :
//!
//!  b |
//! Voir  pour plus d'informations.
//! ~~~
use lazy_static::lazy_static;
use regex::Regex;

use super::Transform;

lazy_static! {
    static ref CODE_BLOCK: Regex = Regex::new(r"(?s)```.*?```").unwrap();
    static ref TABLE_CELL: Regex = Regex::new(r"\|.*?\|").unwrap();
    static ref URL: Regex =
        Regex::new(r"https?://(?:[a-zA-Z0-9$-_@.&+!*\\(),]|%[0-9a-fA-F]{2})+").unwrap();
}

#[derive(Default)]
pub struct StripMarkdown;

impl Transform for StripMarkdown {
    fn transform_own(&self, text: String) -> String {
        let text = CODE_BLOCK.replace_all(&text, "");
        let text = TABLE_CELL.replace_all(&text, "");
        URL.replace_all(&text, "").into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::StripMarkdown;
    use crate::transformers::Transform;

    #[test]
    fn code_blocks() {
        let text = "before\n```rust\nfn main() {}\n```\nafter".to_string();
        assert_eq!(StripMarkdown.transform_own(text), "before\n\nafter");
    }

    #[test]
    fn unclosed_code_block_is_kept() {
        let text = "before ``` after".to_string();
        assert_eq!(StripMarkdown.transform_own(text.clone()), text);
    }

    #[test]
    fn tables() {
        let text = "|col1|col2|col3|\nplain line".to_string();
        // cells are consumed pairwise, non greedily
        assert_eq!(StripMarkdown.transform_own(text), "col2\nplain line");
    }

    #[test]
    fn table_cells_do_not_span_lines() {
        let text = "a | b\nc | d".to_string();
        assert_eq!(StripMarkdown.transform_own(text.clone()), text);
    }

    #[test]
    fn urls() {
        let text = "Voir https://example.org/a?b=c%20d pour plus, ou http://foo.bar."
            .to_string();
        assert_eq!(StripMarkdown.transform_own(text), "Voir  pour plus, ou ");
    }
}
