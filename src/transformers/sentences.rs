//! Sentence segmentation and cleaning.
//!
//! Text extracted from PDFs is hard-wrapped, so segmentation first rebuilds paragraphs
//! (blank-line separated blocks, with inner newlines turned into spaces),
//! then splits each paragraph following Unicode sentence boundaries (UAX #29).
use lazy_static::lazy_static;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use super::Transform;

lazy_static! {
    static ref PARAGRAPH_BREAK: Regex = Regex::new(r"\n[ \t\r]*\n").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref HEADING: Regex = Regex::new(r"#+\s*").unwrap();
    static ref EMPHASIS: Regex = Regex::new(r"\*+").unwrap();
    static ref BRACKETS: Regex = Regex::new(r"[\[\]()]").unwrap();
}

/// Split text into sentences.
///
/// Returned sentences are not cleaned: they may keep trailing whitespace or markdown markers.
pub fn split_sentences(text: &str) -> Vec<String> {
    PARAGRAPH_BREAK
        .split(text)
        .map(|paragraph| WHITESPACE.replace_all(paragraph.trim(), " "))
        .filter(|paragraph| !paragraph.is_empty())
        .flat_map(|paragraph| {
            paragraph
                .unicode_sentences()
                .map(String::from)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Removes markdown formatting from a sentence.
///
/// - whitespace runs become a single space,
/// - heading markers (`#`, with following whitespace) and emphasis (`*`) are removed,
/// - square brackets and parentheses are removed,
/// - the result is trimmed.
#[derive(Default)]
pub struct CleanSentence;

impl Transform for CleanSentence {
    fn transform_own(&self, sentence: String) -> String {
        let s = WHITESPACE.replace_all(&sentence, " ");
        let s = HEADING.replace_all(&s, "");
        let s = EMPHASIS.replace_all(&s, "");
        let s = BRACKETS.replace_all(&s, "");
        s.trim().to_string()
    }
}
