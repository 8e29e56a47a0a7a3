//! sentence-level filtering
use runiq::filters::{DigestFilter, Filter as RuniqFilter};

use super::filter::FilterMut;
use super::Filter;
use crate::config::SentenceFilter;

/// Length filter.
/// Returns `true` if the sentence has between [Length::min_size] and [Length::max_size]
/// unicode codepoints (both inclusive).
///
/// Bounds are 10 and 500 by default.
pub struct Length {
    min_size: usize,
    max_size: usize,
}

impl Length {
    pub fn new(min_size: usize, max_size: usize) -> Self {
        Self { min_size, max_size }
    }

    /// Get a reference to the length's min size.
    pub fn min_size(&self) -> &usize {
        &self.min_size
    }

    /// Get a reference to the length's max size.
    pub fn max_size(&self) -> &usize {
        &self.max_size
    }
}

impl Filter<&str> for Length {
    fn detect(&self, sentence: &str) -> bool {
        let count = sentence.chars().count();
        count >= self.min_size && count <= self.max_size
    }
}

impl Default for Length {
    fn default() -> Self {
        Length {
            min_size: 10,
            max_size: 500,
        }
    }
}

/// Letter filter: keeps sentences that have at least [Letters::min_letters] letters.
///
/// A letter is an ASCII letter or any codepoint of the Basic Multilingual Plane above ASCII
/// (`U+0080..=U+FFFF`). Codepoints outside of the BMP (emojis, some CJK extensions) do not count.
pub struct Letters {
    min_letters: usize,
}

impl Letters {
    pub fn new(min_letters: usize) -> Self {
        Self { min_letters }
    }

    #[inline]
    pub fn is_letter(c: char) -> bool {
        c.is_ascii_alphabetic() || ('\u{80}'..='\u{FFFF}').contains(&c)
    }
}

impl Default for Letters {
    fn default() -> Self {
        Self { min_letters: 5 }
    }
}

impl Filter<&str> for Letters {
    fn detect(&self, sentence: &str) -> bool {
        // at least one letter is always required
        let needed = self.min_letters.max(1);

        // stop counting as soon as we know
        sentence
            .chars()
            .filter(|c| Self::is_letter(*c))
            .take(needed)
            .count()
            == needed
    }
}

/// Validity filter, combining [Length] and [Letters].
///
/// ```
/// use parcorpus::filtering::{Filter, Validity};
///
/// let f = Validity::default();
/// assert!(f.detect("Ceci est une phrase valide."));
/// assert!(!f.detect("1234567890"));
/// ```
#[derive(Default)]
pub struct Validity {
    length: Length,
    letters: Letters,
}

impl Validity {
    pub fn new(length: Length, letters: Letters) -> Self {
        Self { length, letters }
    }
}

impl From<&SentenceFilter> for Validity {
    fn from(c: &SentenceFilter) -> Self {
        Self {
            length: Length::new(c.min_length, c.max_length),
            letters: Letters::new(c.min_letters),
        }
    }
}

impl Filter<&str> for Validity {
    fn detect(&self, sentence: &str) -> bool {
        self.length.detect(sentence) && self.letters.detect(sentence)
    }
}

/// Uniqueness filter: returns `true` the first time a sentence is seen.
///
/// Backed by a digest set, so memory grows with the number of unique sentences
/// but not with their length.
#[derive(Default)]
pub struct Unique {
    inner: DigestFilter,
}

impl FilterMut<&str> for Unique {
    fn detect_mut(&mut self, sentence: &str) -> bool {
        self.inner.detect(sentence.as_bytes())
    }
}
