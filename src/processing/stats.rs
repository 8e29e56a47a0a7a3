//! Sentence corpus statistics.
//!
//! Lengths are counted in unicode codepoints, words are whitespace-separated tokens.
use std::collections::HashMap;

use serde::Serialize;

/// Length and word count statistics over a set of sentences.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct LengthStats {
    pub total: usize,
    pub avg_length: f64,
    pub min_length: usize,
    pub max_length: usize,
    pub avg_words: f64,
    pub min_words: usize,
    pub max_words: usize,
}

/// Compute [LengthStats]. An empty input gives zeroes everywhere.
pub fn calculate_stats<S: AsRef<str>>(sentences: &[S]) -> LengthStats {
    if sentences.is_empty() {
        return LengthStats::default();
    }

    let lengths: Vec<usize> = sentences
        .iter()
        .map(|s| s.as_ref().chars().count())
        .collect();
    let word_counts: Vec<usize> = sentences
        .iter()
        .map(|s| s.as_ref().split_whitespace().count())
        .collect();

    let total = sentences.len();
    LengthStats {
        total,
        avg_length: lengths.iter().sum::<usize>() as f64 / total as f64,
        min_length: lengths.iter().copied().min().unwrap_or(0),
        max_length: lengths.iter().copied().max().unwrap_or(0),
        avg_words: word_counts.iter().sum::<usize>() as f64 / total as f64,
        min_words: word_counts.iter().copied().min().unwrap_or(0),
        max_words: word_counts.iter().copied().max().unwrap_or(0),
    }
}

/// Exact-duplicate accounting.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct DuplicateStats {
    /// sum over duplicated sentences of (occurrences - 1)
    pub total_duplicate_instances: usize,
    /// number of distinct sentences that occur more than once
    pub unique_duplicate_sentences: usize,
    /// `total_duplicate_instances` over the number of sentences, in percent.
    pub duplicate_percentage: f64,
}

/// Occurrence counter.
#[derive(Default)]
struct Counter<'a> {
    counts: HashMap<&'a str, usize>,
}

impl<'a> Counter<'a> {
    #[inline]
    fn add(&mut self, sentence: &'a str) {
        self.counts
            .entry(sentence)
            .and_modify(|count| *count += 1)
            .or_insert(1);
    }

    fn duplicates(&self) -> impl Iterator<Item = usize> + '_ {
        self.counts.values().copied().filter(|count| *count > 1)
    }
}

pub fn find_duplicates<S: AsRef<str>>(sentences: &[S]) -> DuplicateStats {
    let mut counter = Counter::default();
    for sentence in sentences {
        counter.add(sentence.as_ref());
    }

    let total_duplicate_instances = counter.duplicates().map(|c| c - 1).sum();
    let unique_duplicate_sentences = counter.duplicates().count();
    let duplicate_percentage = if sentences.is_empty() {
        0.0
    } else {
        total_duplicate_instances as f64 / sentences.len() as f64 * 100.0
    };

    DuplicateStats {
        total_duplicate_instances,
        unique_duplicate_sentences,
        duplicate_percentage,
    }
}

const NB_BINS: usize = 6;

/// Length bins, upper bounds are inclusive. The last bin has no upper bound.
pub static LENGTH_BINS: [(&str, Option<usize>); NB_BINS] = [
    ("0-50", Some(50)),
    ("51-100", Some(100)),
    ("101-200", Some(200)),
    ("201-300", Some(300)),
    ("301-400", Some(400)),
    ("401+", None),
];

/// Sentence count per length bin, in [LENGTH_BINS] order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Distribution {
    counts: [usize; NB_BINS],
}

impl Distribution {
    fn bin_of(length: usize) -> usize {
        LENGTH_BINS
            .iter()
            .position(|(_, upper)| match upper {
                Some(upper) => length <= *upper,
                None => true,
            })
            .unwrap_or(NB_BINS - 1)
    }

    fn add(&mut self, length: usize) {
        self.counts[Self::bin_of(length)] += 1;
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Iterate over `(label, count, percentage)`.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize, f64)> + '_ {
        let total = self.total();
        LENGTH_BINS
            .iter()
            .zip(self.counts.iter())
            .map(move |((label, _), count)| {
                let pct = if total == 0 {
                    0.0
                } else {
                    *count as f64 / total as f64 * 100.0
                };
                (*label, *count, pct)
            })
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }
}

pub fn length_distribution<S: AsRef<str>>(sentences: &[S]) -> Distribution {
    let mut d = Distribution::default();
    for sentence in sentences {
        d.add(sentence.as_ref().chars().count());
    }
    d
}
