/*! Sentence statistics report.

Reads every `*.jsonl` file of `SENTENCES_DIR` (language code = file name without `_sentences.jsonl`)
and computes, per language and across all languages:

- length and word count statistics,
- exact duplicates,
- length distribution.
!*/
use std::collections::HashSet;
use std::fmt::Write;
use std::path::Path;

use itertools::Itertools;
use log::{error, info, warn};
use serde::Serialize;

use crate::config::Config;
use crate::error::Error;
use crate::io::summary::render_table;
use crate::io::{list_files, JsonlReader};
use crate::processing::stats::{
    calculate_stats, find_duplicates, length_distribution, Distribution, DuplicateStats,
    LengthStats,
};
use crate::types::Sentence;

use super::Pipeline;

const RULE_WIDTH: usize = 80;
const SENTENCES_SUFFIX: &str = "_sentences.jsonl";

/// `1234567` -> `"1,234,567"`.
pub fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let groups = digits.chars().rev().chunks(3);
    let reversed: String = groups
        .into_iter()
        .map(|group| group.collect::<String>())
        .join(",");
    reversed.chars().rev().collect()
}

/// Row of the per-language table.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LanguageRow {
    #[serde(rename = "Language")]
    pub language: String,
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Sentences")]
    pub sentences: usize,
    #[serde(rename = "Documents")]
    pub documents: usize,
    #[serde(rename = "Avg Len")]
    pub avg_len: String,
    #[serde(rename = "Avg Words")]
    pub avg_words: String,
    #[serde(rename = "Duplicates")]
    pub duplicates: usize,
    #[serde(rename = "Dup %")]
    pub dup_pct: String,
}

/// Statistics over a set of sentences.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusStats {
    pub lengths: LengthStats,
    pub duplicates: DuplicateStats,
    pub distribution: Distribution,
}

impl CorpusStats {
    pub fn new<S: AsRef<str>>(sentences: &[S]) -> Self {
        Self {
            lengths: calculate_stats(sentences),
            duplicates: find_duplicates(sentences),
            distribution: length_distribution(sentences),
        }
    }

    fn render(&self, out: &mut String) -> std::fmt::Result {
        let l = &self.lengths;
        let d = &self.duplicates;
        writeln!(out, "  Total Sentences: {}", thousands(l.total))?;
        writeln!(out, "  Average Length: {:.1} characters", l.avg_length)?;
        writeln!(out, "  Length Range: {}-{} characters", l.min_length, l.max_length)?;
        writeln!(out, "  Average Words: {:.1} words", l.avg_words)?;
        writeln!(out, "  Word Range: {}-{} words", l.min_words, l.max_words)?;
        writeln!(
            out,
            "  Unique Duplicate Sentences: {}",
            thousands(d.unique_duplicate_sentences)
        )?;
        writeln!(
            out,
            "  Total Duplicate Instances: {}",
            thousands(d.total_duplicate_instances)
        )?;
        writeln!(out, "  Duplicate Percentage: {:.2}%", d.duplicate_percentage)?;

        writeln!(out, "\n  Length Distribution:")?;
        for (label, count, pct) in self.distribution.iter() {
            writeln!(out, "    {label:>10} chars: {count:>6} ({pct:>5.1}%)")?;
        }
        Ok(())
    }
}

/// Statistics of a single language.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageStats {
    pub name: String,
    pub code: String,
    pub documents: usize,
    pub stats: CorpusStats,
}

impl LanguageStats {
    pub fn row(&self) -> LanguageRow {
        LanguageRow {
            language: self.name.clone(),
            code: self.code.clone(),
            sentences: self.stats.lengths.total,
            documents: self.documents,
            avg_len: format!("{:.1}", self.stats.lengths.avg_length),
            avg_words: format!("{:.1}", self.stats.lengths.avg_words),
            duplicates: self.stats.duplicates.unique_duplicate_sentences,
            dup_pct: format!("{:.2}%", self.stats.duplicates.duplicate_percentage),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsReport {
    pub languages: Vec<LanguageStats>,
    pub global: CorpusStats,
}

impl StatisticsReport {
    pub fn rows(&self) -> Vec<LanguageRow> {
        self.languages.iter().map(LanguageStats::row).collect()
    }

    fn section(out: &mut String, title: &str) -> std::fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(out, "\n{rule}\n{title}\n{rule}")
    }

    fn write_sections(&self, out: &mut String, table: &str) -> std::fmt::Result {
        Self::section(out, "LANGUAGE-SPECIFIC STATISTICS")?;
        write!(out, "{table}")?;

        Self::section(out, "DETAILED STATISTICS BY LANGUAGE")?;
        for lang in &self.languages {
            writeln!(out, "\n{} ({}):\n{}", lang.name, lang.code, "-".repeat(40))?;
            lang.stats.render(out)?;
        }

        if self.global.lengths.total > 0 {
            Self::section(out, "GLOBAL STATISTICS (ALL LANGUAGES)")?;
            self.global.render(out)?;
        }
        writeln!(out, "\n{}", "=".repeat(RULE_WIDTH))
    }

    /// Human readable report: per-language table, per-language details, global statistics.
    pub fn render(&self) -> Result<String, Error> {
        let table = render_table(&self.rows())?;
        let mut out = String::new();
        self.write_sections(&mut out, &table)
            .map_err(|e| Error::Custom(format!("could not render report: {e}")))?;
        Ok(out)
    }
}

pub struct Statistics<'a> {
    config: &'a Config,
}

impl<'a> Statistics<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    fn code_of(path: &Path) -> String {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        match name.strip_suffix(SENTENCES_SUFFIX) {
            Some(code) => code.to_string(),
            None => name.trim_end_matches(".jsonl").to_string(),
        }
    }

    /// Sentence texts and number of distinct documents of a file.
    fn read_file(path: &Path) -> Result<(Vec<String>, usize), Error> {
        let mut texts = Vec::new();
        let mut doc_ids = HashSet::new();
        for sentence in JsonlReader::<Sentence>::from_path(path)? {
            let sentence = sentence?;
            doc_ids.insert(sentence.doc_id);
            texts.push(sentence.text);
        }
        Ok((texts, doc_ids.len()))
    }
}

impl<'a> Pipeline<Option<StatisticsReport>> for Statistics<'a> {
    fn name() -> &'static str {
        "stats"
    }

    /// Returns [None] if there is nothing to report on.
    fn run(&self) -> Result<Option<StatisticsReport>, Error> {
        let src = &self.config.directory.sentences;
        if !src.is_dir() {
            warn!("Sentences directory not found: {:?}", src);
            return Ok(None);
        }
        let files = list_files(src, &["jsonl"])?;
        if files.is_empty() {
            warn!("No JSONL files found in {:?}", src);
            return Ok(None);
        }
        info!("found {} JSONL file(s)", files.len());

        let mut languages = Vec::with_capacity(files.len());
        let mut all_texts: Vec<String> = Vec::new();
        for path in &files {
            let code = Self::code_of(path);
            let (texts, documents) = match Self::read_file(path) {
                Ok(r) => r,
                Err(e) => {
                    error!("Error processing {:?}: {}", path, e);
                    continue;
                }
            };

            languages.push(LanguageStats {
                name: self.config.language_name(&code).to_string(),
                code,
                documents,
                stats: CorpusStats::new(&texts),
            });
            all_texts.extend(texts);
        }

        Ok(Some(StatisticsReport {
            languages,
            global: CorpusStats::new(&all_texts),
        }))
    }
}
