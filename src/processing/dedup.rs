/*! Deduplication

Uses [runiq](https://github.com/whitfin/runiq) digests (through [crate::filtering::sentence::Unique])
to keep the first occurrence of each sentence.
!*/
use std::path::Path;

use log::{error, info};
use rayon::prelude::*;
use serde::Serialize;

use crate::error::Error;
use crate::filtering::sentence::Unique;
use crate::filtering::FilterMut;
use crate::io::{JsonlReader, JsonlWriter, WriterTrait};
use crate::types::Sentence;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DedupSummary {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Before")]
    pub before: usize,
    #[serde(rename = "After")]
    pub after: usize,
    #[serde(rename = "Removed")]
    pub removed: usize,
}

/// deduplicates sentences, keeping order and first occurrences.
pub fn dedup_sentences(
    sentences: impl Iterator<Item = Sentence>,
    filter: &mut Unique,
) -> Vec<Sentence> {
    sentences
        .filter(|sentence| filter.detect_mut(sentence.text.as_str()))
        .collect()
}

/// deduplicates a whole language file in place.
pub fn dedup_lang(code: &str, src: &Path) -> Result<DedupSummary, Error> {
    info!("[{}] starting deduplication", code);
    let sentences: Vec<Sentence> = JsonlReader::from_path(src)?.collect::<Result<_, _>>()?;
    let before = sentences.len();

    let mut filter = Unique::default();
    let kept = dedup_sentences(sentences.into_iter(), &mut filter);
    let after = kept.len();

    // written next to the source, then renamed over it
    let tmp = src.with_extension("jsonl.tmp");
    let mut writer = JsonlWriter::create(&tmp)?;
    writer.write(kept)?;
    writer.flush()?;
    std::fs::rename(&tmp, src)?;

    info!("[{}] deduplication done ({} -> {})", code, before, after);
    Ok(DedupSummary {
        code: code.to_string(),
        before,
        after,
        removed: before - after,
    })
}

/// run deduplication on language files concurrently.
///
/// Languages whose file is missing or invalid are logged and skipped.
pub fn dedup(files: Vec<(String, std::path::PathBuf)>) -> Vec<DedupSummary> {
    let mut summaries: Vec<DedupSummary> = files
        .into_par_iter()
        .filter_map(|(code, path)| match dedup_lang(&code, &path) {
            Ok(summary) => Some(summary),
            Err(e) => {
                error!("[{}] deduplication failed: {}", code, e);
                None
            }
        })
        .collect();
    summaries.sort_by(|a, b| a.code.cmp(&b.code));
    summaries
}
