/*! Sentence extraction stage.

For each language, every `*.md`/`*.txt` document of `EXTRACTED_DIR/<code>` goes through:

1. markdown stripping (code blocks, tables, urls),
2. sentence segmentation,
3. sentence cleaning,
4. validity filtering (length and letter count),
5. language verification against the document's language.

Kept sentences are written to `SENTENCES_DIR/<code>_sentences.jsonl` until `target_sentences` is reached.
Languages are processed concurrently, one task per language.
!*/
use std::path::Path;

use log::{debug, error, info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::{Config, LanguageConfig};
use crate::error::Error;
use crate::filtering::{Filter, Validity};
use crate::identifiers::Identifier;
use crate::io::{list_files, stem_before_dot, JsonlWriter, WriterTrait};
use crate::transformers::{split_sentences, CleanSentence, StripMarkdown, Transform};
use crate::types::Sentence;

use super::Pipeline;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExtractSummary {
    #[serde(rename = "Language")]
    pub language: String,
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Documents")]
    pub documents: usize,
    #[serde(rename = "Sentences")]
    pub sentences: usize,
    #[serde(rename = "Avg per Doc")]
    pub avg_per_doc: String,
}

/// Extracts verified sentences from a single document.
pub struct SentenceExtractor<'a, I: Identifier> {
    identifier: &'a I,
    validity: Validity,
    strip: StripMarkdown,
    clean: CleanSentence,
}

impl<'a, I: Identifier> SentenceExtractor<'a, I> {
    pub fn new(identifier: &'a I, validity: Validity) -> Self {
        Self {
            identifier,
            validity,
            strip: StripMarkdown,
            clean: CleanSentence,
        }
    }

    /// Cleaned sentences of `text`, before any filtering.
    pub fn candidates(&self, text: String) -> Vec<String> {
        let text = self.strip.transform_own(text);
        split_sentences(&text)
            .into_iter()
            .map(|sentence| self.clean.transform_own(sentence))
            .collect()
    }

    /// Extract at most `limit` sentences in language `code` from `text`.
    ///
    /// `sent_id` is the index among kept sentences.
    pub fn extract_document(
        &self,
        code: &str,
        doc_id: &str,
        text: String,
        limit: usize,
    ) -> Result<Vec<Sentence>, Error> {
        let mut kept = Vec::new();
        for candidate in self.candidates(text) {
            if kept.len() >= limit {
                break;
            }
            if !self.validity.detect(candidate.as_str()) {
                continue;
            }
            if self.identifier.detect_language(&candidate)?.as_deref() != Some(code) {
                continue;
            }
            kept.push(Sentence {
                sent_id: kept.len(),
                text: candidate,
                lang: code.to_string(),
                doc_id: doc_id.to_string(),
            });
        }
        Ok(kept)
    }
}

pub struct Extract<'a, I: Identifier + Sync> {
    config: &'a Config,
    identifier: I,
}

impl<'a, I: Identifier + Sync> Extract<'a, I> {
    pub fn new(config: &'a Config, identifier: I) -> Self {
        Self { config, identifier }
    }

    fn extract_lang(&self, code: &str, lang: &LanguageConfig) -> Result<Option<ExtractSummary>, Error> {
        let src = self.config.directory.lang_extracted(code);
        if !src.is_dir() {
            warn!("[{}] no extracted documents at {:?}, skipping", code, src);
            return Ok(None);
        }

        let documents = list_files(&src, &["md", "txt"])?;
        let extractor = SentenceExtractor::new(
            &self.identifier,
            Validity::from(&self.config.data_processing.sentence_filter),
        );

        std::fs::create_dir_all(&self.config.directory.sentences)?;
        let dst = self.config.directory.sentences_file(code);
        let mut writer = JsonlWriter::create(&dst)?;

        info!("[{}] extracting sentences from {} documents", code, documents.len());
        for document in &documents {
            let remaining = lang.target_sentences.saturating_sub(writer.nb_records());
            if remaining == 0 {
                info!("[{}] target of {} sentences reached", code, lang.target_sentences);
                break;
            }

            match Self::extract_file(&extractor, code, document, remaining) {
                Ok(sentences) => {
                    debug!("[{}] {:?}: {} sentences", code, document, sentences.len());
                    writer.write(sentences)?;
                }
                Err(e) => error!("[{}] could not extract {:?}: {}", code, document, e),
            }
        }
        writer.flush()?;

        let sentences = writer.nb_records();
        info!("[{}] {} sentences written to {:?}", code, sentences, dst);
        Ok(Some(ExtractSummary {
            language: lang.name.clone(),
            code: code.to_string(),
            documents: documents.len(),
            sentences,
            avg_per_doc: if documents.is_empty() {
                "0".to_string()
            } else {
                format!("{:.1}", sentences as f64 / documents.len() as f64)
            },
        }))
    }

    fn extract_file(
        extractor: &SentenceExtractor<I>,
        code: &str,
        document: &Path,
        limit: usize,
    ) -> Result<Vec<Sentence>, Error> {
        let text = std::fs::read_to_string(document)?;
        extractor.extract_document(code, &stem_before_dot(document), text, limit)
    }
}

impl<'a, I: Identifier + Sync> Pipeline<Vec<ExtractSummary>> for Extract<'a, I> {
    fn name() -> &'static str {
        "extract"
    }

    fn run(&self) -> Result<Vec<ExtractSummary>, Error> {
        let results: Vec<Result<Option<ExtractSummary>, Error>> = self
            .config
            .languages
            .par_iter()
            .map(|(code, lang)| self.extract_lang(code, lang))
            .collect();

        // par_iter on a BTreeMap keeps the language order
        let mut summaries = Vec::with_capacity(results.len());
        for result in results {
            if let Some(summary) = result? {
                summaries.push(summary);
            }
        }
        Ok(summaries)
    }
}
