/*! Back-translation stage.

Target-language sentences are translated into English through an LLM batch API:

1. one query file per language is written to `API_QUERIES_DIR/<code>_queries.jsonl`,
2. each file is uploaded and a batch is created. Batches are saved in `API_QUERIES_DIR/batches.json`,
3. batches are polled until they all reach a terminal status,
4. outputs of completed batches are matched back to their sentence by `custom_id`
   and written as [ParallelPair]s to `PARALLEL_DATA_DIR/<code>-en_data.jsonl`.

With `resume`, steps 1 and 2 are skipped and the saved batches are followed instead.
!*/
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::time::Duration;

use log::{error, info, warn};
use serde::Serialize;

use crate::config::{BackTranslation, Config};
use crate::error::Error;
use crate::io::{read_all, JsonlWriter, WriterTrait};
use crate::sources::batch::{
    parse_output, Batch, BatchQuery, BatchService, BatchStatus, ChatBody, Message,
};
use crate::types::{ParallelPair, Sentence};

use super::Pipeline;

/// Saved batches, by language code.
pub type Registry = BTreeMap<String, Batch>;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BackTranslateSummary {
    #[serde(rename = "Language")]
    pub language: String,
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Pairs")]
    pub pairs: usize,
}

pub fn translation_prompt(sentence: &str, lang_name: &str) -> String {
    format!("Translate the following {lang_name} sentence into English:\n{sentence}")
}

fn custom_id(code: &str, idx: usize) -> String {
    format!("{code}_{idx}")
}

/// One chat query per sentence, identified by `<code>_<index>`.
pub fn build_queries(
    code: &str,
    lang_name: &str,
    sentences: &[Sentence],
    settings: &BackTranslation,
) -> Vec<BatchQuery> {
    sentences
        .iter()
        .enumerate()
        .map(|(idx, sentence)| {
            let body = ChatBody {
                model: settings.model.clone(),
                messages: vec![
                    Message {
                        role: "system".to_string(),
                        content: settings.system_prompt.clone(),
                    },
                    Message {
                        role: "user".to_string(),
                        content: translation_prompt(&sentence.text, lang_name),
                    },
                ],
                max_tokens: settings.max_tokens,
            };
            BatchQuery::chat(custom_id(code, idx), body)
        })
        .collect()
}

/// Pair each sentence with the translation bearing its `custom_id`.
///
/// Fails if the number of translations differs from the number of sentences,
/// or if a sentence has no translation.
pub fn build_parallel_data(
    code: &str,
    sentences: Vec<Sentence>,
    output: &str,
) -> Result<Vec<ParallelPair>, Error> {
    let mut translations: HashMap<String, String> = parse_output(output)?
        .into_iter()
        .filter_map(|o| o.translation().map(|t| (o.custom_id.clone(), t.to_string())))
        .collect();

    if translations.len() != sentences.len() {
        return Err(Error::Batch(format!(
            "Mismatch: {} translations vs {} source sentences",
            translations.len(),
            sentences.len()
        )));
    }

    sentences
        .into_iter()
        .enumerate()
        .map(|(idx, sentence)| {
            let id = custom_id(code, idx);
            match translations.remove(&id) {
                Some(translation) => Ok(ParallelPair::from_translation(sentence, translation)),
                None => Err(Error::Batch(format!("no translation for {id}"))),
            }
        })
        .collect()
}

pub struct BackTranslate<'a, C: BatchService> {
    config: &'a Config,
    client: C,
    resume: bool,
    poll_interval: Duration,
}

impl<'a, C: BatchService> BackTranslate<'a, C> {
    pub fn new(config: &'a Config, client: C, resume: bool) -> Self {
        Self {
            config,
            client,
            resume,
            poll_interval: Duration::from_secs(config.batch_api.poll_interval_secs),
        }
    }

    fn read_sentences(&self, code: &str) -> Result<Vec<Sentence>, Error> {
        read_all(&self.config.directory.sentences_file(code))
    }

    /// Write query files, returning the codes of languages that have one.
    pub fn create_batch_query_files(&self) -> Result<Vec<String>, Error> {
        std::fs::create_dir_all(&self.config.directory.api_queries)?;
        let settings = &self.config.data_processing.back_translation;

        let mut codes = Vec::new();
        for (code, lang) in &self.config.languages {
            let sentences = match self.read_sentences(code) {
                Ok(s) if !s.is_empty() => s,
                Ok(_) => {
                    warn!("[{}] no sentences, skipping", code);
                    continue;
                }
                Err(e) => {
                    warn!("[{}] could not read sentences: {}", code, e);
                    continue;
                }
            };

            let queries = build_queries(code, &lang.name, &sentences, settings);
            let mut writer = JsonlWriter::create(&self.config.directory.queries_file(code))?;
            writer.write(queries)?;
            writer.flush()?;

            info!("[{}] {} queries written", code, writer.nb_records());
            codes.push(code.clone());
        }
        Ok(codes)
    }

    pub fn submit_batch_jobs(&self, codes: &[String]) -> Result<Registry, Error> {
        let mut registry = Registry::new();
        for code in codes {
            let file_id = self
                .client
                .upload_file(&self.config.directory.queries_file(code))?;
            let batch = self
                .client
                .create_batch(&file_id, &format!("backtranslation batch for {code}"))?;
            info!("[{}] submitted batch {}", code, batch.id);
            registry.insert(code.clone(), batch);
        }
        info!("submitted {} batch jobs", registry.len());
        Ok(registry)
    }

    /// Refresh every batch, logging its progress.
    pub fn check_batch_status(&self, registry: &mut Registry) -> Result<(), Error> {
        for (code, batch) in registry.iter_mut() {
            if batch.status.is_terminal() {
                continue;
            }
            *batch = self.client.retrieve_batch(&batch.id)?;
            let counts = batch.request_counts.unwrap_or_default();
            info!(
                "[{}] status={}, completed={}, failed={}, total={}",
                code,
                batch.status.as_str(),
                counts.completed,
                counts.failed,
                counts.total
            );
        }
        Ok(())
    }

    fn save_registry(&self, registry: &Registry) -> Result<(), Error> {
        let f = File::create(self.config.directory.batch_registry())?;
        serde_json::to_writer_pretty(f, registry)?;
        Ok(())
    }

    fn load_registry(&self) -> Result<Registry, Error> {
        let path = self.config.directory.batch_registry();
        if !path.exists() {
            return Err(Error::MissingFile(path));
        }
        Ok(serde_json::from_reader(File::open(path)?)?)
    }

    fn wait(&self, registry: &mut Registry) -> Result<(), Error> {
        loop {
            self.check_batch_status(registry)?;
            self.save_registry(registry)?;
            if registry.values().all(|b| b.status.is_terminal()) {
                return Ok(());
            }
            std::thread::sleep(self.poll_interval);
        }
    }

    fn retrieve_lang(&self, code: &str, batch: &Batch) -> Result<usize, Error> {
        let output_id = batch
            .output_file_id
            .as_deref()
            .ok_or_else(|| Error::Batch(format!("batch {} has no output file", batch.id)))?;
        let output = self.client.file_content(output_id)?;
        let pairs = build_parallel_data(code, self.read_sentences(code)?, &output)?;

        std::fs::create_dir_all(&self.config.directory.parallel_data)?;
        let mut writer = JsonlWriter::create(&self.config.directory.parallel_file(code))?;
        writer.write(pairs)?;
        writer.flush()?;
        Ok(writer.nb_records())
    }

    /// Write parallel data for every completed batch.
    pub fn retrieve_and_create_parallel_data(
        &self,
        registry: &Registry,
    ) -> Vec<BackTranslateSummary> {
        let mut summaries = Vec::with_capacity(registry.len());
        for (code, batch) in registry {
            let pairs = if batch.status == BatchStatus::Completed {
                match self.retrieve_lang(code, batch) {
                    Ok(pairs) => {
                        info!("[{}] created {} sentence pairs", code, pairs);
                        pairs
                    }
                    Err(e) => {
                        error!("[{}] could not create parallel data: {}", code, e);
                        0
                    }
                }
            } else {
                error!(
                    "[{}] batch {} ended with status {}",
                    code,
                    batch.id,
                    batch.status.as_str()
                );
                0
            };

            summaries.push(BackTranslateSummary {
                language: self.config.language_name(code).to_string(),
                code: code.clone(),
                status: batch.status.as_str().to_string(),
                pairs,
            });
        }
        summaries
    }
}

impl<'a, C: BatchService> Pipeline<Vec<BackTranslateSummary>> for BackTranslate<'a, C> {
    fn name() -> &'static str {
        "backtranslate"
    }

    fn run(&self) -> Result<Vec<BackTranslateSummary>, Error> {
        let mut registry = if self.resume {
            info!("resuming saved batches");
            self.load_registry()?
        } else {
            let codes = self.create_batch_query_files()?;
            let registry = self.submit_batch_jobs(&codes)?;
            self.save_registry(&registry)?;
            registry
        };

        self.wait(&mut registry)?;
        Ok(self.retrieve_and_create_parallel_data(&registry))
    }
}
