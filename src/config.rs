/*! Pipeline configuration.

Configuration is read from a YAML file (`config.yaml` by default):

```yaml
project:
  seed: 42
LANGUAGES:
  fr:
    name: French
    max_articles: 500
    target_sentences: 10000
directory:
  METADATA_DIR: data/metadata
  PDFS_DIR: data/pdfs
  EXTRACTED_DIR: data/extracted
  SENTENCES_DIR: data/sentences
  API_QUERIES_DIR: data/api_queries
  PARALLEL_DATA_DIR: data/parallel
  RESULTS_DIR: results
data_processing:
  back_translation:
    model: gpt-4o-mini
    system_prompt: You are a professional translator.
    max_tokens: 512
  train_val_test_split:
    val_ratio: 0.1
    test_ratio: 0.1
```

Languages are kept in a [BTreeMap] so that every stage walks them in the same order.
!*/
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::error::Error;

/// Per-language settings, keyed by ISO 639-1 code in [Config::languages].
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LanguageConfig {
    pub name: String,
    pub max_articles: usize,
    pub target_sentences: usize,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub project: Project,
    #[serde(rename = "LANGUAGES")]
    pub languages: BTreeMap<String, LanguageConfig>,
    pub directory: Directories,
    #[serde(default)]
    pub data_processing: DataProcessing,
    #[serde(default)]
    pub language_identification: LanguageIdentification,
    #[serde(default)]
    pub openalex: OpenAlex,
    #[serde(default)]
    pub batch_api: BatchApi,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub seed: u64,
}

impl Default for Project {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Directories {
    #[serde(rename = "METADATA_DIR")]
    pub metadata: PathBuf,
    #[serde(rename = "PDFS_DIR")]
    pub pdfs: PathBuf,
    #[serde(rename = "EXTRACTED_DIR")]
    pub extracted: PathBuf,
    #[serde(rename = "SENTENCES_DIR")]
    pub sentences: PathBuf,
    #[serde(rename = "API_QUERIES_DIR")]
    pub api_queries: PathBuf,
    #[serde(rename = "PARALLEL_DATA_DIR")]
    pub parallel_data: PathBuf,
    #[serde(rename = "RESULTS_DIR")]
    pub results: PathBuf,
}

impl Directories {
    /// Every configured directory.
    pub fn all(&self) -> [&Path; 7] {
        [
            &self.metadata,
            &self.pdfs,
            &self.extracted,
            &self.sentences,
            &self.api_queries,
            &self.parallel_data,
            &self.results,
        ]
    }

    pub fn metadata_file(&self, code: &str) -> PathBuf {
        self.metadata.join(format!("{code}_article_data.csv"))
    }

    pub fn lang_pdfs(&self, code: &str) -> PathBuf {
        self.pdfs.join(code)
    }

    pub fn lang_extracted(&self, code: &str) -> PathBuf {
        self.extracted.join(code)
    }

    pub fn sentences_file(&self, code: &str) -> PathBuf {
        self.sentences.join(format!("{code}_sentences.jsonl"))
    }

    pub fn queries_file(&self, code: &str) -> PathBuf {
        self.api_queries.join(format!("{code}_queries.jsonl"))
    }

    pub fn batch_registry(&self) -> PathBuf {
        self.api_queries.join("batches.json")
    }

    pub fn parallel_file(&self, code: &str) -> PathBuf {
        self.parallel_data.join(format!("{code}-en_data.jsonl"))
    }

    pub fn split_file(&self, code: &str, split: &str) -> PathBuf {
        self.parallel_data.join(format!("{code}-en_{split}.jsonl"))
    }

    pub fn summary_file(&self, stage: &str) -> PathBuf {
        self.results.join(format!("{stage}_summary.csv"))
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct DataProcessing {
    #[serde(default)]
    pub back_translation: BackTranslation,
    #[serde(default)]
    pub train_val_test_split: SplitRatios,
    #[serde(default)]
    pub sentence_filter: SentenceFilter,
    /// Truncate every language to the smallest one before splitting.
    #[serde(default)]
    pub equal_length: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BackTranslation {
    pub model: String,
    pub system_prompt: String,
    pub max_tokens: u32,
}

impl Default for BackTranslation {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            system_prompt: "You are a professional translator. Answer with the translation only."
                .to_string(),
            max_tokens: 512,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct SplitRatios {
    pub val_ratio: f64,
    pub test_ratio: f64,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            val_ratio: 0.1,
            test_ratio: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct SentenceFilter {
    pub min_length: usize,
    pub max_length: usize,
    pub min_letters: usize,
}

impl Default for SentenceFilter {
    fn default() -> Self {
        Self {
            min_length: 10,
            max_length: 500,
            min_letters: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LanguageIdentification {
    pub model_path: PathBuf,
    pub threshold: f32,
}

impl Default for LanguageIdentification {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("lid.176.bin"),
            threshold: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct OpenAlex {
    pub base_url: String,
    pub mailto: String,
    pub per_page: u32,
}

impl Default for OpenAlex {
    fn default() -> Self {
        Self {
            base_url: "https://api.openalex.org".to_string(),
            mailto: "example@email.com".to_string(),
            per_page: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BatchApi {
    pub base_url: String,
    pub poll_interval_secs: u64,
}

impl Default for BatchApi {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            poll_interval_secs: 30,
        }
    }
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Err(Error::MissingFile(path.to_path_buf()));
        }
        let f = File::open(path)?;
        let config: Config = serde_yaml::from_reader(f)?;
        debug!("loaded config from {:?}: {:#?}", path, config);
        Ok(config)
    }

    /// Display name of a language, falling back to its code.
    pub fn language_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.languages
            .get(code)
            .map(|l| l.name.as_str())
            .unwrap_or(code)
    }
}
