//! Final corpus split.
//!
//! Parallel data of each language is split in `train`/`val`/`test` files,
//! optionally after truncating every language to the smallest one.
use log::{info, warn};
use serde::Serialize;

use crate::config::Config;
use crate::error::Error;
use crate::io::{read_all, JsonlWriter, WriterTrait};
use crate::processing::split::{equalize, split};
use crate::types::ParallelPair;

use super::Pipeline;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FinalizeSummary {
    #[serde(rename = "Language")]
    pub language: String,
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Pairs")]
    pub pairs: usize,
    #[serde(rename = "Train")]
    pub train: usize,
    #[serde(rename = "Val")]
    pub val: usize,
    #[serde(rename = "Test")]
    pub test: usize,
}

pub struct Finalize<'a> {
    config: &'a Config,
}

impl<'a> Finalize<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    fn load(&self) -> Result<(Vec<String>, Vec<Vec<ParallelPair>>), Error> {
        let mut codes = Vec::new();
        let mut pairs = Vec::new();
        for (code, lang) in &self.config.languages {
            let path = self.config.directory.parallel_file(code);
            if !path.exists() {
                warn!("[{}] no parallel data, skipping", code);
                continue;
            }
            let lang_pairs: Vec<ParallelPair> = read_all(&path)?;
            info!(
                "[{}] Created {} parallel sentence pairs of {} target pairs",
                code,
                lang_pairs.len(),
                lang.target_sentences
            );
            codes.push(code.clone());
            pairs.push(lang_pairs);
        }
        Ok((codes, pairs))
    }
}

impl<'a> Pipeline<Vec<FinalizeSummary>> for Finalize<'a> {
    fn name() -> &'static str {
        "finalize"
    }

    fn run(&self) -> Result<Vec<FinalizeSummary>, Error> {
        let (codes, mut pairs) = self.load()?;
        if self.config.data_processing.equal_length {
            equalize(&mut pairs);
            info!(
                "truncated languages to {} pairs",
                pairs.first().map_or(0, Vec::len)
            );
        }

        let ratios = &self.config.data_processing.train_val_test_split;
        let mut summaries = Vec::with_capacity(codes.len());
        for (code, lang_pairs) in codes.into_iter().zip(pairs) {
            let total = lang_pairs.len();
            let splits = split(lang_pairs, ratios, self.config.project.seed)?;
            let (train, val, test) = (splits.train.len(), splits.val.len(), splits.test.len());

            for (name, records) in splits.into_named() {
                let dst = self.config.directory.split_file(&code, name);
                let mut writer = JsonlWriter::create(&dst)?;
                writer.write(records)?;
                writer.flush()?;
            }
            info!("[{}] split in {}/{}/{}", code, train, val, test);

            summaries.push(FinalizeSummary {
                language: self.config.language_name(&code).to_string(),
                code,
                pairs: total,
                train,
                val,
                test,
            });
        }
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::pipelines::testing;

    fn write_pairs(config: &Config, code: &str, n: usize) {
        std::fs::create_dir_all(&config.directory.parallel_data).unwrap();
        let mut w = JsonlWriter::create(&config.directory.parallel_file(code)).unwrap();
        let pairs: Vec<ParallelPair> = (0..n)
            .map(|i| ParallelPair {
                target_text: format!("{code} {i}"),
                target_lang: code.to_string(),
                source_text: format!("en {i}"),
                source_lang: "en".to_string(),
                doc_id: "0".to_string(),
                sent_id: i,
            })
            .collect();
        w.write(pairs).unwrap();
        w.flush().unwrap();
    }

    #[test]
    fn run() {
        let dir = tempdir().unwrap();
        let config = testing::config(dir.path());
        write_pairs(&config, "fr", 100);
        write_pairs(&config, "sw", 30);

        let summaries = Finalize::new(&config).run().unwrap();
        assert_eq!(
            summaries[0],
            FinalizeSummary {
                language: "French".to_string(),
                code: "fr".to_string(),
                pairs: 100,
                train: 80,
                val: 10,
                test: 10,
            }
        );
        assert_eq!(summaries[1].pairs, 30);

        let test: Vec<ParallelPair> = read_all(&config.directory.split_file("fr", "test")).unwrap();
        let train: Vec<ParallelPair> =
            read_all(&config.directory.split_file("fr", "train")).unwrap();
        assert_eq!(test.len(), 10);
        assert!(test.iter().all(|p| !train.contains(p)));
    }

    #[test]
    fn equal_length() {
        let dir = tempdir().unwrap();
        let mut config = testing::config(dir.path());
        config.data_processing.equal_length = true;
        write_pairs(&config, "fr", 100);
        write_pairs(&config, "sw", 30);

        let summaries = Finalize::new(&config).run().unwrap();
        assert!(summaries.iter().all(|s| s.pairs == 30));
        assert_eq!(summaries[0].train + summaries[0].val + summaries[0].test, 30);
    }
}
