// run the offline part of the pipeline on a tiny corpus:
// extracted documents -> sentences -> dedup -> back-translation (fake batch api) -> splits -> statistics

use std::cell::RefCell;
use std::path::Path;

use oxilangtag::LanguageTag;
use tempfile::tempdir;

use parcorpus::config::Config;
use parcorpus::error::Error;
use parcorpus::identifiers::{Identification, Identifier};
use parcorpus::io::read_all;
use parcorpus::pipelines::{
    BackTranslate, Dedup, Extract, Finalize, Pipeline, Setup, Statistics,
};
use parcorpus::sources::batch::{Batch, BatchQuery, BatchService, BatchStatus};
use parcorpus::types::{ParallelPair, Sentence};

fn config(root: &Path) -> Config {
    let yaml = format!(
        r"
project:
  seed: 7
LANGUAGES:
  sw:
    name: Swahili
    max_articles: 5
    target_sentences: 50
directory:
  METADATA_DIR: {root}/metadata
  PDFS_DIR: {root}/pdfs
  EXTRACTED_DIR: {root}/extracted
  SENTENCES_DIR: {root}/sentences
  API_QUERIES_DIR: {root}/api_queries
  PARALLEL_DATA_DIR: {root}/parallel
  RESULTS_DIR: {root}/results
data_processing:
  back_translation:
    model: test-model
    system_prompt: You are a professional translator.
    max_tokens: 64
  train_val_test_split:
    val_ratio: 0.1
    test_ratio: 0.1
batch_api:
  poll_interval_secs: 0
",
        root = root.display()
    );
    serde_yaml::from_str(&yaml).unwrap()
}

/// Every sentence without the letter `q` is Swahili.
struct NoQ;

impl Identifier for NoQ {
    fn identify(&self, text: &str) -> Result<Option<Identification>, Error> {
        let lang = if text.contains('q') { "en" } else { "sw" };
        Ok(Some(Identification::new(
            LanguageTag::parse(lang.to_string())?,
            0.9,
        )))
    }
}

/// Batch api translating by prefixing `EN:`, completed on first poll.
#[derive(Default)]
struct Translator {
    files: RefCell<Vec<String>>,
}

impl BatchService for Translator {
    fn upload_file(&self, path: &Path) -> Result<String, Error> {
        self.files.borrow_mut().push(std::fs::read_to_string(path)?);
        Ok("0".to_string())
    }

    fn create_batch(&self, input_file_id: &str, _description: &str) -> Result<Batch, Error> {
        self.retrieve_batch(input_file_id).map(|b| Batch {
            status: BatchStatus::InProgress,
            ..b
        })
    }

    fn retrieve_batch(&self, id: &str) -> Result<Batch, Error> {
        Ok(Batch {
            id: id.to_string(),
            status: BatchStatus::Completed,
            request_counts: None,
            output_file_id: Some(id.to_string()),
            error_file_id: None,
        })
    }

    fn file_content(&self, id: &str) -> Result<String, Error> {
        let idx: usize = id.parse().unwrap();
        let outputs: Vec<String> = self.files.borrow()[idx]
            .lines()
            .map(|line| {
                let q: BatchQuery = serde_json::from_str(line).unwrap();
                let sentence = q.body.messages[1].content.lines().last().unwrap();
                serde_json::json!({
                    "custom_id": q.custom_id,
                    "response": {
                        "status_code": 200,
                        "body": {"choices": [{"message": {"role": "assistant", "content": format!("EN: {sentence}")}}]}
                    }
                })
                .to_string()
            })
            .collect();
        Ok(outputs.join("\n"))
    }
}

const DOCUMENT: &str = "# Utangulizi

Watoto wanacheza mpira uwanjani kila jioni.
Mvua kubwa ilinyesha jana usiku katika mji wetu.
This quick sentence is not Swahili at all.

Walimu wanafundisha hisabati na sayansi shuleni.";

#[test_log::test]
fn offline_flow() {
    let dir = tempdir().unwrap();
    let config = config(dir.path());
    Setup::new(&config).run().unwrap();

    let extracted = config.directory.lang_extracted("sw");
    std::fs::create_dir_all(&extracted).unwrap();
    for doc in 0..10 {
        std::fs::write(extracted.join(format!("{doc}.md")), DOCUMENT).unwrap();
    }
    // a unique sentence per document, so that dedup keeps something from each
    for doc in 0..10 {
        let unique = format!("\n\nKitabu namba {doc} kimechapishwa mwaka huu.");
        let path = extracted.join(format!("{doc}.md"));
        let mut content = std::fs::read_to_string(&path).unwrap();
        content.push_str(&unique);
        std::fs::write(path, content).unwrap();
    }

    let extract = Extract::new(&config, NoQ).run().unwrap();
    assert_eq!(extract[0].documents, 10);
    // 5 sentences per document, the english one is filtered out
    assert_eq!(extract[0].sentences, 50);

    let dedup = Dedup::new(&config).run().unwrap();
    assert_eq!(dedup[0].before, 50);
    assert_eq!(dedup[0].after, 4 + 10);

    let sentences: Vec<Sentence> = read_all(&config.directory.sentences_file("sw")).unwrap();
    assert!(sentences.iter().all(|s| !s.text.contains('q')));

    let bt = BackTranslate::new(&config, Translator::default(), false)
        .run()
        .unwrap();
    assert_eq!(bt[0].pairs, 14);

    let pairs: Vec<ParallelPair> = read_all(&config.directory.parallel_file("sw")).unwrap();
    for (pair, sentence) in pairs.iter().zip(&sentences) {
        assert_eq!(pair.target_text, sentence.text);
        assert_eq!(pair.source_text, format!("EN: {}", sentence.text));
    }

    let splits = Finalize::new(&config).run().unwrap();
    // holdout = ceil(14 * 0.2) = 3, test = ceil(3 * 0.5) = 2
    assert_eq!((splits[0].train, splits[0].val, splits[0].test), (11, 1, 2));

    let report = Statistics::new(&config).run().unwrap().unwrap();
    let rows = report.rows();
    assert_eq!(rows[0].sentences, 14);
    assert_eq!(rows[0].documents, 10);
    assert_eq!(rows[0].duplicates, 0);
}
