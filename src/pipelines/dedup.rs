//! Sentence deduplication stage.
use log::warn;

use crate::config::Config;
use crate::error::Error;
use crate::processing::dedup::{dedup, DedupSummary};

use super::Pipeline;

pub struct Dedup<'a> {
    config: &'a Config,
}

impl<'a> Dedup<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }
}

impl<'a> Pipeline<Vec<DedupSummary>> for Dedup<'a> {
    fn name() -> &'static str {
        "dedup"
    }

    fn run(&self) -> Result<Vec<DedupSummary>, Error> {
        let files = self
            .config
            .languages
            .keys()
            .filter_map(|code| {
                let path = self.config.directory.sentences_file(code);
                if path.exists() {
                    Some((code.clone(), path))
                } else {
                    warn!("[{}] no sentence file, skipping", code);
                    None
                }
            })
            .collect();

        Ok(dedup(files))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::io::{read_all, JsonlWriter, WriterTrait};
    use crate::pipelines::testing;
    use crate::types::Sentence;

    #[test]
    fn run() {
        let dir = tempdir().unwrap();
        let config = testing::config(dir.path());
        std::fs::create_dir_all(&config.directory.sentences).unwrap();

        let sentence = |text: &str, sent_id| Sentence {
            text: text.to_string(),
            lang: "sw".to_string(),
            doc_id: "0".to_string(),
            sent_id,
        };
        let path = config.directory.sentences_file("sw");
        let mut w = JsonlWriter::create(&path).unwrap();
        w.write(vec![
            sentence("Habari ya asubuhi rafiki.", 0),
            sentence("Habari ya asubuhi rafiki.", 1),
            sentence("Karibu sana nyumbani kwetu.", 2),
        ])
        .unwrap();
        w.flush().unwrap();

        let summaries = Dedup::new(&config).run().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].removed, 1);

        let kept: Vec<Sentence> = read_all(&path).unwrap();
        assert_eq!(kept[1].sent_id, 2);
    }
}
