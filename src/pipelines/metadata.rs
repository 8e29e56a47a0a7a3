//! Article metadata collection.
use log::{info, warn};
use serde::Serialize;

use crate::config::Config;
use crate::error::Error;
use crate::sources::openalex::{harvest, PageSource};
use crate::types::Article;

use super::Pipeline;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MetadataSummary {
    #[serde(rename = "Language")]
    pub language: String,
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Articles")]
    pub articles: usize,
    #[serde(rename = "With Abstracts")]
    pub with_abstracts: usize,
}

pub struct Metadata<'a, S: PageSource> {
    config: &'a Config,
    source: S,
}

impl<'a, S: PageSource> Metadata<'a, S> {
    pub fn new(config: &'a Config, source: S) -> Self {
        Self { config, source }
    }

    fn write_articles(&self, code: &str, articles: &[Article]) -> Result<(), Error> {
        let dst = self.config.directory.metadata_file(code);
        std::fs::create_dir_all(&self.config.directory.metadata)?;

        let mut w = csv::Writer::from_path(&dst)?;
        for article in articles {
            w.serialize(article)?;
        }
        w.flush()?;
        info!("[{}] {} articles written to {:?}", code, articles.len(), dst);
        Ok(())
    }
}

impl<'a, S: PageSource> Pipeline<Vec<MetadataSummary>> for Metadata<'a, S> {
    fn name() -> &'static str {
        "metadata"
    }

    fn run(&self) -> Result<Vec<MetadataSummary>, Error> {
        let mut summaries = Vec::with_capacity(self.config.languages.len());

        for (code, lang) in &self.config.languages {
            info!("[{}] collecting {} articles", code, lang.name);
            let articles = harvest(&self.source, code, lang.max_articles);
            if articles.is_empty() {
                warn!("[{}] no article with a pdf url found", code);
            }
            self.write_articles(code, &articles)?;

            summaries.push(MetadataSummary {
                language: lang.name.clone(),
                code: code.clone(),
                articles: articles.len(),
                with_abstracts: articles
                    .iter()
                    .filter(|a| !a.abstract_text.is_empty())
                    .count(),
            });
        }

        Ok(summaries)
    }
}
