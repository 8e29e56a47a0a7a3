//! PDF download stage.
//!
//! Reads each language's metadata file and fetches every `pdf_url` into
//! `PDFS_DIR/<code>/`. Failed downloads are logged and skipped.
use log::{debug, info, warn};
use serde::Serialize;

use crate::config::Config;
use crate::error::Error;
use crate::sources::pdf::PdfFetcher;
use crate::types::Article;

use super::pipeline::rate;
use super::Pipeline;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DownloadSummary {
    #[serde(rename = "Language")]
    pub language: String,
    #[serde(rename = "Attempted")]
    pub attempted: usize,
    #[serde(rename = "Downloaded")]
    pub downloaded: usize,
    #[serde(rename = "Success Rate")]
    pub success_rate: String,
}

pub struct Download<'a, F: PdfFetcher> {
    config: &'a Config,
    fetcher: F,
}

impl<'a, F: PdfFetcher> Download<'a, F> {
    pub fn new(config: &'a Config, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    fn download_lang(&self, code: &str) -> Result<Option<DownloadSummary>, Error> {
        let src = self.config.directory.metadata_file(code);
        if !src.exists() {
            warn!("[{}] no metadata file at {:?}, skipping", code, src);
            return Ok(None);
        }

        let dst = self.config.directory.lang_pdfs(code);
        std::fs::create_dir_all(&dst)?;

        let mut rdr = csv::Reader::from_path(&src)?;
        let mut attempted = 0;
        let mut downloaded = 0;
        for article in rdr.deserialize::<Article>() {
            let article = match article {
                Ok(a) => a,
                Err(e) => {
                    warn!("[{}] invalid metadata record: {}", code, e);
                    continue;
                }
            };

            attempted += 1;
            match self.fetcher.download(&article.pdf_url, &dst) {
                Ok(path) => {
                    debug!("[{}] {} -> {:?}", code, article.pdf_url, path);
                    downloaded += 1;
                }
                Err(e) => warn!("[{}] could not download {}: {}", code, article.pdf_url, e),
            }
        }

        info!("[{}] downloaded {}/{} pdfs", code, downloaded, attempted);
        Ok(Some(DownloadSummary {
            language: self.config.language_name(code).to_string(),
            attempted,
            downloaded,
            success_rate: rate(downloaded, attempted),
        }))
    }
}

impl<'a, F: PdfFetcher> Pipeline<Vec<DownloadSummary>> for Download<'a, F> {
    fn name() -> &'static str {
        "download"
    }

    fn run(&self) -> Result<Vec<DownloadSummary>, Error> {
        let mut summaries = Vec::new();
        for code in self.config.languages.keys() {
            if let Some(summary) = self.download_lang(code)? {
                summaries.push(summary);
            }
        }
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::pipelines::testing;
    use crate::sources::pdf::file_name_for;

    /// Serves a PDF for urls ending in `.pdf`, html otherwise.
    struct Fake;

    impl PdfFetcher for Fake {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, Error> {
            if url.ends_with(".pdf") {
                Ok(b"%PDF-1.5 fake".to_vec())
            } else {
                Ok(b"<html>paywall</html>".to_vec())
            }
        }
    }

    #[test]
    fn run() {
        let dir = tempdir().unwrap();
        let config = testing::config(dir.path());
        std::fs::create_dir_all(&config.directory.metadata).unwrap();

        let mut w = csv::Writer::from_path(config.directory.metadata_file("fr")).unwrap();
        for url in [
            "https://example.org/1.pdf",
            "https://example.org/landing",
            "https://example.org/2.pdf",
        ] {
            w.serialize(Article {
                pdf_url: url.to_string(),
                ..Default::default()
            })
            .unwrap();
        }
        w.flush().unwrap();

        // no metadata for sw
        let summaries = Download::new(&config, Fake).run().unwrap();
        assert_eq!(
            summaries,
            vec![DownloadSummary {
                language: "French".to_string(),
                attempted: 3,
                downloaded: 2,
                success_rate: "66.7%".to_string(),
            }]
        );

        let pdfs = config.directory.lang_pdfs("fr");
        assert!(pdfs.join(file_name_for("https://example.org/1.pdf")).exists());
        assert!(!pdfs
            .join(file_name_for("https://example.org/landing"))
            .exists());
    }
}
