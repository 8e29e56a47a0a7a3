/*! PDF to text conversion stage.

Every PDF of `PDFS_DIR/<code>` is converted to text and checked against the expected language.
Kept documents are numbered: the PDF is renamed `<n>.pdf` and its text written to `EXTRACTED_DIR/<code>/<n>.md`.
Documents in another language, and documents that could not be converted, are deleted.

Already converted documents (numeric stem with an existing `.md`) are left untouched,
so that the stage can be run again after new downloads.
!*/
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use serde::Serialize;

use crate::config::Config;
use crate::error::Error;
use crate::identifiers::Identifier;
use crate::io::{list_files, stem_before_dot};

use super::pipeline::rate;
use super::Pipeline;

/// Text extraction from a document.
pub trait TextExtractor {
    fn extract(&self, path: &Path) -> Result<String, Error>;
}

/// [pdf_extract] backed extractor.
pub struct PdfExtract;

impl TextExtractor for PdfExtract {
    fn extract(&self, path: &Path) -> Result<String, Error> {
        Ok(pdf_extract::extract_text(path)?)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConvertSummary {
    #[serde(rename = "Language")]
    pub language: String,
    #[serde(rename = "Total PDFs")]
    pub total: usize,
    #[serde(rename = "Kept")]
    pub kept: usize,
    #[serde(rename = "Wrong Language")]
    pub wrong_language: usize,
    #[serde(rename = "Errors")]
    pub errors: usize,
    #[serde(rename = "Success Rate")]
    pub success_rate: String,
}

enum Outcome {
    Kept,
    WrongLanguage(Option<String>),
}

pub struct Convert<'a, I: Identifier, E: TextExtractor> {
    config: &'a Config,
    identifier: I,
    extractor: E,
}

impl<'a, I: Identifier, E: TextExtractor> Convert<'a, I, E> {
    pub fn new(config: &'a Config, identifier: I, extractor: E) -> Self {
        Self {
            config,
            identifier,
            extractor,
        }
    }

    /// Next free document number in `dir`.
    fn next_index(dir: &Path) -> Result<usize, Error> {
        Ok(list_files(dir, &["md"])?
            .iter()
            .filter_map(|p| stem_before_dot(p).parse::<usize>().ok())
            .max()
            .map_or(0, |n| n + 1))
    }

    /// Run the extractor, turning a panic into an error.
    ///
    /// [pdf_extract] panics on some malformed fonts and xref tables.
    fn extract_text(&self, pdf: &Path) -> Result<String, Error> {
        panic::catch_unwind(AssertUnwindSafe(|| self.extractor.extract(pdf))).unwrap_or_else(
            |payload| {
                let msg = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                Err(Error::Custom(format!("extraction panicked: {msg}")))
            },
        )
    }

    fn already_converted(pdf: &Path, dst: &Path) -> bool {
        let stem = stem_before_dot(pdf);
        stem.parse::<usize>().is_ok() && dst.join(format!("{stem}.md")).exists()
    }

    fn convert_one(
        &self,
        code: &str,
        pdf: &Path,
        dst: &Path,
        index: usize,
    ) -> Result<Outcome, Error> {
        let text = self.extract_text(pdf)?;
        let detected = self.identifier.detect_language(&text)?;

        if detected.as_deref() != Some(code) {
            return Ok(Outcome::WrongLanguage(detected));
        }

        let renamed: PathBuf = pdf.with_file_name(format!("{index}.pdf"));
        std::fs::write(dst.join(format!("{index}.md")), text)?;
        std::fs::rename(pdf, renamed)?;
        Ok(Outcome::Kept)
    }

    fn convert_lang(&self, code: &str) -> Result<Option<ConvertSummary>, Error> {
        let src = self.config.directory.lang_pdfs(code);
        if !src.is_dir() {
            warn!("[{}] no pdf directory at {:?}, skipping", code, src);
            return Ok(None);
        }
        let dst = self.config.directory.lang_extracted(code);
        std::fs::create_dir_all(&dst)?;

        let mut index = Self::next_index(&dst)?;
        let (mut total, mut kept, mut wrong_language, mut errors) = (0, 0, 0, 0);

        for pdf in list_files(&src, &["pdf"])? {
            if Self::already_converted(&pdf, &dst) {
                debug!("[{}] {:?} already converted", code, pdf);
                continue;
            }
            total += 1;

            match self.convert_one(code, &pdf, &dst, index) {
                Ok(Outcome::Kept) => {
                    kept += 1;
                    index += 1;
                }
                Ok(Outcome::WrongLanguage(detected)) => {
                    debug!("[{}] {:?} detected as {:?}, removing", code, pdf, detected);
                    wrong_language += 1;
                    std::fs::remove_file(&pdf)?;
                }
                Err(e) => {
                    error!("[{}] could not convert {:?}: {}", code, pdf, e);
                    errors += 1;
                    std::fs::remove_file(&pdf)?;
                }
            }
        }

        info!(
            "[{}] {} pdfs: {} kept, {} wrong language, {} errors",
            code, total, kept, wrong_language, errors
        );
        Ok(Some(ConvertSummary {
            language: self.config.language_name(code).to_string(),
            total,
            kept,
            wrong_language,
            errors,
            success_rate: rate(kept, total),
        }))
    }
}

impl<'a, I: Identifier, E: TextExtractor> Pipeline<Vec<ConvertSummary>> for Convert<'a, I, E> {
    fn name() -> &'static str {
        "convert"
    }

    fn run(&self) -> Result<Vec<ConvertSummary>, Error> {
        let mut summaries = Vec::new();
        for code in self.config.languages.keys() {
            if let Some(summary) = self.convert_lang(code)? {
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
    use crate::pipelines::testing::{self, Keywords};

    /// Panics on every file, like [pdf_extract] on a malformed font.
    struct Panicking;

    impl TextExtractor for Panicking {
        fn extract(&self, _: &Path) -> Result<String, Error> {
            panic!("unsupported font encoding")
        }
    }

    /// "Extracts" the file content as is, failing on files starting with `broken`.
    struct Plain;

    impl TextExtractor for Plain {
        fn extract(&self, path: &Path) -> Result<String, Error> {
            let text = std::fs::read_to_string(path)?;
            if text.starts_with("broken") {
                return Err(Error::Custom("unreadable pdf".to_string()));
            }
            Ok(text)
        }
    }

    #[test]
    fn run() {
        let dir = tempdir().unwrap();
        let config = testing::config(dir.path());
        let pdfs = config.directory.lang_pdfs("fr");
        std::fs::create_dir_all(&pdfs).unwrap();

        std::fs::write(pdfs.join("a.pdf"), "Le chat dort sur le canapé.").unwrap();
        std::fs::write(pdfs.join("b.pdf"), "The cat sleeps on the couch.").unwrap();
        std::fs::write(pdfs.join("c.pdf"), "broken").unwrap();
        std::fs::write(pdfs.join("d.pdf"), "Les enfants jouent dehors.").unwrap();

        let convert = Convert::new(&config, Keywords::default(), Plain);
        let summaries = convert.run().unwrap();
        assert_eq!(
            summaries,
            vec![ConvertSummary {
                language: "French".to_string(),
                total: 4,
                kept: 2,
                wrong_language: 1,
                errors: 1,
                success_rate: "50.0%".to_string(),
            }]
        );

        let extracted = config.directory.lang_extracted("fr");
        assert_eq!(
            std::fs::read_to_string(extracted.join("0.md")).unwrap(),
            "Le chat dort sur le canapé."
        );
        assert!(extracted.join("1.md").exists());
        assert!(pdfs.join("0.pdf").exists());
        assert!(pdfs.join("1.pdf").exists());
        assert!(!pdfs.join("b.pdf").exists());
        assert!(!pdfs.join("c.pdf").exists());

        // a second run only handles the new pdf
        std::fs::write(pdfs.join("e.pdf"), "Les oiseaux chantent.").unwrap();
        let summaries = convert.run().unwrap();
        assert_eq!(summaries[0].total, 1);
        assert_eq!(summaries[0].kept, 1);
        assert!(extracted.join("2.md").exists());
        assert!(pdfs.join("2.pdf").exists());
    }

    #[test]
    fn extractor_panic_is_an_error() {
        let dir = tempdir().unwrap();
        let config = testing::config(dir.path());
        let pdfs = config.directory.lang_pdfs("fr");
        std::fs::create_dir_all(&pdfs).unwrap();
        std::fs::write(pdfs.join("a.pdf"), "Le chat dort.").unwrap();

        let summaries = Convert::new(&config, Keywords::default(), Panicking)
            .run()
            .unwrap();
        assert_eq!(summaries[0].total, 1);
        assert_eq!(summaries[0].kept, 0);
        assert_eq!(summaries[0].errors, 1);
        assert!(!pdfs.join("a.pdf").exists());
        assert!(!config.directory.lang_extracted("fr").join("0.md").exists());
    }
}
