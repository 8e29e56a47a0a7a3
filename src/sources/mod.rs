//! Remote data sources: article metadata, PDFs and the translation batch API.
use reqwest::Url;

use crate::error::Error;

pub mod batch;
pub mod openalex;
pub mod pdf;

/// Parse a configured API root so that relative endpoints are joined below it.
///
/// `https://host/openai` and `https://host/openai/` both give `https://host/openai/`.
pub(crate) fn base_url(url: &str) -> Result<Url, Error> {
    let mut url = Url::parse(url)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
