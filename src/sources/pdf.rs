//! PDF fetching.
//!
//! PDFs are requested with a browser user agent, since a fair share of publishers
//! refuse non-browser clients. A response is only accepted if it actually is a PDF.
use std::hash::Hasher;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use reqwest::Url;
use twox_hash::XxHash64;

use crate::error::Error;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const PDF_MAGIC: &[u8] = b"%PDF";

/// Deterministic file name for a PDF url: the hex xxhash64 of the url.
pub fn file_name_for(url: &str) -> String {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(url.as_bytes());
    format!("{:016x}.pdf", hasher.finish())
}

/// Checks the PDF magic number.
pub fn is_pdf(content: &[u8]) -> bool {
    content.starts_with(PDF_MAGIC)
}

/// Something able to fetch PDFs.
pub trait PdfFetcher {
    /// Fetch `url`, returning the PDF bytes.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, Error>;

    /// attempt to download `url` into `dst_dir`, returning the saved path.
    ///
    /// Nothing is requested if the file already exists.
    fn download(&self, url: &str, dst_dir: &Path) -> Result<PathBuf, Error> {
        let path = dst_dir.join(file_name_for(url));
        if path.exists() {
            debug!("{:?} already downloaded", path);
            return Ok(path);
        }

        let content = self.fetch(url)?;
        if !is_pdf(&content) {
            return Err(Error::Custom(format!("{url} did not return a PDF")));
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }
}

/// holds the http client that will make the requests.
pub struct Downloader {
    client: reqwest::blocking::Client,
}

impl Downloader {
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl PdfFetcher for Downloader {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, Error> {
        let url = Url::parse(url)?;
        debug!("downloading {}", &url);
        let mut response = self.client.get(url).send()?.error_for_status()?;

        let mut content = Vec::new();
        response.read_to_end(&mut content)?;
        Ok(content)
    }
}
