//! Error enum
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Custom(String),
    Serde(serde_json::Error),
    Yaml(serde_yaml::Error),
    Csv(csv::Error),
    Http(reqwest::Error),
    Url(url::ParseError),
    Glob(glob::GlobError),
    GlobPattern(glob::PatternError),
    Pdf(pdf_extract::OutputError),
    FastText(String),
    LanguageTag(oxilangtag::LanguageTagParseError),
    MissingFile(PathBuf),
    MissingEnv(&'static str),
    Batch(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io: {e}"),
            Error::Custom(s) => write!(f, "{s}"),
            Error::Serde(e) => write!(f, "json: {e}"),
            Error::Yaml(e) => write!(f, "yaml: {e}"),
            Error::Csv(e) => write!(f, "csv: {e}"),
            Error::Http(e) => write!(f, "http: {e}"),
            Error::Url(e) => write!(f, "url: {e}"),
            Error::Glob(e) => write!(f, "glob: {e}"),
            Error::GlobPattern(e) => write!(f, "glob pattern: {e}"),
            Error::Pdf(e) => write!(f, "pdf: {e:?}"),
            Error::FastText(s) => write!(f, "fasttext: {s}"),
            Error::LanguageTag(e) => write!(f, "language tag: {e}"),
            Error::MissingFile(p) => write!(f, "missing file: {p:?}"),
            Error::MissingEnv(v) => write!(f, "missing environment variable {v}"),
            Error::Batch(s) => write!(f, "batch api: {s}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Error {
        Error::Yaml(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Error {
        Error::Csv(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::Http(e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Error {
        Error::Url(e)
    }
}

impl From<glob::GlobError> for Error {
    fn from(e: glob::GlobError) -> Error {
        Error::Glob(e)
    }
}

impl From<glob::PatternError> for Error {
    fn from(e: glob::PatternError) -> Error {
        Error::GlobPattern(e)
    }
}

impl From<pdf_extract::OutputError> for Error {
    fn from(e: pdf_extract::OutputError) -> Error {
        Error::Pdf(e)
    }
}

impl From<oxilangtag::LanguageTagParseError> for Error {
    fn from(e: oxilangtag::LanguageTagParseError) -> Error {
        Error::LanguageTag(e)
    }
}
