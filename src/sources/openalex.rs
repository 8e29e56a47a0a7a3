/*! OpenAlex works API.

Harvests article metadata for a given language, following cursor pagination.
Only works exposing a PDF url on their primary location are kept.
!*/
use std::collections::HashMap;
use std::time::Duration;

use log::{debug, error, info};
use rand::Rng;
use reqwest::Url;
use serde::Deserialize;

use crate::config::OpenAlex as OpenAlexConfig;
use crate::error::Error;
use crate::types::Article;

const SELECT: &str = "abstract_inverted_index,primary_location,title,doi,publication_date";

#[derive(Debug, Deserialize)]
pub struct WorksPage {
    pub meta: Meta,
    #[serde(default)]
    pub results: Vec<Work>,
}

#[derive(Debug, Deserialize)]
pub struct Meta {
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Work {
    pub title: Option<String>,
    pub abstract_inverted_index: Option<HashMap<String, Vec<usize>>>,
    pub primary_location: Option<Location>,
    pub doi: Option<String>,
    pub publication_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Location {
    pub pdf_url: Option<String>,
}

/// Rebuild an abstract from its inverted index (`word -> [positions]`).
pub fn reconstruct_abstract(inverted_index: Option<&HashMap<String, Vec<usize>>>) -> String {
    let index = match inverted_index {
        Some(index) if !index.is_empty() => index,
        _ => return String::new(),
    };

    let mut positions: Vec<(usize, &str)> = index
        .iter()
        .flat_map(|(word, idxs)| idxs.iter().map(move |idx| (*idx, word.as_str())))
        .collect();
    positions.sort_unstable();

    positions
        .into_iter()
        .map(|(_, word)| word)
        .collect::<Vec<_>>()
        .join(" ")
}

impl Work {
    /// Convert into an [Article], or [None] if the work has no PDF url.
    pub fn into_article(self) -> Option<Article> {
        let pdf_url = self
            .primary_location
            .and_then(|loc| loc.pdf_url)
            .filter(|url| !url.is_empty())?;

        Some(Article {
            abstract_text: reconstruct_abstract(self.abstract_inverted_index.as_ref()),
            title: self.title,
            pdf_url,
            doi: self.doi,
            publication_date: self.publication_date,
        })
    }
}

/// Something that serves pages of works.
pub trait PageSource {
    fn page(&self, code: &str, cursor: &str) -> Result<WorksPage, Error>;

    /// Called between two pages.
    fn pause(&self) {}
}

pub struct OpenAlex {
    client: reqwest::blocking::Client,
    works_url: Url,
    mailto: String,
    per_page: u32,
}

impl OpenAlex {
    pub fn new(config: &OpenAlexConfig) -> Result<Self, Error> {
        let works_url = super::base_url(&config.base_url)?.join("works")?;
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            client,
            works_url,
            mailto: config.mailto.clone(),
            per_page: config.per_page,
        })
    }

    fn page_url(&self, code: &str, cursor: &str) -> Url {
        let mut url = self.works_url.clone();
        url.query_pairs_mut()
            .append_pair("filter", &format!("language:{code},type:article"))
            .append_pair("select", SELECT)
            .append_pair("mailto", &self.mailto)
            .append_pair("per-page", &self.per_page.to_string())
            .append_pair("cursor", cursor);
        url
    }
}

impl PageSource for OpenAlex {
    fn page(&self, code: &str, cursor: &str) -> Result<WorksPage, Error> {
        let url = self.page_url(code, cursor);
        debug!("GET {}", url);
        let page = self
            .client
            .get(url)
            .send()?
            .error_for_status()?
            .json::<WorksPage>()?;
        Ok(page)
    }

    /// sleep between 2 and 4 seconds
    fn pause(&self) {
        let secs = rand::thread_rng().gen_range(2..=4);
        std::thread::sleep(Duration::from_secs(secs));
    }
}

/// Collect up to `max_articles` articles for `code`.
///
/// Stops early when there is no next cursor, or when a page can't be fetched.
pub fn harvest(source: &impl PageSource, code: &str, max_articles: usize) -> Vec<Article> {
    let mut articles = Vec::new();
    let mut cursor = "*".to_string();

    while articles.len() < max_articles {
        let page = match source.page(code, &cursor) {
            Ok(page) => page,
            Err(e) => {
                error!("[{}] error downloading article info: {}", code, e);
                break;
            }
        };

        let nb_results = page.results.len();
        let remaining = max_articles - articles.len();
        articles.extend(
            page.results
                .into_iter()
                .filter_map(Work::into_article)
                .take(remaining),
        );
        info!(
            "[{}] {}/{} articles ({} works in page)",
            code,
            articles.len(),
            max_articles,
            nb_results
        );

        match page.meta.next_cursor {
            Some(next) if nb_results > 0 => cursor = next,
            _ => break,
        }

        if articles.len() < max_articles {
            source.pause();
        }
    }

    articles
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn abstract_reconstruction() {
        let index: HashMap<String, Vec<usize>> = [
            ("la".to_string(), vec![0, 3]),
            ("souris".to_string(), vec![4]),
            ("chat".to_string(), vec![1]),
            ("mange".to_string(), vec![2]),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            reconstruct_abstract(Some(&index)),
            "la chat mange la souris"
        );
    }

    #[test]
    fn abstract_empty() {
        assert_eq!(reconstruct_abstract(None), "");
        assert_eq!(reconstruct_abstract(Some(&HashMap::new())), "");
    }

    #[test]
    fn page_parsing() {
        let data = r#"{
            "meta": {"count": 3, "next_cursor": "abc"},
            "results": [
                {"title": "A", "abstract_inverted_index": {"hello": [0], "world": [1]},
                 "primary_location": {"pdf_url": "https://example.org/a.pdf"},
                 "doi": "https://doi.org/10.1/a", "publication_date": "2020-01-01"},
                {"title": "B", "abstract_inverted_index": null,
                 "primary_location": {"pdf_url": null}, "doi": null, "publication_date": null},
                {"title": "C", "abstract_inverted_index": null,
                 "primary_location": null, "doi": null, "publication_date": null}
            ]
        }"#;
        let page: WorksPage = serde_json::from_str(data).unwrap();
        assert_eq!(page.meta.next_cursor.as_deref(), Some("abc"));
        let articles: Vec<Article> = page
            .results
            .into_iter()
            .filter_map(Work::into_article)
            .collect();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].abstract_text, "hello world");
        assert_eq!(articles[0].title.as_deref(), Some("A"));
    }

    #[test]
    fn page_url() {
        let oa = OpenAlex::new(&OpenAlexConfig::default()).unwrap();
        let url = oa.page_url("sw", "*");
        let pairs: HashMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(url.path(), "/works");
        assert_eq!(pairs["filter"], "language:sw,type:article");
        assert_eq!(pairs["cursor"], "*");
        assert_eq!(pairs["per-page"], "100");
    }

    #[test]
    fn works_below_base_path() {
        let config = OpenAlexConfig {
            base_url: "https://mirror.example.org/openalex".to_string(),
            ..OpenAlexConfig::default()
        };
        let oa = OpenAlex::new(&config).unwrap();
        assert_eq!(oa.page_url("fr", "*").path(), "/openalex/works");
    }

    /// Serves canned pages, records requested cursors.
    struct FakeSource {
        pages: RefCell<Vec<Result<WorksPage, Error>>>,
        cursors: RefCell<Vec<String>>,
    }

    impl FakeSource {
        fn new(pages: Vec<Result<WorksPage, Error>>) -> Self {
            Self {
                pages: RefCell::new(pages),
                cursors: RefCell::new(Vec::new()),
            }
        }
    }

    impl PageSource for FakeSource {
        fn page(&self, _code: &str, cursor: &str) -> Result<WorksPage, Error> {
            self.cursors.borrow_mut().push(cursor.to_string());
            let mut pages = self.pages.borrow_mut();
            if pages.is_empty() {
                return Err(Error::Custom("no more pages".to_string()));
            }
            pages.remove(0)
        }
    }

    fn page(nb_with_pdf: usize, next: Option<&str>) -> WorksPage {
        let results = (0..nb_with_pdf)
            .map(|i| Work {
                title: Some(format!("work {i}")),
                abstract_inverted_index: None,
                primary_location: Some(Location {
                    pdf_url: Some(format!("https://example.org/{i}.pdf")),
                }),
                doi: None,
                publication_date: None,
            })
            .collect();
        WorksPage {
            meta: Meta {
                next_cursor: next.map(String::from),
            },
            results,
        }
    }

    #[test]
    fn harvest_follows_cursor() {
        let source = FakeSource::new(vec![Ok(page(2, Some("c1"))), Ok(page(2, Some("c2")))]);
        let articles = harvest(&source, "fr", 3);
        assert_eq!(articles.len(), 3);
        assert_eq!(*source.cursors.borrow(), vec!["*", "c1"]);
    }

    #[test]
    fn harvest_stops_without_cursor() {
        let source = FakeSource::new(vec![Ok(page(2, None))]);
        let articles = harvest(&source, "fr", 10);
        assert_eq!(articles.len(), 2);
        assert_eq!(source.cursors.borrow().len(), 1);
    }

    #[test]
    fn harvest_unbounded_limit() {
        let source = FakeSource::new(vec![Ok(page(2, None))]);
        let articles = harvest(&source, "fr", usize::MAX);
        assert_eq!(articles.len(), 2);
    }

    #[test]
    fn harvest_stops_on_error() {
        let source = FakeSource::new(vec![
            Ok(page(1, Some("c1"))),
            Err(Error::Custom("boom".to_string())),
        ]);
        let articles = harvest(&source, "fr", 10);
        assert_eq!(articles.len(), 1);
    }
}
