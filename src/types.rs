//! Records exchanged between stages.
use serde::{Deserialize, Serialize};

/// Article metadata, as stored in `<code>_article_data.csv`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Article {
    pub title: Option<String>,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    pub pdf_url: String,
    pub doi: Option<String>,
    pub publication_date: Option<String>,
}

/// An extracted sentence, one per line in `<code>_sentences.jsonl`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sentence {
    pub text: String,
    pub lang: String,
    pub doc_id: String,
    /// index among the kept sentences of the document.
    pub sent_id: usize,
}

/// A back-translated sentence pair, one per line in `<code>-en_data.jsonl`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParallelPair {
    pub target_text: String,
    pub target_lang: String,
    pub source_text: String,
    pub source_lang: String,
    pub doc_id: String,
    pub sent_id: usize,
}

impl ParallelPair {
    /// Pair a target sentence with its english translation.
    pub fn from_translation(target: Sentence, translation: String) -> Self {
        Self {
            target_text: target.text,
            target_lang: target.lang,
            source_text: translation,
            source_lang: "en".to_string(),
            doc_id: target.doc_id,
            sent_id: target.sent_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentence_json_shape() {
        let s = Sentence {
            text: "Habari ya asubuhi, rafiki yangu.".to_string(),
            lang: "sw".to_string(),
            doc_id: "12".to_string(),
            sent_id: 3,
        };
        let v: serde_json::Value = serde_json::to_value(&s).unwrap();
        assert_eq!(v["doc_id"], "12");
        assert_eq!(v["sent_id"], 3);
    }

    #[test]
    fn article_abstract_field() {
        let data = "title,abstract,pdf_url,doi,publication_date
Un titre,Un résumé,https://example.org/a.pdf,,2021-01-01
";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let a: Article = rdr.deserialize().next().unwrap().unwrap();
        assert_eq!(a.abstract_text, "Un résumé");
        assert_eq!(a.doi, None);
        assert_eq!(a.publication_date.as_deref(), Some("2021-01-01"));
    }

    #[test]
    fn pair_from_translation() {
        let s = Sentence {
            text: "Bonjour à tous.".to_string(),
            lang: "fr".to_string(),
            doc_id: "0".to_string(),
            sent_id: 0,
        };
        let p = ParallelPair::from_translation(s, "Hello everyone.".to_string());
        assert_eq!(p.source_lang, "en");
        assert_eq!(p.target_lang, "fr");
        assert_eq!(p.source_text, "Hello everyone.");
    }
}
