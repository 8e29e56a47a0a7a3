/*! FastText language identification model.
* !*/
use std::path::Path;

use fasttext::FastText as FastTextLib;
use log::{debug, error};

use crate::error::Error;

use super::{identification::Identification, identifier::Identifier};

/// FastText model.
///
/// Newlines and unicode null chars are replaced before prediction,
/// since fasttext predicts on a single line.
pub struct FastText {
    inner: FastTextLib,
    pub k: i32,
    pub threshold: f32,
}

impl FastText {
    fn prepare(text: &str) -> String {
        text.chars()
            .filter(|c| *c != char::from(0))
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect()
    }
}

impl Identifier for FastText {
    fn identify(&self, text: &str) -> Result<Option<Identification>, Error> {
        let line = Self::prepare(text);
        let pred = self
            .inner
            .predict(&line, self.k, self.threshold)
            .map_err(Error::FastText)?;

        // predictions are sorted by decreasing probability
        match pred.into_iter().next() {
            None => Ok(None),
            Some(pred) => match Identification::try_from(pred) {
                Ok(id) => Ok(Some(id)),
                Err(e) => {
                    error!("Couldn't find a proper label: {e:?}");
                    Err(e.into())
                }
            },
        }
    }
}

/// Fasttext builder.
pub struct FastTextBuilder<'a> {
    path: Option<&'a Path>,
    k: Option<i32>,
    threshold: Option<f32>,
}

impl<'a> FastTextBuilder<'a> {
    fn init_fasttextlib(path: &Path) -> Result<FastTextLib, Error> {
        if !path.exists() {
            return Err(Error::MissingFile(path.to_path_buf()));
        }
        let path = path
            .to_str()
            .ok_or_else(|| Error::Custom(format!("Couldn't parse path {path:?}")))?;
        debug!("loading fasttext model from {path}");
        let mut ft = FastTextLib::new();
        ft.load_model(path).map_err(Error::FastText)?;
        Ok(ft)
    }

    pub fn build(&self) -> Result<FastText, Error> {
        let path = self
            .path
            .ok_or_else(|| Error::Custom("No path provided".to_string()))?;
        let k = self
            .k
            .ok_or_else(|| Error::Custom("No k provided".to_string()))?;
        let threshold = self
            .threshold
            .ok_or_else(|| Error::Custom("No threshold provided".to_string()))?;

        Ok(FastText {
            inner: Self::init_fasttextlib(path)?,
            k,
            threshold,
        })
    }

    pub fn path<'b>(&'b mut self, path: &'a Path) -> &'b mut FastTextBuilder<'a> {
        self.path = Some(path);
        self
    }

    pub fn k<'b>(&'b mut self, k: i32) -> &'b mut FastTextBuilder<'a> {
        self.k = Some(k);
        self
    }

    pub fn threshold<'b>(&'b mut self, threshold: f32) -> &'b mut FastTextBuilder<'a> {
        self.threshold = Some(threshold);
        self
    }
}

impl<'a> Default for FastTextBuilder<'a> {
    fn default() -> Self {
        Self {
            path: Some(Path::new("lid.176.bin")),
            k: Some(1),
            threshold: Some(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{FastText, FastTextBuilder};
    use crate::error::Error;
    use crate::identifiers::Identifier;

    #[test]
    fn prepare() {
        let s = "une\nphrase\r\navec\0 des retours";
        assert_eq!(FastText::prepare(s), "une phrase  avec des retours");
    }

    #[test]
    fn missing_model() {
        let r = FastTextBuilder::default()
            .path(Path::new("no/such/model.bin"))
            .build();
        assert!(matches!(r, Err(Error::MissingFile(_))));
    }

    #[test]
    #[ignore]
    fn test_one_sentence() {
        let model: FastText = FastTextBuilder::default().build().unwrap();

        let sentence = "Ceci est une phrase en Français :)";
        let pred = model.detect_language(sentence).unwrap();

        assert_eq!(pred, Some("fr".to_string()));
    }
}
