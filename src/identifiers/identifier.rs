/*! Identifier trait

All identifiers should implement [Identifier] to be useable in pipelines.
!*/
use crate::error::Error;

use super::identification::Identification;

pub trait Identifier {
    /// Identify the language of `text`, returning [None] if no language is confident enough.
    fn identify(&self, text: &str) -> Result<Option<Identification>, Error>;

    /// Convenience function returning the detected primary language code.
    fn detect_language(&self, text: &str) -> Result<Option<String>, Error> {
        Ok(self.identify(text)?.map(|id| id.language()))
    }
}
