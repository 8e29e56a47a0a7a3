/*! Language identification models

Holds an [Identifier] trait for implementing other ones.

The current identifier used is [fasttext](https://fasttext.cc) !*/
pub(crate) mod identification;
mod identifier;
pub(crate) mod model;

pub use identification::Identification;
pub use identifier::Identifier;
pub use model::{FastText, FastTextBuilder};
