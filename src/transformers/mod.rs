/*! Text transformers.

Transforms extracted text by removing content or formatting.

!*/

mod markdown;
mod sentences;
mod transform;

pub use markdown::StripMarkdown;
pub use sentences::{split_sentences, CleanSentence};
pub use transform::Transform;
