/*!
# File based writing

Records are written as JSON Lines through [JsonlWriter], which implements [WriterTrait].
!*/
mod jsonl;
mod writertrait;

pub use jsonl::{JsonlWriter, Writer};
pub use writertrait::WriterTrait;
