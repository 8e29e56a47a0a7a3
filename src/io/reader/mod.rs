/*! Corpus reading utilities

Code is organized in the same manner as the [crate::io::writer] mod.
!*/
mod jsonl;

pub use jsonl::{read_all, JsonlReader, Reader};
