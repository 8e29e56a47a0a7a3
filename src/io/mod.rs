/*!
# IO utilities

Record saving and loading (JSON Lines), directory listing and summary reporting.
!*/
mod files;
pub mod reader;
pub mod summary;
pub mod writer;

pub use files::{list_files, stem_before_dot};
pub use reader::{read_all, JsonlReader};
pub use writer::{JsonlWriter, WriterTrait};
