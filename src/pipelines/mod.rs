//! Pipelines.
//!
//! Each corpus-building stage is implemented here, and the module
//! provides a light [pipeline::Pipeline] trait that every stage implements.
//!
//! Stages communicate through files only (see [crate::config::Directories]),
//! so that each one can be run on its own from the command line.
pub mod backtranslate;
pub mod convert;
pub mod dedup;
pub mod download;
pub mod extract;
pub mod finalize;
pub mod metadata;
#[allow(clippy::module_inception)]
pub mod pipeline;
pub mod setup;
pub mod statistics;

pub use backtranslate::BackTranslate;
pub use convert::Convert;
pub use dedup::Dedup;
pub use download::Download;
pub use extract::Extract;
pub use finalize::Finalize;
pub use metadata::Metadata;
pub use pipeline::Pipeline;
pub use setup::Setup;
pub use statistics::Statistics;
