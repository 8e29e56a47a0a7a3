//! # parcorpus
//!
//! Builds monolingual sentence corpora and English parallel corpora for a set of
//! languages, starting from open-access scholarly articles.
//!
//! Stages (see [pipelines]) communicate through files laid out by [config::Directories]:
//!
//! 1. [pipelines::Metadata]: article metadata from OpenAlex,
//! 2. [pipelines::Download]: article PDFs,
//! 3. [pipelines::Convert]: PDF to text, with document language verification,
//! 4. [pipelines::Extract]: sentence extraction, filtering and language verification,
//! 5. [pipelines::Dedup]: exact duplicate removal,
//! 6. [pipelines::BackTranslate]: English translations through an LLM batch API,
//! 7. [pipelines::Finalize]: train/val/test splits,
//! 8. [pipelines::Statistics]: corpus statistics.
pub mod config;
pub mod error;
pub mod filtering;
pub mod identifiers;
pub mod io;
pub mod pipelines;
pub mod processing;
pub mod sources;
pub mod transformers;
pub mod types;
