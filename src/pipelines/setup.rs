//! Directory structure creation.
use std::path::PathBuf;

use log::info;

use crate::config::Config;
use crate::error::Error;

use super::Pipeline;

pub struct Setup<'a> {
    config: &'a Config,
}

impl<'a> Setup<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }
}

impl<'a> Pipeline<Vec<PathBuf>> for Setup<'a> {
    fn name() -> &'static str {
        "setup"
    }

    /// Create every configured directory, returning their paths.
    fn run(&self) -> Result<Vec<PathBuf>, Error> {
        let mut created = Vec::new();
        for dir in self.config.directory.all() {
            std::fs::create_dir_all(dir)?;
            created.push(dir.to_path_buf());
        }
        info!("directory structure created ({} directories)", created.len());
        Ok(created)
    }
}
