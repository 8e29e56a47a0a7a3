//! # parcorpus
//!
//! Corpus generation pipeline for low-resource languages.
//!
//! ```sh
//! parcorpus 0.1.0
//! parallel corpus generation from open scholarly articles.
//!
//! USAGE:
//!     parcorpus [OPTIONS] <SUBCOMMAND>
//!
//! OPTIONS:
//!     -c, --config <config>    path to the YAML configuration file [default: config.yaml]
//!
//! SUBCOMMANDS:
//!     all              Run setup, metadata, download, convert and extract
//!     backtranslate    Back-translate sentences into English through the batch API
//!     convert          Convert PDFs to text, keeping documents in the expected language
//!     dedup            Remove duplicate sentences
//!     download         Download article PDFs
//!     extract          Extract and verify sentences
//!     finalize         Split parallel data into train/val/test
//!     metadata         Collect article metadata from OpenAlex
//!     setup            Create the directory structure
//!     stats            Report sentence statistics
//! ```
//!
//! The batch API key is read from `OPENAI_APIKEY`, which can be set in a `.env` file.
use std::time::Duration;

use structopt::StructOpt;

#[macro_use]
extern crate log;

mod cli;

use cli::Command;
use parcorpus::config::Config;
use parcorpus::error::Error;
use parcorpus::identifiers::{FastText, FastTextBuilder};
use parcorpus::io::summary::{report, write_csv};
use parcorpus::pipelines::convert::PdfExtract;
use parcorpus::pipelines::{
    BackTranslate, Convert, Dedup, Download, Extract, Finalize, Metadata, Pipeline, Setup,
    Statistics,
};
use parcorpus::sources::batch::BatchClient;
use parcorpus::sources::openalex::OpenAlex;
use parcorpus::sources::pdf::Downloader;

const API_KEY_VAR: &str = "OPENAI_APIKEY";
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

fn identifier(config: &Config) -> Result<FastText, Error> {
    FastTextBuilder::default()
        .path(&config.language_identification.model_path)
        .threshold(config.language_identification.threshold)
        .build()
}

fn setup(config: &Config) -> Result<(), Error> {
    Setup::new(config).run()?;
    Ok(())
}

fn metadata(config: &Config) -> Result<(), Error> {
    let rows = Metadata::new(config, OpenAlex::new(&config.openalex)?).run()?;
    report(
        "Metadata Collection Summary",
        &rows,
        &config.directory.summary_file(Metadata::<OpenAlex>::name()),
    )
}

fn download(config: &Config) -> Result<(), Error> {
    let rows = Download::new(config, Downloader::new(DOWNLOAD_TIMEOUT)?).run()?;
    report(
        "PDF Download Summary",
        &rows,
        &config.directory.summary_file(Download::<Downloader>::name()),
    )
}

fn convert(config: &Config) -> Result<(), Error> {
    let rows = Convert::new(config, identifier(config)?, PdfExtract).run()?;
    report(
        "PDF Conversion Summary",
        &rows,
        &config
            .directory
            .summary_file(Convert::<FastText, PdfExtract>::name()),
    )
}

fn extract(config: &Config) -> Result<(), Error> {
    let rows = Extract::new(config, identifier(config)?).run()?;
    report(
        "Sentence Extraction Summary",
        &rows,
        &config.directory.summary_file(Extract::<FastText>::name()),
    )
}

fn dedup(config: &Config) -> Result<(), Error> {
    let rows = Dedup::new(config).run()?;
    report(
        "Deduplication Summary",
        &rows,
        &config.directory.summary_file(Dedup::name()),
    )
}

fn backtranslate(config: &Config, resume: bool) -> Result<(), Error> {
    let api_key = std::env::var(API_KEY_VAR).map_err(|_| Error::MissingEnv(API_KEY_VAR))?;
    let client = BatchClient::new(&config.batch_api.base_url, api_key)?;
    let rows = BackTranslate::new(config, client, resume).run()?;
    report(
        "Back-translation Summary",
        &rows,
        &config
            .directory
            .summary_file(BackTranslate::<BatchClient>::name()),
    )
}

fn finalize(config: &Config) -> Result<(), Error> {
    let rows = Finalize::new(config).run()?;
    report(
        "Parallel Corpus Split",
        &rows,
        &config.directory.summary_file(Finalize::name()),
    )
}

fn stats(config: &Config) -> Result<(), Error> {
    match Statistics::new(config).run()? {
        Some(statistics) => {
            print!("{}", statistics.render()?);
            write_csv(
                &statistics.rows(),
                &config.directory.summary_file(Statistics::name()),
            )
        }
        None => {
            println!(
                "No sentence file found in {:?}",
                config.directory.sentences
            );
            Ok(())
        }
    }
}

fn main() -> Result<(), Error> {
    env_logger::init();
    if let Err(e) = dotenvy::dotenv() {
        debug!("no .env file loaded: {}", e);
    }

    let opt = cli::Parcorpus::from_args();
    debug!("cli args\n{:#?}", opt);

    let config = Config::from_path(&opt.config)?;

    run(&config, opt.command)
}

fn run(config: &Config, command: Command) -> Result<(), Error> {
    match command {
        Command::Setup => setup(config)?,
        Command::Metadata => metadata(config)?,
        Command::Download => download(config)?,
        Command::Convert => convert(config)?,
        Command::Extract => extract(config)?,
        Command::Dedup => dedup(config)?,
        Command::Backtranslate(b) => backtranslate(config, b.resume)?,
        Command::Finalize => finalize(config)?,
        Command::Stats => stats(config)?,
        Command::All => {
            for stage in Command::all_stages() {
                run(config, stage)?;
            }
        }
    };
    Ok(())
}
