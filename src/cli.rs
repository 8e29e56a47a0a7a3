//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "parcorpus",
    about = "parallel corpus generation from open scholarly articles."
)]
pub struct Parcorpus {
    #[structopt(
        parse(from_os_str),
        short = "c",
        long = "config",
        default_value = "config.yaml",
        help = "path to the YAML configuration file"
    )]
    pub config: PathBuf,
    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(Debug, StructOpt)]
/// Holds every stage that is callable by the `parcorpus` command.
pub enum Command {
    #[structopt(about = "Create the directory structure")]
    Setup,
    #[structopt(about = "Collect article metadata from OpenAlex")]
    Metadata,
    #[structopt(about = "Download article PDFs")]
    Download,
    #[structopt(about = "Convert PDFs to text, keeping documents in the expected language")]
    Convert,
    #[structopt(about = "Extract and verify sentences")]
    Extract,
    #[structopt(about = "Remove duplicate sentences")]
    Dedup,
    #[structopt(about = "Back-translate sentences into English through the batch API")]
    Backtranslate(Backtranslate),
    #[structopt(about = "Split parallel data into train/val/test")]
    Finalize,
    #[structopt(about = "Report sentence statistics")]
    Stats,
    #[structopt(about = "Run setup, metadata, download, convert and extract")]
    All,
}

#[derive(Debug, StructOpt)]
/// Back-translation parameters.
///
/// ```sh
/// USAGE:
///     parcorpus backtranslate [FLAGS]
///
/// FLAGS:
///     -r, --resume    follow previously submitted batches instead of submitting new ones
/// ```
pub struct Backtranslate {
    #[structopt(
        short = "r",
        long = "resume",
        help = "follow previously submitted batches instead of submitting new ones"
    )]
    pub resume: bool,
}

impl Command {
    /// Stages run in order by [Command::All].
    ///
    /// Dedup, back-translation, finalization and statistics have to be called explicitly.
    pub fn all_stages() -> [Command; 5] {
        [
            Command::Setup,
            Command::Metadata,
            Command::Download,
            Command::Convert,
            Command::Extract,
        ]
    }
}

#[cfg(test)]
mod tests {
    use structopt::StructOpt;

    use super::{Command, Parcorpus};

    #[test]
    fn all_stops_after_extract() {
        let stages = Command::all_stages();
        assert!(matches!(stages[0], Command::Setup));
        assert!(matches!(stages[4], Command::Extract));
        assert!(!stages.iter().any(|s| matches!(
            s,
            Command::Dedup
                | Command::Backtranslate(_)
                | Command::Finalize
                | Command::Stats
                | Command::All
        )));
    }

    #[test]
    fn parse_resume() {
        let opt = Parcorpus::from_iter(["parcorpus", "-c", "c.yaml", "backtranslate", "-r"]);
        assert_eq!(opt.config.to_str(), Some("c.yaml"));
        assert!(matches!(&opt.command, Command::Backtranslate(b) if b.resume));
    }
}
