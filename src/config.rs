use std::path::PathBuf;
use crate::cli::commands::Cli;

/// Settings for one run, fixed once the command line is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub music_dir: PathBuf,
    pub dry_run: bool,
    pub tagger: String,
    pub db_path: PathBuf,
    pub report_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            music_dir: PathBuf::from("F01"),
            dry_run: false,
            tagger: "mp4tags".to_string(),
            db_path: PathBuf::from("MediaLibrary-bkp.sqlitedb"),
            report_path: None,
        }
    }
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        Self {
            music_dir: cli.music_dir,
            dry_run: cli.dry_run,
            tagger: cli.tagger,
            db_path: cli.db_path,
            report_path: cli.report,
        }
    }
}
