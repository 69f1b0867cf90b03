use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "prune")]
#[command(about = "Fill in missing audio tags from a media library database backup", long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Don't update the audio files, just display what's going to be done
    #[arg(long = "dryrun")]
    pub dry_run: bool,

    /// Show version and quit
    #[arg(long)]
    pub version: bool,

    /// Folder to scan for mp3 and m4a files
    #[arg(long = "musicDir", default_value = "F01")]
    pub music_dir: PathBuf,

    /// Program to use for writing m4a tags
    #[arg(long, default_value = "mp4tags")]
    pub tagger: String,

    /// Path to the sqlite DB file
    #[arg(long = "DBpath", default_value = "MediaLibrary-bkp.sqlitedb")]
    pub db_path: PathBuf,

    /// Write a CSV report of every file's outcome
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Version and build target, printed by `--version`.
pub fn version_lines() -> Vec<String> {
    vec![
        format!("Version: {}", env!("CARGO_PKG_VERSION")),
        format!("OS/Arch: {}/{}", std::env::consts::OS, std::env::consts::ARCH),
    ]
}
