use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use log::{debug, info};
use crate::{ContainerFormat, PruneError, Result, TrackMetadata};

/// Comment stamped into every file the reconciler tags.
pub const PROVENANCE_COMMENT: &str = "set by prune";

/// Runs an external program to completion.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<()>;
}

/// Spawns real subprocesses found on `PATH`.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<()> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| PruneError::Tagger {
                program: program.to_string(),
                message: format!("failed to start: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let stderr = if stderr.is_empty() {
                "(no stderr output)".to_string()
            } else {
                stderr
            };
            return Err(PruneError::Tagger {
                program: program.to_string(),
                message: format!("{}: {}", output.status, stderr),
            });
        }
        Ok(())
    }
}

/// What a writer did with a resolved record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The container is left alone.
    Untouched,
}

/// Applies a resolved record to one file in place.
pub trait TagWriter {
    fn write_tags(&self, path: &Path, record: &TrackMetadata) -> Result<WriteOutcome>;
}

/// Writes MP4 atoms through an `mp4tags`-compatible tool.
pub struct Mp4Tagger<R> {
    program: String,
    runner: R,
}

impl<R: CommandRunner> Mp4Tagger<R> {
    pub fn new(program: impl Into<String>, runner: R) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    /// One flag per field, absent fields passed as empty values so every
    /// flag keeps its argument. The path goes through as-is, even when it is
    /// not valid UTF-8.
    pub fn arguments(path: &Path, record: &TrackMetadata) -> Vec<OsString> {
        let field = |value: &Option<String>| value.clone().unwrap_or_default();
        let pairs = [
            ("-A", field(&record.album)),
            ("-a", field(&record.artist)),
            ("-c", PROVENANCE_COMMENT.to_string()),
            ("-d", field(&record.disc)),
            ("-D", field(&record.disc_count)),
            ("-g", field(&record.genre)),
            ("-L", field(&record.lyrics)),
            ("-G", field(&record.grouping)),
            ("-P", field(&record.artwork)),
            ("-R", field(&record.album_artist)),
            ("-s", field(&record.title)),
            ("-t", field(&record.track)),
            ("-T", field(&record.track_count)),
            ("-X", field(&record.rating)),
            ("-w", field(&record.composer)),
            ("-y", field(&record.year)),
        ];

        let mut args = Vec::with_capacity(pairs.len() * 2 + 1);
        for (flag, value) in pairs {
            args.push(OsString::from(flag));
            args.push(OsString::from(value));
        }
        args.push(path.as_os_str().to_os_string());
        args
    }
}

impl<R: CommandRunner> TagWriter for Mp4Tagger<R> {
    fn write_tags(&self, path: &Path, record: &TrackMetadata) -> Result<WriteOutcome> {
        let args = Self::arguments(path, record);
        debug!("{} {:?}", self.program, args);
        self.runner.run(&self.program, &args)?;
        info!("new tags applied on {}", path.display());
        Ok(WriteOutcome::Written)
    }
}

/// MP3 files already carry tags and artwork from the encoder.
pub struct NoopTagger;

impl TagWriter for NoopTagger {
    fn write_tags(&self, path: &Path, _record: &TrackMetadata) -> Result<WriteOutcome> {
        debug!("leaving {} untouched", path.display());
        Ok(WriteOutcome::Untouched)
    }
}

/// Picks the writer for a container format.
pub struct TagWriters {
    mp4: Box<dyn TagWriter>,
    mp3: Box<dyn TagWriter>,
}

impl TagWriters {
    pub fn new(mp4: Box<dyn TagWriter>, mp3: Box<dyn TagWriter>) -> Self {
        Self { mp4, mp3 }
    }

    /// External `program` for MP4, nothing for MP3.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self::new(
            Box::new(Mp4Tagger::new(program, SystemRunner)),
            Box::new(NoopTagger),
        )
    }

    pub fn for_format(&self, format: ContainerFormat) -> &dyn TagWriter {
        match format {
            ContainerFormat::Mp4 => self.mp4.as_ref(),
            ContainerFormat::Mp3 => self.mp3.as_ref(),
        }
    }
}
