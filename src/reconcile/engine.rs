use std::fs::File;
use std::path::Path;
use log::{debug, info, warn};
use crate::tagging::writer::WriteOutcome;
use crate::utils::file_ops::list_entries;
use crate::{
    ContainerFormat, EmbeddedTagReader, FileStatus, MetadataStore, ReconcileReport, Result,
    RunConfig, TagWriters,
};

/// Brings untagged files in the configured directory up to date with the library.
///
/// Files are handled one at a time. A failure on one file is recorded in the
/// report and never stops the run; only listing the directory can fail here.
pub struct Reconciler<'a> {
    config: &'a RunConfig,
    reader: &'a dyn EmbeddedTagReader,
    store: &'a dyn MetadataStore,
    writers: &'a TagWriters,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        config: &'a RunConfig,
        reader: &'a dyn EmbeddedTagReader,
        store: &'a dyn MetadataStore,
        writers: &'a TagWriters,
    ) -> Self {
        Self {
            config,
            reader,
            store,
            writers,
        }
    }

    pub fn process_directory(&self) -> Result<ReconcileReport> {
        let dir = &self.config.music_dir;
        let entries = list_entries(dir)?;
        info!("Found {} entries in {}", entries.len(), dir.display());

        let mut report = ReconcileReport::default();
        for entry in entries {
            let file_name = entry.file_name().to_string_lossy().into_owned();
            info!("working on {}/{}", dir.display(), file_name);

            if entry.file_type().is_dir() {
                debug!("{} is a directory, not descending", file_name);
                continue;
            }

            let Some(format) = ContainerFormat::from_path(entry.path()) else {
                info!("skipping non-audio file {}", file_name);
                report.push(file_name, None, FileStatus::SkippedNotAudio);
                continue;
            };

            let status = self.process_file(entry.path(), &file_name, format);
            info!("{}: {}", file_name, status);
            report.push(file_name, Some(format), status);
        }

        info!("Done: {}", report.summary());
        Ok(report)
    }

    fn process_file(&self, path: &Path, file_name: &str, format: ContainerFormat) -> FileStatus {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                warn!("error loading {}, skipping it: {}", file_name, e);
                return FileStatus::FailedOpen { reason: e.to_string() };
            }
        };

        // The handle moves into the reader and is closed when it returns.
        // A read error proves nothing about the title, so it falls through
        // to the database lookup.
        match self.reader.read_tags(file, format) {
            Ok(tags) if tags.has_title() => {
                let title = tags.title.unwrap_or_default();
                info!(
                    "skipping {}({}): {}/{}/{}",
                    file_name,
                    format,
                    tags.album.as_deref().unwrap_or_default(),
                    tags.artist.as_deref().unwrap_or_default(),
                    title
                );
                return FileStatus::SkippedAlreadyTagged { title };
            }
            Ok(_) => debug!("{} has no title tag", file_name),
            Err(e) => warn!("error reading tags in {}: {}", file_name, e),
        }

        let record = match self.store.lookup(file_name) {
            Ok(Some(record)) if !record.is_empty() => record,
            Ok(Some(_)) => {
                warn!("{}: matching track has no metadata", file_name);
                return FileStatus::FailedLookup {
                    reason: "matching track has no metadata".to_string(),
                };
            }
            Ok(None) => {
                warn!("{}: no matching track in library", file_name);
                return FileStatus::FailedLookup {
                    reason: "no matching track in library".to_string(),
                };
            }
            Err(e) => {
                warn!("{}: {}", file_name, e);
                return FileStatus::FailedLookup { reason: e.to_string() };
            }
        };

        info!("updating {}: {}", file_name, record.summary());

        if self.config.dry_run {
            return FileStatus::WouldUpdate { record };
        }

        match self.writers.for_format(format).write_tags(path, &record) {
            Ok(WriteOutcome::Written) => FileStatus::Updated,
            Ok(WriteOutcome::Untouched) => FileStatus::NoOpFormat,
            Err(e) => {
                warn!("Command finished with error on {}: {}", file_name, e);
                FileStatus::FailedWrite { reason: e.to_string() }
            }
        }
    }
}
