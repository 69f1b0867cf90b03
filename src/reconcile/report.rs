use std::collections::BTreeMap;
use std::fmt;
use crate::{ContainerFormat, TrackMetadata};

/// Decision taken for one directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    SkippedNotAudio,
    SkippedAlreadyTagged { title: String },
    FailedOpen { reason: String },
    FailedLookup { reason: String },
    /// Only reached for formats that are written by an external tool.
    FailedWrite { reason: String },
    Updated,
    WouldUpdate { record: TrackMetadata },
    NoOpFormat,
}

impl FileStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FileStatus::SkippedNotAudio => "skipped-not-audio",
            FileStatus::SkippedAlreadyTagged { .. } => "skipped-already-tagged",
            FileStatus::FailedOpen { .. } => "failed-open",
            FileStatus::FailedLookup { .. } => "failed-lookup",
            FileStatus::FailedWrite { .. } => "failed-write",
            FileStatus::Updated => "updated",
            FileStatus::WouldUpdate { .. } => "would-update",
            FileStatus::NoOpFormat => "no-op-format",
        }
    }

    pub fn detail(&self) -> String {
        match self {
            FileStatus::SkippedAlreadyTagged { title } => title.clone(),
            FileStatus::FailedOpen { reason }
            | FileStatus::FailedLookup { reason }
            | FileStatus::FailedWrite { reason } => reason.clone(),
            FileStatus::WouldUpdate { record } => record.summary(),
            _ => String::new(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            FileStatus::FailedOpen { .. } | FileStatus::FailedLookup { .. } | FileStatus::FailedWrite { .. }
        )
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub file_name: String,
    pub format: Option<ContainerFormat>,
    pub status: FileStatus,
}

/// Outcome of one run, in processing order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub files: Vec<FileReport>,
}

impl ReconcileReport {
    pub fn push(&mut self, file_name: impl Into<String>, format: Option<ContainerFormat>, status: FileStatus) {
        self.files.push(FileReport {
            file_name: file_name.into(),
            format,
            status,
        });
    }

    pub fn status_of(&self, file_name: &str) -> Option<&FileStatus> {
        self.files
            .iter()
            .find(|f| f.file_name == file_name)
            .map(|f| &f.status)
    }

    /// Number of files per status label.
    pub fn counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for file in &self.files {
            *counts.entry(file.status.label()).or_insert(0) += 1;
        }
        counts
    }

    pub fn failures(&self) -> usize {
        self.files.iter().filter(|f| f.status.is_failure()).count()
    }

    pub fn summary(&self) -> String {
        if self.files.is_empty() {
            return "no files processed".to_string();
        }
        self.counts()
            .iter()
            .map(|(label, count)| format!("{count} {label}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
