use std::path::Path;
use csv::Writer;
use serde::Serialize;
use crate::reconcile::report::{FileReport, ReconcileReport};
use crate::Result;

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    #[serde(rename = "File")]
    file: &'a str,
    #[serde(rename = "Format")]
    format: String,
    #[serde(rename = "Status")]
    status: &'static str,
    #[serde(rename = "Detail")]
    detail: String,
}

impl<'a> From<&'a FileReport> for ReportRow<'a> {
    fn from(file: &'a FileReport) -> Self {
        Self {
            file: &file.file_name,
            format: file.format.map(|f| f.to_string()).unwrap_or_default(),
            status: file.status.label(),
            detail: file.status.detail(),
        }
    }
}

pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    pub fn generate_run_report(&self, report: &ReconcileReport, output_path: impl AsRef<Path>) -> Result<()> {
        let output_path_ref = output_path.as_ref();
        let mut writer = Writer::from_path(output_path_ref)?;

        for file in &report.files {
            writer.serialize(ReportRow::from(file))?;
        }

        writer.flush()?;
        log::info!("Report generated: {}", output_path_ref.display());
        Ok(())
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ContainerFormat, FileStatus};
    use pretty_assertions::assert_eq;

    #[test]
    fn writes_one_row_per_file() {
        let mut report = ReconcileReport::default();
        report.push("readme.txt", None, FileStatus::SkippedNotAudio);
        report.push(
            "song1.m4a",
            Some(ContainerFormat::Mp4),
            FileStatus::SkippedAlreadyTagged { title: "Track One".into() },
        );
        report.push(
            "song2.mp3",
            Some(ContainerFormat::Mp3),
            FileStatus::FailedLookup { reason: "no matching track in library, sorry".into() },
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        Reporter::new().generate_run_report(&report, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "File,Format,Status,Detail\n\
             readme.txt,,skipped-not-audio,\n\
             song1.m4a,MP4,skipped-already-tagged,Track One\n\
             song2.mp3,MP3,failed-lookup,\"no matching track in library, sorry\"\n"
        );
    }
}
