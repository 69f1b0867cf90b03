use std::path::PathBuf;

pub mod audio;
pub mod cli;
pub mod config;
pub mod library;
pub mod reconcile;
pub mod tagging;
pub mod utils;

/// Canonical per-track metadata resolved from the library database.
///
/// Every field is optional: the database may hold NULL for any column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
    pub rating: Option<String>,
    pub disc: Option<String>,
    pub disc_count: Option<String>,
    pub track: Option<String>,
    pub track_count: Option<String>,
    pub genre: Option<String>,
    pub grouping: Option<String>,
    pub year: Option<String>,
    pub lyrics: Option<String>,
    pub album_year: Option<String>,
    pub album_artist: Option<String>,
    pub location: Option<String>,
    pub artwork: Option<String>,
    pub composer: Option<String>,
}

impl TrackMetadata {
    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        [
            &self.artist,
            &self.album,
            &self.title,
            &self.rating,
            &self.disc,
            &self.disc_count,
            &self.track,
            &self.track_count,
            &self.genre,
            &self.grouping,
            &self.year,
            &self.lyrics,
            &self.album_year,
            &self.album_artist,
            &self.location,
            &self.artwork,
            &self.composer,
        ]
        .iter()
        .all(|field| field.is_none())
    }

    /// Short "album/artist/title" form used in progress logs.
    pub fn summary(&self) -> String {
        format!(
            "{}/{}/{}",
            self.album.as_deref().unwrap_or_default(),
            self.artist.as_deref().unwrap_or_default(),
            self.title.as_deref().unwrap_or_default()
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PruneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory listing error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Metadata extraction error: {0}")]
    Metadata(String),
    #[error("Tagger '{program}' failed: {message}")]
    Tagger { program: String, message: String },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PruneError>;

// Re-exports for convenience
pub use audio::format::ContainerFormat;
pub use audio::metadata::{EmbeddedTagReader, EmbeddedTags, SymphoniaTagReader};
pub use config::RunConfig;
pub use library::store::{MetadataStore, SqliteStore};
pub use reconcile::engine::Reconciler;
pub use reconcile::report::{FileReport, FileStatus, ReconcileReport};
pub use tagging::writer::{CommandRunner, Mp4Tagger, NoopTagger, SystemRunner, TagWriter, TagWriters};
