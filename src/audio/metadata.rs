use std::fs::File;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::{MetadataOptions, MetadataRevision, StandardTagKey};
use symphonia::core::probe::Hint;
use crate::{ContainerFormat, PruneError, Result};

/// Tags already embedded in an audio container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddedTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

impl EmbeddedTags {
    /// A file counts as tagged once it carries a non-empty title.
    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.is_empty())
    }

    fn absorb(&mut self, revision: &MetadataRevision) {
        for tag in revision.tags() {
            match tag.std_key {
                Some(StandardTagKey::TrackTitle) => self.title = Some(tag.value.to_string()),
                Some(StandardTagKey::Artist) => self.artist = Some(tag.value.to_string()),
                Some(StandardTagKey::Album) => self.album = Some(tag.value.to_string()),
                _ => {}
            }
        }
    }
}

/// Reads embedded metadata from an already opened file.
///
/// The reader takes ownership of the handle so it is closed as soon as the
/// read completes. An `Err` means the container could not be parsed and says
/// nothing about whether a title is present.
pub trait EmbeddedTagReader {
    fn read_tags(&self, file: File, format: ContainerFormat) -> Result<EmbeddedTags>;
}

pub struct SymphoniaTagReader;

impl EmbeddedTagReader for SymphoniaTagReader {
    fn read_tags(&self, file: File, format: ContainerFormat) -> Result<EmbeddedTags> {
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        hint.with_extension(format.extension());

        let mut probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| PruneError::Metadata(e.to_string()))?;

        let mut tags = EmbeddedTags::default();

        // ID3v2 is read while probing, before the format reader takes over
        if let Some(metadata) = probed.metadata.get() {
            if let Some(revision) = metadata.current() {
                tags.absorb(revision);
            }
        }

        if let Some(revision) = probed.format.metadata().current() {
            tags.absorb(revision);
        }

        Ok(tags)
    }
}
