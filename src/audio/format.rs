use std::fmt;
use std::path::Path;

/// Audio containers the reconciler knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerFormat {
    /// MPEG-4 audio (`.m4a`), tagged in place by an external tool.
    Mp4,
    /// MPEG layer 3 (`.mp3`), tags come from the encoding pipeline.
    Mp3,
}

impl ContainerFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "m4a" => Some(ContainerFormat::Mp4),
            "mp3" => Some(ContainerFormat::Mp3),
            _ => None,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ContainerFormat::Mp4 => "m4a",
            ContainerFormat::Mp3 => "mp3",
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerFormat::Mp4 => write!(f, "MP4"),
            ContainerFormat::Mp3 => write!(f, "MP3"),
        }
    }
}
