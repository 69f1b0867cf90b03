pub mod format;
pub mod metadata;
