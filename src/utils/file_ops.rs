use std::path::Path;
use walkdir::{DirEntry, WalkDir};
use crate::{PruneError, Result};

/// Lists the direct children of `dir`, sorted by file name.
///
/// Symlinks are not followed, so a dangling link still shows up as an entry.
/// Any listing error is returned: nothing has been processed yet at this point.
pub fn list_entries(dir: impl AsRef<Path>) -> Result<Vec<DirEntry>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(PruneError::NotADirectory(dir.to_path_buf()));
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| entry.map_err(PruneError::from))
        .collect()
}
