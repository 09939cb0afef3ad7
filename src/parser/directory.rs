use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::format::Format;
use crate::parser::filter::is_convertible_file;

/// Find convertible files in a directory. If recursive is true, use walkdir; otherwise list files.
///
/// Results are sorted so batch output is stable across platforms.
pub fn find_convertible_files(
    dir: &Path,
    recursive: bool,
    only: Option<Format>,
) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut files = Vec::new();

    if recursive {
        for entry in WalkDir::new(dir) {
            let entry = entry?;
            let path = entry.path();
            if is_convertible_file(path, only) {
                files.push(path.to_path_buf());
            }
        }
    } else {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if is_convertible_file(&path, only) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}
