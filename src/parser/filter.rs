use std::path::Path;

use crate::format::Format;

/// Return true if the path is an existing file this tool can read
///
/// With `only` set, the file must also carry that format's extension.
pub fn is_convertible_file(path: &Path, only: Option<Format>) -> bool {
    if !path.is_file() {
        return false;
    }
    match (Format::from_path(path), only) {
        (Some(found), Some(wanted)) => found == wanted,
        (Some(_), None) => true,
        (None, _) => false,
    }
}
