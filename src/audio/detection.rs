use std::path::Path;

/// Check if a file is a FLAC file based on its extension
pub fn is_flac_file(path: &Path) -> bool {
    if let Some(ext) = path.extension() {
        ext.to_string_lossy().to_lowercase() == "flac"
    } else {
        false
    }
}
