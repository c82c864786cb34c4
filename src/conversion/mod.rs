//! Audio conversion module
//!
//! Handles transcoding FLAC buffers to MP3 or M4A using ffmpeg.

mod converter;
mod ffmpeg;

pub use converter::{
    get_converter, BitrateMode, Converter, M4aConverter, Mp3Converter, TargetFormat,
};
pub use ffmpeg::encode_wav;

use std::path::PathBuf;

use crate::error::{ConvertError, Result};

/// Locate the ffmpeg binary
///
/// The `FLACER_FFMPEG` environment variable takes precedence; otherwise
/// the directories on `PATH` are searched.
pub fn locate_ffmpeg() -> Result<PathBuf> {
    if let Some(override_path) = std::env::var_os("FLACER_FFMPEG") {
        let path = PathBuf::from(override_path);
        if path.exists() {
            log::debug!("Found ffmpeg via FLACER_FFMPEG: {:?}", path);
            return Ok(path);
        }
    }

    let binary_name = if cfg!(windows) { "ffmpeg.exe" } else { "ffmpeg" };
    if let Some(paths) = std::env::var_os("PATH") {
        for dir in std::env::split_paths(&paths) {
            let candidate = dir.join(binary_name);
            if candidate.exists() {
                return Ok(candidate);
            }
        }
    }

    Err(ConvertError::Encode(
        "ffmpeg binary not found. Install ffmpeg or set FLACER_FFMPEG".to_string(),
    ))
}

/// Verify that ffmpeg exists and is executable
pub fn verify_ffmpeg() -> Result<PathBuf> {
    let path = locate_ffmpeg()?;

    if !path.exists() {
        return Err(ConvertError::Encode(format!(
            "ffmpeg not found at {:?}",
            path
        )));
    }

    // On Unix, check if executable
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata = std::fs::metadata(&path)?;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(ConvertError::Encode(format!(
                "ffmpeg at {:?} is not executable",
                path
            )));
        }
    }

    log::debug!("ffmpeg verified at: {:?}", path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_then_verify() {
        // Only meaningful where an ffmpeg binary is installed.
        let Ok(path) = locate_ffmpeg() else {
            eprintln!("skipping: ffmpeg not available");
            return;
        };
        assert!(path.exists());
        assert!(verify_ffmpeg().is_ok());
    }
}
