//! FFmpeg subprocess handling for audio encoding

use std::path::Path;
use std::process::Command;

use crate::error::{ConvertError, Result};

/// Encode a staged WAV file into the target container using ffmpeg
///
/// # Arguments
/// * `ffmpeg_path` - Path to the ffmpeg binary
/// * `input_path` - Path to the staged WAV file
/// * `output_path` - Path for the encoded output; the extension selects the
///   container
/// * `codec_args` - Codec and bitrate arguments, built by the converter
pub fn encode_wav(
    ffmpeg_path: &Path,
    input_path: &Path,
    output_path: &Path,
    codec_args: &[String],
) -> Result<()> {
    // -y  : Overwrite output without asking
    // -i  : Input file
    // -vn : Skip video streams; cover art is written by the tag mapper
    let output = Command::new(ffmpeg_path)
        .arg("-y")
        .arg("-i")
        .arg(input_path)
        .arg("-vn")
        .args(codec_args)
        .arg(output_path)
        .output()
        .map_err(|e| ConvertError::Encode(format!("Failed to spawn ffmpeg: {}", e)))?;

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(ConvertError::Encode(format!(
            "ffmpeg exited with status {}: {}",
            output.status,
            stderr.lines().last().unwrap_or("Unknown error")
        )))
    }
}
