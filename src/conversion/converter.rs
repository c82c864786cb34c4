//! Converter variants and the format strategy selector
//!
//! One operation, two format-specific implementations selected by a runtime
//! key. The implementations carry only the format-specific values (codec
//! arguments and quality constants); the pipeline sequencing is shared.

use lofty::TagType;

use crate::audio::{apply_tags, decode_flac, read_flac_metadata};
use crate::batch::ConversionLog;
use crate::error::{ConvertError, Result};

use super::{encode_wav, locate_ffmpeg};

/// Supported target container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    Mp3,
    M4a,
}

impl TargetFormat {
    /// File extension for the target container
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Mp3 => "mp3",
            TargetFormat::M4a => "m4a",
        }
    }

    /// MIME type of the target container
    pub fn mime_type(&self) -> &'static str {
        match self {
            TargetFormat::Mp3 => "audio/mpeg",
            TargetFormat::M4a => "audio/mp4",
        }
    }

    /// Tagging scheme of the target container
    pub fn tag_type(&self) -> TagType {
        match self {
            TargetFormat::Mp3 => TagType::Id3v2,
            TargetFormat::M4a => TagType::Mp4Ilst,
        }
    }

    /// Short label for log lines
    pub fn label(&self) -> &'static str {
        match self {
            TargetFormat::Mp3 => "MP3",
            TargetFormat::M4a => "M4A",
        }
    }

    /// Descriptive label for log lines
    pub fn long_label(&self) -> &'static str {
        match self {
            TargetFormat::Mp3 => "MP3",
            TargetFormat::M4a => "M4A (AAC)",
        }
    }
}

/// Bitrate policies governing how the encoder allocates bits over time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitrateMode {
    /// Constant bitrate
    Cbr,
    /// Variable bitrate; the numeric bitrate is ignored
    Vbr,
    /// Average bitrate
    Abr,
}

impl BitrateMode {
    /// Uppercase label for log lines
    pub fn label(&self) -> &'static str {
        match self {
            BitrateMode::Cbr => "CBR",
            BitrateMode::Vbr => "VBR",
            BitrateMode::Abr => "ABR",
        }
    }
}

/// A stateless single-file converter for one target format
pub trait Converter {
    /// The target container this converter produces
    fn format(&self) -> TargetFormat;

    /// Codec and bitrate arguments for the encoder
    fn encoder_args(&self, bitrate: u32, mode: BitrateMode) -> Vec<String>;

    /// Convert one in-memory FLAC buffer into a finished, tagged output
    ///
    /// Sequences tag extraction, decode, encode and tag mapping, appending a
    /// progress line per step. Failures abort this file and propagate.
    fn process(
        &self,
        source: &[u8],
        bitrate: u32,
        mode: BitrateMode,
        log: &mut ConversionLog,
        filename: &str,
    ) -> Result<Vec<u8>> {
        let format = self.format();
        log.append(format!(
            "INFO: Starting {} conversion for '{}'.",
            format.long_label(),
            filename
        ));

        let meta = read_flac_metadata(source)?;
        log.append("INFO: Successfully extracted source metadata.");

        let audio = decode_flac(source)?;
        log.append(format!(
            "INFO: Loaded audio data. Duration: {:.2}s.",
            audio.duration_secs()
        ));

        if mode == BitrateMode::Vbr {
            log.append("INFO: Applying VBR encoding (audio only).");
        } else {
            log.append(format!(
                "INFO: Applying {} encoding (audio only).",
                mode.label()
            ));
        }

        let ffmpeg = locate_ffmpeg()?;
        let staging = tempfile::tempdir()?;
        let wav_path = staging.path().join("staged.wav");
        let out_path = staging.path().join(format!("out.{}", format.extension()));

        audio.write_wav(&wav_path)?;
        encode_wav(
            &ffmpeg,
            &wav_path,
            &out_path,
            &self.encoder_args(bitrate, mode),
        )?;
        log.append("INFO: Audio conversion complete. Applying metadata.");

        apply_tags(format, &meta, &out_path, log)?;
        log.append("INFO: Metadata successfully applied.");

        let output = std::fs::read(&out_path)?;
        log.append(format!(
            "SUCCESS: Finished {} conversion for '{}'.",
            format.label(),
            filename
        ));
        Ok(output)
    }
}

/// MP3 converter backed by LAME
pub struct Mp3Converter;

impl Converter for Mp3Converter {
    fn format(&self) -> TargetFormat {
        TargetFormat::Mp3
    }

    fn encoder_args(&self, bitrate: u32, mode: BitrateMode) -> Vec<String> {
        let mut args = vec![
            "-codec:a".to_string(),
            "libmp3lame".to_string(),
            "-id3v2_version".to_string(),
            "3".to_string(),
        ];
        match mode {
            // LAME "best" VBR quality index
            BitrateMode::Vbr => {
                args.push("-q:a".to_string());
                args.push("0".to_string());
            }
            BitrateMode::Cbr | BitrateMode::Abr => {
                args.push("-b:a".to_string());
                args.push(format!("{}k", bitrate));
            }
        }
        args
    }
}

/// M4A (AAC) converter backed by ffmpeg's native AAC encoder
pub struct M4aConverter;

impl Converter for M4aConverter {
    fn format(&self) -> TargetFormat {
        TargetFormat::M4a
    }

    fn encoder_args(&self, bitrate: u32, mode: BitrateMode) -> Vec<String> {
        let mut args = vec!["-c:a".to_string(), "aac".to_string()];
        match mode {
            // Near-best AAC VBR quality index
            BitrateMode::Vbr => {
                args.push("-q:a".to_string());
                args.push("2".to_string());
            }
            BitrateMode::Cbr | BitrateMode::Abr => {
                args.push("-b:a".to_string());
                args.push(format!("{}k", bitrate));
            }
        }
        args
    }
}

/// Return the converter bound to `format_name`
///
/// The input is constrained to the closed set `{"mp3", "m4a"}`; anything
/// else is rejected with `UnsupportedFormat`.
pub fn get_converter(format_name: &str) -> Result<&'static dyn Converter> {
    match format_name {
        "mp3" => Ok(&Mp3Converter),
        "m4a" => Ok(&M4aConverter),
        other => Err(ConvertError::UnsupportedFormat(other.to_string())),
    }
}
