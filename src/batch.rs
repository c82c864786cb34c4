//! Batch driver
//!
//! Converts an ordered set of in-memory FLAC files and returns either the
//! bare converted file or a deflate ZIP archive holding one entry per input.
//! The conversion log is caller-owned and passed into every pipeline call.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::conversion::{get_converter, BitrateMode, Converter, TargetFormat};
use crate::error::{ConvertError, Result};

/// Fixed name for multi-file archive output
pub const ARCHIVE_NAME: &str = "converted_audio.zip";

/// Append-only sequence of human-readable event lines for one batch run
///
/// Each appended line is also mirrored to the `log` crate so it reaches the
/// terminal and log file.
#[derive(Debug, Default)]
pub struct ConversionLog {
    lines: Vec<String>,
}

impl ConversionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event line
    pub fn append(&mut self, line: impl Into<String>) {
        let line = line.into();
        if line.starts_with("ERROR") {
            log::error!("{}", line);
        } else if line.starts_with("WARNING") {
            log::warn!("{}", line);
        } else {
            log::info!("{}", line);
        }
        self.lines.push(line);
    }

    /// Drop all lines; called at the start of each batch
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

/// Result of a batch conversion
#[derive(Debug)]
pub enum BatchOutput {
    /// A single converted file with its suggested filename
    Single {
        file_name: String,
        mime: &'static str,
        data: Vec<u8>,
    },
    /// A ZIP archive holding one entry per input
    Archive {
        file_name: String,
        mime: &'static str,
        data: Vec<u8>,
    },
}

impl BatchOutput {
    pub fn file_name(&self) -> &str {
        match self {
            BatchOutput::Single { file_name, .. } | BatchOutput::Archive { file_name, .. } => {
                file_name
            }
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            BatchOutput::Single { mime, .. } | BatchOutput::Archive { mime, .. } => mime,
        }
    }

    pub fn data(&self) -> &[u8] {
        match self {
            BatchOutput::Single { data, .. } | BatchOutput::Archive { data, .. } => data,
        }
    }
}

/// Output filename for a converted input: `<original stem>.<target extension>`
fn output_file_name(source_name: &str, format: TargetFormat) -> String {
    let stem = source_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(source_name);
    format!("{}.{}", stem, format.extension())
}

/// Convert an ordered batch of `(name, bytes)` files
///
/// Clears `log`, resolves the converter once, and converts every file in
/// input order. One file yields a bare output; several yield a ZIP archive.
/// The first fatal error aborts the whole batch: it is appended to the log
/// once and returned, and no partial archive is produced.
pub fn convert_batch(
    files: &[(String, Vec<u8>)],
    format_name: &str,
    mode: BitrateMode,
    bitrate: u32,
    log: &mut ConversionLog,
) -> Result<BatchOutput> {
    log.clear();

    if files.is_empty() {
        return Err(ConvertError::EmptyBatch);
    }

    let converter = match get_converter(format_name) {
        Ok(converter) => converter,
        Err(e) => {
            log.append(format!("ERROR: An unexpected error occurred: {}", e));
            return Err(e);
        }
    };

    log.append(format!(
        "BATCH START: Initializing conversion for {} file(s).",
        files.len()
    ));
    log.append(format!(
        "BATCH INFO: Target format: {}, Type: {}.",
        format_name.to_uppercase(),
        mode.label()
    ));

    let result = run_batch(files, converter, mode, bitrate, log);
    if let Err(e) = &result {
        log.append(format!("ERROR: An unexpected error occurred: {}", e));
    }
    result
}

fn run_batch(
    files: &[(String, Vec<u8>)],
    converter: &dyn Converter,
    mode: BitrateMode,
    bitrate: u32,
    log: &mut ConversionLog,
) -> Result<BatchOutput> {
    let format = converter.format();

    if files.len() == 1 {
        let (name, data) = &files[0];
        let output = converter.process(data, bitrate, mode, log, name)?;
        return Ok(BatchOutput::Single {
            file_name: output_file_name(name, format),
            mime: format.mime_type(),
            data: output,
        });
    }

    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (index, (name, data)) in files.iter().enumerate() {
        log.append("-".repeat(30));
        log.append(format!(
            "INFO: Processing file {} of {}: '{}'",
            index + 1,
            files.len(),
            name
        ));

        let output = converter.process(data, bitrate, mode, log, name)?;
        archive
            .start_file(output_file_name(name, format), options)
            .map_err(|e| ConvertError::Archive(e.to_string()))?;
        archive.write_all(&output)?;
    }

    log.append("-".repeat(30));
    log.append("BATCH SUCCESS: All files converted and zipped successfully!");

    let cursor = archive
        .finish()
        .map_err(|e| ConvertError::Archive(e.to_string()))?;

    Ok(BatchOutput::Archive {
        file_name: ARCHIVE_NAME.to_string(),
        mime: "application/zip",
        data: cursor.into_inner(),
    })
}
