//! Error types for the conversion pipeline

/// Error type for conversion operations
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    /// Unknown target format requested; rejected before any file is touched
    #[error("unknown format specified: '{0}'")]
    UnsupportedFormat(String),

    /// The source buffer is not readable FLAC metadata
    #[error("failed to read source metadata: {0}")]
    MetadataRead(String),

    /// The source buffer could not be decoded to PCM
    #[error("failed to decode audio: {0}")]
    Decode(String),

    /// The external encoder (or tag writing on its output) failed
    #[error("failed to encode audio: {0}")]
    Encode(String),

    /// ZIP archive construction failed
    #[error("failed to build archive: {0}")]
    Archive(String),

    /// A batch needs at least one input file
    #[error("no input files provided")]
    EmptyBatch,

    /// IO error from staging files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;
