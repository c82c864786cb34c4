//! Source metadata extraction
//!
//! Reads Vorbis comments and the first embedded picture from an in-memory
//! FLAC buffer. Keys are lowercased and the first value wins when a key
//! appears more than once.

use std::io::Cursor;
use std::time::Duration;

use lofty::flac::FlacFile;
use lofty::ogg::OggPictureStorage;
use lofty::{AudioFile, ParseOptions, PictureType};

use crate::error::{ConvertError, Result};

/// The first embedded picture of a source file
#[derive(Debug, Clone)]
pub struct CoverArt {
    /// MIME type string as stored in the source (e.g. "image/jpeg")
    pub mime: String,
    /// Picture type code (front cover, back cover, ...)
    pub pic_type: PictureType,
    /// Free-form description, if any
    pub description: Option<String>,
    /// Raw image bytes
    pub data: Vec<u8>,
}

/// Metadata extracted from a source file
#[derive(Debug, Clone)]
pub struct SourceMetadata {
    /// Ordered (lowercase key, value) pairs; first value wins on duplicates
    pub tags: Vec<(String, String)>,
    /// First embedded picture; additional pictures are dropped
    pub cover: Option<CoverArt>,
    /// Audio duration, for progress reporting
    pub duration: Duration,
}

impl SourceMetadata {
    /// Look up a tag value by its lowercase key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Extract tags, cover art and duration from an in-memory FLAC buffer
pub fn read_flac_metadata(data: &[u8]) -> Result<SourceMetadata> {
    let mut cursor = Cursor::new(data);
    let flac = FlacFile::read_from(&mut cursor, ParseOptions::new())
        .map_err(|e| ConvertError::MetadataRead(e.to_string()))?;

    let mut tags: Vec<(String, String)> = Vec::new();
    if let Some(comments) = flac.vorbis_comments() {
        for (key, value) in comments.items() {
            let key = key.to_ascii_lowercase();
            if !tags.iter().any(|(k, _)| *k == key) {
                tags.push((key, value.to_string()));
            }
        }
    }

    let cover = flac.pictures().first().map(|(picture, _)| CoverArt {
        mime: picture.mime_type().as_str().to_string(),
        pic_type: picture.pic_type(),
        description: picture.description().map(|d| d.to_string()),
        data: picture.data().to_vec(),
    });

    let duration = flac.properties().duration();

    Ok(SourceMetadata {
        tags,
        cover,
        duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_flac_buffer() {
        let result = read_flac_metadata(b"definitely not a flac file");
        assert!(matches!(result, Err(ConvertError::MetadataRead(_))));
    }

    #[test]
    fn test_rejects_empty_buffer() {
        let result = read_flac_metadata(&[]);
        assert!(matches!(result, Err(ConvertError::MetadataRead(_))));
    }

    #[test]
    fn test_reads_tags_from_fixture() {
        let Some(flac) = crate::test_fixtures::tagged_flac_fixture() else {
            eprintln!("skipping: ffmpeg not available");
            return;
        };

        let meta = read_flac_metadata(&flac).expect("fixture should parse");
        assert_eq!(meta.get("artist"), Some("Fixture Artist"));
        assert_eq!(meta.get("album"), Some("Fixture Album"));
        assert_eq!(meta.get("title"), Some("Fixture Title"));
        assert_eq!(meta.get("tracknumber"), Some("5/12"));
        assert_eq!(meta.get("date"), Some("2024"));
        assert_eq!(meta.get("genre"), Some("Electronic"));
        assert!(meta.duration.as_secs_f64() > 0.5);
    }

    #[test]
    fn test_reads_first_picture_from_fixture() {
        let Some(flac) = crate::test_fixtures::tagged_flac_fixture() else {
            eprintln!("skipping: ffmpeg not available");
            return;
        };

        let meta = read_flac_metadata(&flac).expect("fixture should parse");
        let cover = meta.cover.expect("fixture embeds a cover");
        assert_eq!(cover.mime, "image/png");
        assert_eq!(cover.data, crate::test_fixtures::PNG_PIXEL);
    }
}
