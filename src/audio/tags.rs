//! Tag mapping for converted files
//!
//! Translates the recognized source keys into the target format's tagging
//! scheme and persists them into the encoded output. The recognized key set
//! is identical for both formats; only the on-disk representation differs
//! (ID3v2 frames vs MP4 ilst atoms), which lofty's tag abstraction carries.

use std::path::Path;

use lofty::{Accessor, ItemKey, MimeType, Picture, Tag, TagExt};

use crate::audio::metadata::SourceMetadata;
use crate::batch::ConversionLog;
use crate::conversion::TargetFormat;
use crate::error::{ConvertError, Result};

/// Parse a `"N"` or `"N/M"` track-number value
///
/// Returns `(track, total)` with `total` defaulting to 0 when absent.
/// Any non-integer segment makes the whole value unparseable.
pub fn parse_track_number(raw: &str) -> Option<(u32, u32)> {
    let mut parts = raw.split('/');
    let track = parts.next()?.trim().parse::<u32>().ok()?;
    let total = match parts.next() {
        Some(total) => total.trim().parse::<u32>().ok()?,
        None => 0,
    };
    Some((track, total))
}

/// Map the recognized source keys into a tag for `format` and save it
/// into the encoded file at `path`
///
/// Unknown keys are silently skipped. A track number that fails to parse
/// is logged as a warning and skipped; every other tag is still written.
pub fn apply_tags(
    format: TargetFormat,
    meta: &SourceMetadata,
    path: &Path,
    log: &mut ConversionLog,
) -> Result<()> {
    let mut tag = Tag::new(format.tag_type());

    for (key, value) in &meta.tags {
        match key.as_str() {
            "artist" => tag.set_artist(value.clone()),
            "album" => tag.set_album(value.clone()),
            "title" => tag.set_title(value.clone()),
            "genre" => tag.set_genre(value.clone()),
            "date" => {
                tag.insert_text(ItemKey::RecordingDate, value.clone());
            }
            "tracknumber" => match parse_track_number(value) {
                Some((track, total)) => {
                    tag.set_track(track);
                    if total > 0 {
                        tag.set_track_total(total);
                    }
                }
                None => {
                    log.append(format!(
                        "WARNING: Could not parse track number '{}'. Skipping.",
                        value
                    ));
                }
            },
            _ => {}
        }
    }

    if let Some(cover) = &meta.cover {
        // JPEG keeps its indicator; every other MIME falls back to PNG.
        let mime = if cover.mime == "image/jpeg" {
            MimeType::Jpeg
        } else {
            MimeType::Png
        };
        tag.push_picture(Picture::new_unchecked(
            cover.pic_type,
            mime,
            cover.description.clone(),
            cover.data.clone(),
        ));
    }

    tag.save_to_path(path)
        .map_err(|e| ConvertError::Encode(format!("Failed to write tags: {}", e)))?;

    Ok(())
}
