//! Test fixtures for conversion tests
//!
//! Generates sine-tone FLAC files with ffmpeg and tags them with lofty.
//! Builders return `None` when no ffmpeg binary is available so end-to-end
//! tests can self-skip.

#![cfg(test)]

use std::path::PathBuf;
use std::process::Command;
use std::sync::OnceLock;

use lofty::{ItemKey, MimeType, Picture, PictureType, Tag, TagExt, TagType};

use crate::conversion::locate_ffmpeg;

/// A valid 1x1 transparent PNG
pub const PNG_PIXEL: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

static FIXTURES_DIR: OnceLock<PathBuf> = OnceLock::new();

fn fixtures_dir() -> &'static PathBuf {
    FIXTURES_DIR.get_or_init(|| {
        let dir = std::env::temp_dir().join("flacer_test_fixtures");
        std::fs::create_dir_all(&dir).expect("Failed to create fixtures directory");
        dir
    })
}

/// Generate (and cache) a two-second sine-tone FLAC
///
/// Returns `None` when ffmpeg is not available.
fn base_flac() -> Option<PathBuf> {
    let ffmpeg = locate_ffmpeg().ok()?;
    let path = fixtures_dir().join("sine_2s.flac");
    if path.exists() {
        return Some(path);
    }

    let output = Command::new(&ffmpeg)
        .arg("-f")
        .arg("lavfi")
        .arg("-i")
        .arg("sine=frequency=440:duration=2")
        .arg("-ar")
        .arg("44100")
        .arg("-codec:a")
        .arg("flac")
        .arg("-y")
        .arg(&path)
        .output()
        .ok()?;

    if !output.status.success() {
        panic!(
            "ffmpeg failed to generate fixture: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Some(path)
}

/// Build an in-memory FLAC carrying the given vorbis comments and cover
fn build_flac(
    tags: &[(ItemKey, &str)],
    cover: Option<(MimeType, &[u8])>,
) -> Option<Vec<u8>> {
    let base = base_flac()?;

    let temp = tempfile::Builder::new()
        .prefix("tagged_")
        .suffix(".flac")
        .tempfile_in(fixtures_dir())
        .expect("Failed to create fixture temp file");
    std::fs::copy(&base, temp.path()).expect("Failed to copy base fixture");

    let mut tag = Tag::new(TagType::VorbisComments);
    for (key, value) in tags {
        tag.insert_text(key.clone(), value.to_string());
    }
    if let Some((mime, data)) = cover {
        tag.push_picture(Picture::new_unchecked(
            PictureType::CoverFront,
            mime,
            None,
            data.to_vec(),
        ));
    }
    tag.save_to_path(temp.path())
        .expect("Failed to tag fixture");

    Some(std::fs::read(temp.path()).expect("Failed to read fixture"))
}

/// The standard fixture: full recognized tag set, one extra unrecognized
/// key, and a PNG cover
pub fn tagged_flac_fixture() -> Option<Vec<u8>> {
    build_flac(
        &[
            (ItemKey::TrackArtist, "Fixture Artist"),
            (ItemKey::AlbumTitle, "Fixture Album"),
            (ItemKey::TrackTitle, "Fixture Title"),
            (ItemKey::TrackNumber, "5/12"),
            (ItemKey::RecordingDate, "2024"),
            (ItemKey::Genre, "Electronic"),
            (ItemKey::Comment, "not copied"),
        ],
        Some((MimeType::Png, PNG_PIXEL)),
    )
}

/// A fixture whose raw track-number value is `track`
pub fn flac_with_track_number(track: &str) -> Option<Vec<u8>> {
    build_flac(
        &[
            (ItemKey::TrackArtist, "Fixture Artist"),
            (ItemKey::TrackNumber, track),
        ],
        None,
    )
}

/// A fixture carrying a JPEG-typed cover
pub fn flac_with_jpeg_cover() -> Option<Vec<u8>> {
    build_flac(
        &[(ItemKey::TrackArtist, "Fixture Artist")],
        Some((MimeType::Jpeg, PNG_PIXEL)),
    )
}
