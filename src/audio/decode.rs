//! Audio decoding (Symphonia) -> interleaved PCM.
//!
//! The decode phase loads the whole source into memory as interleaved
//! 16-bit samples; the encode phase stages them as a WAV file for the
//! external encoder.

use std::io::Cursor;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{ConvertError, Result};

/// Fully decoded audio, ready for encoding
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Interleaved 16-bit samples
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count
    pub channels: u16,
}

impl DecodedAudio {
    /// Duration of the decoded audio in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        let frames = self.samples.len() / self.channels as usize;
        frames as f64 / self.sample_rate as f64
    }

    /// Write the samples out as a PCM WAV file
    pub fn write_wav(&self, path: &Path) -> Result<()> {
        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(path, spec)
            .map_err(|e| ConvertError::Encode(format!("Failed to stage WAV: {}", e)))?;
        for &sample in &self.samples {
            writer
                .write_sample(sample)
                .map_err(|e| ConvertError::Encode(format!("Failed to stage WAV: {}", e)))?;
        }
        writer
            .finalize()
            .map_err(|e| ConvertError::Encode(format!("Failed to stage WAV: {}", e)))?;

        Ok(())
    }
}

/// Fully decode an in-memory FLAC buffer to interleaved PCM samples
pub fn decode_flac(data: &[u8]) -> Result<DecodedAudio> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(data.to_vec())), Default::default());

    let mut hint = Hint::new();
    hint.with_extension("flac");

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| ConvertError::Decode(format!("Format probe failed: {}", e)))?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| ConvertError::Decode("No default track found".to_string()))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| ConvertError::Decode(format!("Decoder init failed: {}", e)))?;

    let mut samples: Vec<i16> = Vec::new();
    let mut sample_rate = codec_params.sample_rate.unwrap_or(44100);
    let mut channels = codec_params.channels.map(|c| c.count() as u16).unwrap_or(2);

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(ConvertError::Decode(format!("Read error: {}", e))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(_)) => {
                // Corrupt packet; skip.
                continue;
            }
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(ConvertError::Decode(format!("Decode error: {}", e))),
        };

        let spec = *decoded.spec();
        sample_rate = spec.rate;
        channels = spec.channels.count() as u16;

        let frames = decoded.frames();
        let mut sbuf = SampleBuffer::<i16>::new(frames as u64, spec);
        sbuf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(sbuf.samples());
    }

    if samples.is_empty() {
        return Err(ConvertError::Decode("No audio frames decoded".to_string()));
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}
