// Audio module - source metadata extraction, decoding, and tag mapping

pub mod decode;
pub mod detection;
pub mod metadata;
pub mod tags;

pub use decode::{decode_flac, DecodedAudio};
pub use detection::is_flac_file;
pub use metadata::{read_flac_metadata, CoverArt, SourceMetadata};
pub use tags::apply_tags;
