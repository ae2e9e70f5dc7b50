//! audiometa - audio metadata extraction
//!
//! The core is a FLAC metadata-section decoder: validate the `fLaC` marker,
//! walk the metadata blocks until the one flagged last, decode STREAMINFO,
//! Vorbis comments and pictures, and derive duration and bitrate.
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! let mut reader = BufReader::new(File::open("track.flac")?);
//! let metadata = audiometa::flac::read_metadata(&mut reader)?;
//! if let Some(duration) = metadata.duration() {
//!     println!("{:.1}s, {} metadata bytes", duration.as_secs_f64(), metadata.total_metadata_bytes());
//! }
//! # Ok::<(), audiometa::MetadataError>(())
//! ```
//!
//! On top of it sits a small façade that identifies the codec of a file and
//! dispatches to a reader from an explicit [`CodecTable`], falling back to
//! ID3v1 trailers.

pub mod audio;
pub mod codec;
pub mod error;
pub mod field_mapping;
pub mod flac;
pub mod id3;
pub mod utils;

pub use audio::{AudioFile, AudioMetadata, CodecTable, MetadataReader, PictureSummary, TagSource};
pub use codec::Codec;
pub use error::{MetadataError, Result};
pub use flac::{FlacMetadata, ReadOptions, StreamInfo};
pub use id3::Id3v1Tag;
