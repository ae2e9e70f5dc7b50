// FLAC metadata handling module
//
// Layout of the metadata section:
//
//   "fLaC" | header | payload | header | payload | ... | audio frames
//
// Each header carries a last-block flag; the block after the header with the
// flag set is the first audio frame, which is never read here.

pub mod header;
pub mod metadata;
pub mod picture;
pub mod stream_info;
pub mod vorbis;

use std::io::Read;

use crate::error::{MetadataError, Result};
use crate::utils::io::{read_bytes, read_string, skip_bytes};

pub use header::{BlockHeader, BlockType};
pub use metadata::{BlockSummary, FlacMetadata};
pub use picture::{Picture, PictureType};
pub use stream_info::StreamInfo;
pub use vorbis::VorbisComment;

/// FLAC file signature
pub const FLAC_SIGNATURE: &[u8; 4] = b"fLaC";

/// Which optional block decoders run. Disabled blocks are discard-read, so
/// the byte accounting and control flow are the same either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    pub read_tags: bool,
    pub read_pictures: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            read_tags: true,
            read_pictures: true,
        }
    }
}

impl ReadOptions {
    /// Only STREAMINFO; every other block is skipped.
    pub fn stream_info_only() -> Self {
        ReadOptions {
            read_tags: false,
            read_pictures: false,
        }
    }
}

/// Read the metadata section with every block decoder enabled.
pub fn read_metadata<R: Read>(reader: &mut R) -> Result<FlacMetadata> {
    read_metadata_with(reader, ReadOptions::default())
}

/// Validate the stream marker, then walk blocks until the one flagged last.
///
/// Reads are strictly sequential and stop right after the last block's
/// payload. A source that ends before a last block is seen yields
/// [`MetadataError::UnexpectedEnd`].
pub fn read_metadata_with<R: Read>(reader: &mut R, options: ReadOptions) -> Result<FlacMetadata> {
    read_stream_marker(reader)?;

    let mut metadata = FlacMetadata {
        total_metadata_bytes: FLAC_SIGNATURE.len() as u64,
        ..Default::default()
    };

    loop {
        let header = BlockHeader::read(reader)?;
        metadata.total_metadata_bytes += BlockHeader::SIZE + u64::from(header.length);
        log::debug!(
            "block {} ({}), {} bytes{}",
            header.block_type.name(),
            header.block_type.code(),
            header.length,
            if header.is_last { ", last" } else { "" }
        );

        read_block(reader, &header, options, &mut metadata)?;
        metadata.blocks.push(BlockSummary {
            block_type: header.block_type,
            length: header.length,
        });

        if header.is_last {
            break;
        }
    }

    if metadata.stream_info.is_none() {
        log::warn!("metadata section has no STREAMINFO block");
    }

    Ok(metadata)
}

fn read_stream_marker<R: Read>(reader: &mut R) -> Result<()> {
    let marker = read_string(reader, FLAC_SIGNATURE.len())?;
    if marker.as_bytes() != FLAC_SIGNATURE {
        return Err(MetadataError::invalid(format!(
            "expected stream marker \"fLaC\", found {:?}",
            marker
        )));
    }
    Ok(())
}

// Route one payload to its decoder. Anything without a decoder is
// discard-read so the cursor lands on the next header.
//
// A STREAMINFO header declaring fewer than 34 bytes is rejected with
// StreamInvalid before its payload is read. This is stricter than the
// marker and reserved-type checks alone: decoding 34 bytes from a shorter
// block would run into the next header and break the byte accounting.
fn read_block<R: Read>(
    reader: &mut R,
    header: &BlockHeader,
    options: ReadOptions,
    metadata: &mut FlacMetadata,
) -> Result<()> {
    match header.block_type {
        BlockType::StreamInfo => {
            if header.length < StreamInfo::SIZE {
                return Err(MetadataError::invalid(format!(
                    "STREAMINFO block is {} bytes, expected {}",
                    header.length,
                    StreamInfo::SIZE
                )));
            }
            let info = StreamInfo::read(reader)?;
            skip_bytes(reader, u64::from(header.length - StreamInfo::SIZE))?;
            if metadata.stream_info.is_some() {
                log::warn!("repeated STREAMINFO block, keeping the later one");
            }
            metadata.stream_info = Some(info);
        }
        BlockType::VorbisComment if options.read_tags => {
            let payload = read_bytes(reader, header.length as usize)?;
            let comment = VorbisComment::from_payload(&payload)?;
            if metadata.vendor.is_some() {
                log::warn!("repeated VORBIS_COMMENT block, keeping the later one");
            }
            metadata.vendor = Some(comment.vendor);
            metadata.tags = comment.tags;
        }
        BlockType::Picture if options.read_pictures => {
            let payload = read_bytes(reader, header.length as usize)?;
            metadata.pictures.push(Picture::from_payload(&payload)?);
        }
        BlockType::Invalid => {
            return Err(MetadataError::invalid(format!(
                "reserved block type {}",
                BlockType::INVALID_CODE
            )));
        }
        // New block types may be added to the format; they are skipped
        // exactly like padding.
        BlockType::Padding
        | BlockType::Application
        | BlockType::SeekTable
        | BlockType::CueSheet
        | BlockType::Unknown(_)
        | BlockType::VorbisComment
        | BlockType::Picture => {
            skip_bytes(reader, u64::from(header.length))?;
        }
    }
    Ok(())
}
