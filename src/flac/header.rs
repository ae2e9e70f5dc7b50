// FLAC metadata block header

use std::io::Read;

use serde::Serialize;

use crate::error::Result;
use crate::utils::io::read_be_u32;

/// FLAC metadata block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BlockType {
    StreamInfo,
    Padding,
    Application,
    SeekTable,
    VorbisComment,
    CueSheet,
    Picture,
    /// Codes 7..=126: reserved for future block types, skipped like padding
    Unknown(u8),
    /// Code 127, which the format forbids
    Invalid,
}

impl BlockType {
    pub const INVALID_CODE: u8 = 127;

    /// Map the 7-bit type code to a block type
    pub fn from_code(code: u8) -> Self {
        match code & 0x7F {
            0 => BlockType::StreamInfo,
            1 => BlockType::Padding,
            2 => BlockType::Application,
            3 => BlockType::SeekTable,
            4 => BlockType::VorbisComment,
            5 => BlockType::CueSheet,
            6 => BlockType::Picture,
            Self::INVALID_CODE => BlockType::Invalid,
            other => BlockType::Unknown(other),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            BlockType::StreamInfo => 0,
            BlockType::Padding => 1,
            BlockType::Application => 2,
            BlockType::SeekTable => 3,
            BlockType::VorbisComment => 4,
            BlockType::CueSheet => 5,
            BlockType::Picture => 6,
            BlockType::Unknown(code) => *code,
            BlockType::Invalid => Self::INVALID_CODE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BlockType::StreamInfo => "STREAMINFO",
            BlockType::Padding => "PADDING",
            BlockType::Application => "APPLICATION",
            BlockType::SeekTable => "SEEKTABLE",
            BlockType::VorbisComment => "VORBIS_COMMENT",
            BlockType::CueSheet => "CUESHEET",
            BlockType::Picture => "PICTURE",
            BlockType::Unknown(_) => "UNKNOWN",
            BlockType::Invalid => "INVALID",
        }
    }
}

/// FLAC metadata block header
///
/// ```text
///  31 | 30 ........ 24 | 23 ..................... 0
/// last|   block type   |     payload length
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub is_last: bool,
    pub block_type: BlockType,
    pub length: u32,
}

impl BlockHeader {
    pub const SIZE: u64 = 4;

    /// Read FLAC metadata block header from reader
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(Self::from_u32(read_be_u32(reader)?))
    }

    pub fn from_u32(raw: u32) -> Self {
        BlockHeader {
            is_last: raw & 0x8000_0000 != 0,
            block_type: BlockType::from_code((raw >> 24) as u8),
            length: raw & 0x00FF_FFFF,
        }
    }

    pub fn to_u32(&self) -> u32 {
        let last = if self.is_last { 0x8000_0000 } else { 0 };
        last | (u32::from(self.block_type.code()) << 24) | (self.length & 0x00FF_FFFF)
    }
}
