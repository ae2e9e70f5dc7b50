// FLAC STREAMINFO block implementation

use std::fmt::Write;
use std::io::Read;
use std::time::Duration;

use serde::Serialize;

use crate::error::{MetadataError, Result};
use crate::utils::io::{read_be_u32, read_be_u48, read_be_u64, read_exact_array};

/// Stream characteristics carried by the mandatory first metadata block.
///
/// Payload layout (34 bytes, big-endian):
///
/// ```text
/// bits  16  min block size      16  max block size
/// bits  24  min frame size      24  max frame size
/// bits  20  sample rate          3  channels - 1
/// bits   5  bits per sample - 1 36  total samples
/// bytes 16  MD5 of the unencoded audio
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamInfo {
    /// Minimum block size in samples
    pub min_block_size: u16,
    /// Maximum block size in samples
    pub max_block_size: u16,
    /// Minimum frame size in bytes, 0 when unknown
    pub min_frame_size: u32,
    /// Maximum frame size in bytes, 0 when unknown
    pub max_frame_size: u32,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count, 1..=8
    pub channels: u8,
    /// Bits per sample, 4..=32
    pub bits_per_sample: u8,
    /// Samples per channel, 0 when unknown
    pub total_samples: u64,
    #[serde(serialize_with = "serialize_md5")]
    pub md5: [u8; 16],
}

fn serialize_md5<S: serde::Serializer>(md5: &[u8; 16], serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_hex(md5))
}

fn to_hex(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        // writing to a String cannot fail
        let _ = write!(hex, "{:02x}", b);
    }
    hex
}

impl StreamInfo {
    pub const SIZE: u32 = 34;

    pub const MAX_SAMPLE_RATE: u32 = 655_350;

    /// Decode the 34-byte payload. Fields are taken as laid out; nothing is
    /// range-checked here (see [`StreamInfo::validate`]).
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let sizes = read_be_u32(reader)?;
        let frames = read_be_u48(reader)?;
        let packed = read_be_u64(reader)?;
        let md5 = read_exact_array(reader)?;

        Ok(StreamInfo {
            min_block_size: (sizes >> 16) as u16,
            max_block_size: (sizes & 0xFFFF) as u16,
            min_frame_size: (frames >> 24) as u32,
            max_frame_size: (frames & 0xFF_FFFF) as u32,
            sample_rate: (packed >> 44) as u32,
            // Both fields are stored minus one
            channels: ((packed >> 41) & 0x07) as u8 + 1,
            bits_per_sample: ((packed >> 36) & 0x1F) as u8 + 1,
            total_samples: packed & 0x0F_FFFF_FFFF,
            md5,
        })
    }

    /// Check the documented field ranges.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 || self.sample_rate > Self::MAX_SAMPLE_RATE {
            return Err(MetadataError::invalid(format!(
                "sample rate {} out of range",
                self.sample_rate
            )));
        }
        if !(4..=32).contains(&self.bits_per_sample) {
            return Err(MetadataError::invalid(format!(
                "{} bits per sample out of range",
                self.bits_per_sample
            )));
        }
        if self.min_block_size > self.max_block_size {
            return Err(MetadataError::invalid(format!(
                "min block size {} exceeds max block size {}",
                self.min_block_size, self.max_block_size
            )));
        }
        Ok(())
    }

    pub fn is_fixed_block_size(&self) -> bool {
        self.min_block_size == self.max_block_size
    }

    /// Length of the stream, or `None` when the sample rate or the sample
    /// count is unknown (zero).
    pub fn duration(&self) -> Option<Duration> {
        if self.sample_rate == 0 || self.total_samples == 0 {
            return None;
        }
        let nanos = u128::from(self.total_samples) * 1_000_000_000 / u128::from(self.sample_rate);
        // 2^36 samples at 1 Hz is ~2^66 ns, more than from_nanos takes
        let secs = (nanos / 1_000_000_000) as u64;
        let subsec = (nanos % 1_000_000_000) as u32;
        Some(Duration::new(secs, subsec))
    }

    /// MD5 signature as lowercase hex
    pub fn md5_hex(&self) -> String {
        to_hex(&self.md5)
    }
}

#[cfg(test)]
impl StreamInfo {
    /// Pack back into the 34-byte payload layout
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::SIZE as usize);
        let sizes = (u32::from(self.min_block_size) << 16) | u32::from(self.max_block_size);
        out.extend_from_slice(&sizes.to_be_bytes());
        let frames = (u64::from(self.min_frame_size & 0xFF_FFFF) << 24)
            | u64::from(self.max_frame_size & 0xFF_FFFF);
        out.extend_from_slice(&frames.to_be_bytes()[2..]);
        let packed = (u64::from(self.sample_rate & 0xF_FFFF) << 44)
            | (u64::from((self.channels - 1) & 0x07) << 41)
            | (u64::from((self.bits_per_sample - 1) & 0x1F) << 36)
            | (self.total_samples & 0x0F_FFFF_FFFF);
        out.extend_from_slice(&packed.to_be_bytes());
        out.extend_from_slice(&self.md5);
        out
    }
}
