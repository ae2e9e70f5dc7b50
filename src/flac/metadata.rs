// Result of walking the FLAC metadata section

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;

use super::header::BlockType;
use super::picture::{Picture, PictureType};
use super::stream_info::StreamInfo;

/// One entry of the block inventory, in stream order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockSummary {
    pub block_type: BlockType,
    pub length: u32,
}

/// Everything decoded from one FLAC metadata section.
///
/// Built by [`read_metadata`](super::read_metadata) and never modified
/// afterwards. A failed read produces no `FlacMetadata` at all.
#[derive(Debug, Clone, Default)]
pub struct FlacMetadata {
    pub(crate) total_metadata_bytes: u64,
    pub(crate) stream_info: Option<StreamInfo>,
    pub(crate) vendor: Option<String>,
    pub(crate) tags: HashMap<String, Vec<String>>,
    pub(crate) pictures: Vec<Picture>,
    pub(crate) blocks: Vec<BlockSummary>,
}

impl FlacMetadata {
    /// The STREAMINFO block. A conforming stream always has one; `None`
    /// means the stream is malformed.
    pub fn stream_info(&self) -> Option<&StreamInfo> {
        self.stream_info.as_ref()
    }

    /// Bytes from the start of the stream marker to the first audio frame
    pub fn total_metadata_bytes(&self) -> u64 {
        self.total_metadata_bytes
    }

    pub fn duration(&self) -> Option<Duration> {
        self.stream_info.as_ref().and_then(StreamInfo::duration)
    }

    /// Average bitrate of the audio frames in kbit/s, truncated.
    ///
    /// `file_size` is the size of the whole file in bytes. Returns `None`
    /// when the duration is unknown or no audio bytes remain after the
    /// metadata section.
    pub fn estimated_bitrate(&self, file_size: u64) -> Option<u32> {
        let nanos = self.duration()?.as_nanos();
        if nanos == 0 {
            return None;
        }
        let audio_bytes = file_size.checked_sub(self.total_metadata_bytes)?;
        let kbps = u128::from(audio_bytes) * 8 * 1_000_000 / nanos;
        if kbps == 0 {
            return None;
        }
        u32::try_from(kbps).ok()
    }

    /// Vendor string of the VORBIS_COMMENT block, if there was one
    pub fn vendor(&self) -> Option<&str> {
        self.vendor.as_deref()
    }

    /// Raw tag vectors keyed by upper-cased field name
    pub fn tags(&self) -> &HashMap<String, Vec<String>> {
        &self.tags
    }

    /// First value of a tag, case-insensitive
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tag_values(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn tag_values(&self, name: &str) -> Option<&[String]> {
        self.tags.get(&name.to_ascii_uppercase()).map(Vec::as_slice)
    }

    pub fn pictures(&self) -> &[Picture] {
        &self.pictures
    }

    /// Front cover, falling back to the first picture of any type
    pub fn front_cover(&self) -> Option<&Picture> {
        self.pictures
            .iter()
            .find(|p| p.picture_type == PictureType::CoverFront)
            .or_else(|| self.pictures.first())
    }

    pub fn blocks(&self) -> &[BlockSummary] {
        &self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flac::stream_info::tests::sample;

    fn with_info(info: StreamInfo, metadata_bytes: u64) -> FlacMetadata {
        FlacMetadata {
            total_metadata_bytes: metadata_bytes,
            stream_info: Some(info),
            ..Default::default()
        }
    }

    #[test]
    fn bitrate_in_kbps() {
        let metadata = with_info(sample(), 42);
        // 46875 bytes over ~0.375 s is just over 1000 kbit/s
        assert_eq!(metadata.estimated_bitrate(42 + 46_875), Some(1000));
    }

    #[test]
    fn bitrate_unknown_without_audio_bytes() {
        let metadata = with_info(sample(), 42);
        assert_eq!(metadata.estimated_bitrate(42), None);
        assert_eq!(metadata.estimated_bitrate(10), None);
    }

    #[test]
    fn bitrate_unknown_without_duration() {
        let mut info = sample();
        info.sample_rate = 0;
        let metadata = with_info(info, 42);
        assert_eq!(metadata.duration(), None);
        assert_eq!(metadata.estimated_bitrate(1_000_000), None);

        let empty = FlacMetadata::default();
        assert!(empty.stream_info().is_none());
        assert_eq!(empty.estimated_bitrate(1_000_000), None);
    }

    #[test]
    fn tag_lookup_is_case_insensitive() {
        let mut metadata = FlacMetadata::default();
        metadata
            .tags
            .insert("TITLE".to_string(), vec!["One".to_string(), "Two".to_string()]);
        assert_eq!(metadata.tag("title"), Some("One"));
        assert_eq!(metadata.tag_values("Title").map(<[String]>::len), Some(2));
        assert_eq!(metadata.tag("artist"), None);
    }

    #[test]
    fn front_cover_prefers_cover_front() {
        use crate::flac::picture::tests::front_cover;

        let mut back = front_cover();
        back.picture_type = PictureType::CoverBack;
        let metadata = FlacMetadata {
            pictures: vec![back.clone(), front_cover()],
            ..Default::default()
        };
        assert_eq!(metadata.front_cover(), Some(&front_cover()));

        let only_back = FlacMetadata {
            pictures: vec![back.clone()],
            ..Default::default()
        };
        assert_eq!(only_back.front_cover(), Some(&back));
    }
}
