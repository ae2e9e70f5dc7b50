// Uniform metadata view shared by every codec reader

use std::time::Duration;

use base64::Engine;
use serde::Serialize;

use crate::codec::Codec;
use crate::field_mapping::{StandardField, ValueConverter};
use crate::flac::{FlacMetadata, Picture, PictureType, StreamInfo};
use crate::id3::Id3v1Tag;

/// Where the descriptive fields came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TagSource {
    VorbisComment,
    Id3v1,
    None,
}

/// Embedded picture without its payload, unless requested
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PictureSummary {
    pub picture_type: PictureType,
    pub mime_type: String,
    pub description: String,
    pub width: u32,
    pub height: u32,
    pub size: usize,
    /// Set by [`AudioMetadata::embed_picture_data`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_base64: Option<String>,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl From<&Picture> for PictureSummary {
    fn from(picture: &Picture) -> Self {
        PictureSummary {
            picture_type: picture.picture_type,
            mime_type: picture.mime_type.clone(),
            description: picture.description.clone(),
            width: picture.width,
            height: picture.height,
            size: picture.data.len(),
            data_base64: None,
            data: picture.data.clone(),
        }
    }
}

/// Metadata in the same shape for every codec
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioMetadata {
    pub codec: Codec,
    pub tag_source: TagSource,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub composer: Option<String>,
    pub year: Option<u16>,
    pub genre: Option<String>,
    pub track: Option<u32>,
    pub track_total: Option<u32>,
    pub disc: Option<u32>,
    pub disc_total: Option<u32>,
    pub comment: Option<String>,
    pub duration_ms: Option<u64>,
    pub bitrate_kbps: Option<u32>,
    pub stream_info: Option<StreamInfo>,
    pub metadata_bytes: Option<u64>,
    pub pictures: Vec<PictureSummary>,
}

impl AudioMetadata {
    /// Everything unknown
    pub fn empty(codec: Codec) -> Self {
        AudioMetadata {
            codec,
            tag_source: TagSource::None,
            title: None,
            artist: None,
            album: None,
            album_artist: None,
            composer: None,
            year: None,
            genre: None,
            track: None,
            track_total: None,
            disc: None,
            disc_total: None,
            comment: None,
            duration_ms: None,
            bitrate_kbps: None,
            stream_info: None,
            metadata_bytes: None,
            pictures: Vec::new(),
        }
    }

    /// Build from a decoded FLAC metadata section. `file_size` feeds the
    /// bitrate estimate.
    pub fn from_flac(flac: &FlacMetadata, file_size: u64) -> Self {
        let text = |field: StandardField| -> Option<String> {
            field
                .vorbis_keys()
                .iter()
                .find_map(|key| flac.tag(key))
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let (track, inline_track_total) = text(StandardField::Track)
            .map(|v| ValueConverter::parse_position(&v))
            .unwrap_or((None, None));
        let (disc, inline_disc_total) = text(StandardField::Disc)
            .map(|v| ValueConverter::parse_position(&v))
            .unwrap_or((None, None));
        let total = |field: StandardField| {
            text(field).and_then(|v| ValueConverter::parse_position(&v).0)
        };

        let tag_source = if flac.vendor().is_some() {
            TagSource::VorbisComment
        } else {
            TagSource::None
        };

        AudioMetadata {
            codec: Codec::Flac,
            tag_source,
            title: text(StandardField::Title),
            artist: text(StandardField::Artist),
            album: text(StandardField::Album),
            album_artist: text(StandardField::AlbumArtist),
            composer: text(StandardField::Composer),
            year: text(StandardField::Year).and_then(|v| ValueConverter::parse_year(&v)),
            genre: text(StandardField::Genre),
            track,
            track_total: total(StandardField::TrackTotal).or(inline_track_total),
            disc,
            disc_total: total(StandardField::DiscTotal).or(inline_disc_total),
            comment: text(StandardField::Comment),
            duration_ms: flac.duration().map(|d| d.as_millis() as u64),
            bitrate_kbps: flac.estimated_bitrate(file_size),
            stream_info: flac.stream_info().cloned(),
            metadata_bytes: Some(flac.total_metadata_bytes()),
            pictures: flac.pictures().iter().map(PictureSummary::from).collect(),
        }
    }

    /// Build from an ID3v1 trailer. The trailer says nothing about the
    /// stream, so only the descriptive fields are filled in.
    pub fn from_id3v1(tag: &Id3v1Tag, codec: Codec) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        AudioMetadata {
            tag_source: TagSource::Id3v1,
            title: non_empty(&tag.title),
            artist: non_empty(&tag.artist),
            album: non_empty(&tag.album),
            year: tag.year,
            genre: tag.genre.map(str::to_string),
            track: tag.track.map(u32::from),
            comment: non_empty(&tag.comment),
            ..AudioMetadata::empty(codec)
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration_ms.map(Duration::from_millis)
    }

    /// Include picture payloads (base64) when serialized
    pub fn embed_picture_data(&mut self) {
        for picture in &mut self.pictures {
            picture.data_base64 =
                Some(base64::engine::general_purpose::STANDARD.encode(&picture.data));
        }
    }
}
