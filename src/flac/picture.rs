// FLAC PICTURE block implementation

use std::io::Cursor;

use serde::Serialize;

use crate::error::{MetadataError, Result};
use crate::utils::encoding::{decode_text, TextEncoding};
use crate::utils::io::{read_be_u32, read_bytes};

/// Role of an embedded picture, codes 0..=20 as shared with ID3v2 APIC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PictureType {
    Other,
    FileIcon,
    OtherFileIcon,
    CoverFront,
    CoverBack,
    LeafletPage,
    Media,
    LeadArtist,
    Artist,
    Conductor,
    Band,
    Composer,
    Lyricist,
    RecordingLocation,
    DuringRecording,
    DuringPerformance,
    VideoScreenCapture,
    BrightColouredFish,
    Illustration,
    BandLogo,
    PublisherLogo,
}

// Indexed by type code
const PICTURE_TYPES: [(PictureType, &str); 21] = [
    (PictureType::Other, "other"),
    (PictureType::FileIcon, "32x32 file icon"),
    (PictureType::OtherFileIcon, "file icon"),
    (PictureType::CoverFront, "front cover"),
    (PictureType::CoverBack, "back cover"),
    (PictureType::LeafletPage, "leaflet page"),
    (PictureType::Media, "media"),
    (PictureType::LeadArtist, "lead artist"),
    (PictureType::Artist, "artist"),
    (PictureType::Conductor, "conductor"),
    (PictureType::Band, "band"),
    (PictureType::Composer, "composer"),
    (PictureType::Lyricist, "lyricist"),
    (PictureType::RecordingLocation, "recording location"),
    (PictureType::DuringRecording, "during recording"),
    (PictureType::DuringPerformance, "during performance"),
    (PictureType::VideoScreenCapture, "screen capture"),
    (PictureType::BrightColouredFish, "bright coloured fish"),
    (PictureType::Illustration, "illustration"),
    (PictureType::BandLogo, "band logo"),
    (PictureType::PublisherLogo, "publisher logo"),
];

impl PictureType {
    /// Codes outside 0..=20 map to `Other`
    pub fn from_u32(value: u32) -> Self {
        PICTURE_TYPES
            .get(value as usize)
            .map(|(picture_type, _)| *picture_type)
            .unwrap_or(PictureType::Other)
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn description(self) -> &'static str {
        PICTURE_TYPES[self as usize].1
    }
}

/// FLAC PICTURE block structure
#[derive(Debug, Clone, PartialEq)]
pub struct Picture {
    pub picture_type: PictureType,
    pub mime_type: String,
    pub description: String,
    pub width: u32,
    pub height: u32,
    /// Colour depth in bits per pixel
    pub depth: u32,
    /// Palette size for indexed images, 0 otherwise
    pub colors: u32,
    pub data: Vec<u8>,
}

impl Picture {
    /// Decode a complete PICTURE block payload
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(payload);

        let picture_type = PictureType::from_u32(read_field(&mut cursor, "picture type")?);
        let mime = read_sized(&mut cursor, payload.len(), "MIME type")?;
        let mime_type = String::from_utf8_lossy(&mime).into_owned();
        let description = read_sized(&mut cursor, payload.len(), "description")?;
        let description = decode_text(&description, TextEncoding::Utf8);

        let width = read_field(&mut cursor, "width")?;
        let height = read_field(&mut cursor, "height")?;
        let depth = read_field(&mut cursor, "depth")?;
        let colors = read_field(&mut cursor, "colors")?;
        let data = read_sized(&mut cursor, payload.len(), "picture data")?;

        Ok(Picture {
            picture_type,
            mime_type,
            description,
            width,
            height,
            depth,
            colors,
            data,
        })
    }

    /// Get file extension based on MIME type
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/bmp" => "bmp",
            "image/tiff" => "tiff",
            // "-->" means the data is a URL
            "-->" => "url",
            _ => "bin",
        }
    }
}

fn truncated(what: &str) -> MetadataError {
    MetadataError::MalformedPicture(format!("{} runs past the end of the block", what))
}

fn read_field(cursor: &mut Cursor<&[u8]>, what: &str) -> Result<u32> {
    read_be_u32(cursor).map_err(|_| truncated(what))
}

fn read_sized(cursor: &mut Cursor<&[u8]>, total: usize, what: &str) -> Result<Vec<u8>> {
    let len = read_field(cursor, what)? as usize;
    if len > total - cursor.position() as usize {
        return Err(truncated(what));
    }
    read_bytes(cursor, len).map_err(|_| truncated(what))
}

#[cfg(test)]
pub(crate) fn encode_payload(picture: &Picture) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&picture.picture_type.code().to_be_bytes());
    out.extend_from_slice(&(picture.mime_type.len() as u32).to_be_bytes());
    out.extend_from_slice(picture.mime_type.as_bytes());
    out.extend_from_slice(&(picture.description.len() as u32).to_be_bytes());
    out.extend_from_slice(picture.description.as_bytes());
    for value in [picture.width, picture.height, picture.depth, picture.colors] {
        out.extend_from_slice(&value.to_be_bytes());
    }
    out.extend_from_slice(&(picture.data.len() as u32).to_be_bytes());
    out.extend_from_slice(&picture.data);
    out
}
