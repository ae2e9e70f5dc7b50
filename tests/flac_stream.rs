//! Metadata-section decoding through the public API.
//!
//! Streams are assembled byte by byte here so the tests do not depend on any
//! encoder living in the library.

use std::io::{Cursor, Read};
use std::time::Duration;

use audiometa::flac::{self, BlockHeader, BlockType, PictureType, ReadOptions};
use audiometa::MetadataError;

// 44.1 kHz, stereo, 16 bit, 16536 samples
const STREAMINFO: [u8; 34] = [
    0x10, 0x00, 0x10, 0x00, 0x00, 0x01, 0x53, 0x00, 0x23, 0x30, 0x0a, 0xc4, 0x42, 0xf0, 0x00, 0x00,
    0x40, 0x98, 0xce, 0x88, 0xff, 0xfb, 0xa6, 0x6d, 0x96, 0x2c, 0x99, 0xbd, 0xd8, 0x09, 0xc7, 0x3d,
    0x4d, 0x18,
];

fn header(is_last: bool, code: u8, length: u32) -> [u8; 4] {
    let raw = (u32::from(is_last) << 31) | (u32::from(code) << 24) | length;
    raw.to_be_bytes()
}

/// Marker plus blocks; the last block gets the last flag
fn stream(blocks: &[(u8, &[u8])]) -> Vec<u8> {
    let mut out = b"fLaC".to_vec();
    for (index, (code, payload)) in blocks.iter().enumerate() {
        out.extend_from_slice(&header(index + 1 == blocks.len(), *code, payload.len() as u32));
        out.extend_from_slice(payload);
    }
    out
}

fn vorbis_payload(vendor: &str, comments: &[&str]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
    out.extend_from_slice(vendor.as_bytes());
    out.extend_from_slice(&(comments.len() as u32).to_le_bytes());
    for comment in comments {
        out.extend_from_slice(&(comment.len() as u32).to_le_bytes());
        out.extend_from_slice(comment.as_bytes());
    }
    out
}

fn picture_payload(picture_type: u32, mime: &str, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&picture_type.to_be_bytes());
    out.extend_from_slice(&(mime.len() as u32).to_be_bytes());
    out.extend_from_slice(mime.as_bytes());
    out.extend_from_slice(&0u32.to_be_bytes());
    for field in [300u32, 300, 24, 0] {
        out.extend_from_slice(&field.to_be_bytes());
    }
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(data);
    out
}

#[test]
fn byte_count_matches_audio_offset() {
    let tags = vorbis_payload("test encoder", &["TITLE=One", "artist=Two"]);
    let padding = [0u8; 100];
    let mut bytes = stream(&[(0, &STREAMINFO[..]), (4, &tags[..]), (1, &padding[..])]);
    let audio_offset = bytes.len() as u64;
    bytes.extend_from_slice(&[0xFF, 0xF8, 0x69, 0x08]);

    let metadata = flac::read_metadata(&mut Cursor::new(&bytes)).expect("valid stream");
    let expected = 4 + (4 + 34) + (4 + tags.len() as u64) + (4 + 100);
    assert_eq!(metadata.total_metadata_bytes(), expected);
    assert_eq!(metadata.total_metadata_bytes(), audio_offset);
    assert_eq!(&bytes[audio_offset as usize..][..2], &[0xFF, 0xF8]);
}

#[test]
fn stops_at_last_block_and_leaves_trailing_bytes() {
    let mut bytes = stream(&[(0, &STREAMINFO[..])]);
    bytes.extend_from_slice(b"audio frames follow");
    let mut cursor = Cursor::new(bytes);

    flac::read_metadata(&mut cursor).expect("valid stream");
    assert_eq!(cursor.position(), 42);

    let mut rest = String::new();
    cursor.read_to_string(&mut rest).expect("trailing bytes");
    assert_eq!(rest, "audio frames follow");
}

#[test]
fn header_examples() {
    let header = BlockHeader::read(&mut Cursor::new([0x00u8, 0x00, 0x00, 0x22])).expect("header");
    assert!(!header.is_last);
    assert_eq!(header.block_type, BlockType::StreamInfo);
    assert_eq!(header.length, 34);

    let header = BlockHeader::read(&mut Cursor::new([0x80u8, 0x00, 0x00, 0x00])).expect("header");
    assert!(header.is_last);
    assert_eq!(header.block_type, BlockType::StreamInfo);
    assert_eq!(header.length, 0);

    let short = BlockHeader::read(&mut Cursor::new([0x80u8, 0x00, 0x00]));
    assert!(matches!(short, Err(MetadataError::UnexpectedEnd)));
}

#[test]
fn marker_must_be_exact() {
    let mut bytes = stream(&[(0, &STREAMINFO[..])]);
    bytes[..4].copy_from_slice(b"FLAC");
    let result = flac::read_metadata(&mut Cursor::new(bytes));
    assert!(matches!(result, Err(MetadataError::StreamInvalid(_))));

    let result = flac::read_metadata(&mut Cursor::new(b"fLa"));
    assert!(matches!(result, Err(MetadataError::UnexpectedEnd)));
}

#[test]
fn unknown_block_is_skipped() {
    let unknown = [0xAAu8; 10];
    let tags = vorbis_payload("vendor", &["GENRE=Trip hop"]);
    let bytes = stream(&[(0, &STREAMINFO[..]), (100, &unknown[..]), (4, &tags[..])]);

    let metadata = flac::read_metadata(&mut Cursor::new(bytes)).expect("valid stream");
    assert_eq!(metadata.tag("genre"), Some("Trip hop"));
    let types: Vec<BlockType> = metadata.blocks().iter().map(|b| b.block_type).collect();
    assert_eq!(
        types,
        vec![BlockType::StreamInfo, BlockType::Unknown(100), BlockType::VorbisComment]
    );
}

#[test]
fn reserved_block_type_fails_whatever_its_length() {
    for length in [0u32, 10, 0xFF_FFFF] {
        let mut bytes = stream(&[(0, &STREAMINFO[..])]);
        // clear the last flag on STREAMINFO, then append the reserved header
        bytes[4] &= 0x7F;
        bytes.extend_from_slice(&header(true, 127, length));
        let result = flac::read_metadata(&mut Cursor::new(bytes));
        assert!(matches!(result, Err(MetadataError::StreamInvalid(_))), "length {}", length);
    }
}

#[test]
fn missing_last_flag_is_unexpected_end() {
    let mut bytes = stream(&[(0, &STREAMINFO[..])]);
    bytes[4] &= 0x7F;
    let result = flac::read_metadata(&mut Cursor::new(bytes));
    assert!(matches!(result, Err(MetadataError::UnexpectedEnd)));
}

#[test]
fn duration_and_bitrate() {
    let bytes = stream(&[(0, &STREAMINFO[..])]);
    let metadata = flac::read_metadata(&mut Cursor::new(bytes)).expect("valid stream");
    assert_eq!(
        metadata.duration(),
        Some(Duration::from_nanos(16536 * 1_000_000_000 / 44100))
    );
    // 46_875 audio bytes over 0.375 s is 1000 kbit/s
    assert_eq!(metadata.estimated_bitrate(42 + 46_875), Some(1000));
    assert_eq!(metadata.estimated_bitrate(42), None);
}

#[test]
fn zero_sample_rate_has_unknown_duration() {
    let mut info = STREAMINFO;
    // sample rate occupies the top 20 bits of byte 10..
    info[10] = 0;
    info[11] = 0;
    info[12] &= 0x0F;
    let bytes = stream(&[(0, &info[..])]);
    let metadata = flac::read_metadata(&mut Cursor::new(bytes)).expect("valid stream");
    assert_eq!(metadata.stream_info().map(|s| s.sample_rate), Some(0));
    assert_eq!(metadata.duration(), None);
    assert_eq!(metadata.estimated_bitrate(1_000_000), None);
}

#[test]
fn tags_and_pictures() {
    let tags = vorbis_payload(
        "reference libFLAC 1.4.3",
        &["TITLE=Angel", "Artist=Massive Attack", "ARTIST=Horace Andy"],
    );
    let cover = picture_payload(3, "image/jpeg", &[0xFF, 0xD8, 0xFF]);
    let bytes = stream(&[(0, &STREAMINFO[..]), (4, &tags[..]), (6, &cover[..])]);

    let metadata = flac::read_metadata(&mut Cursor::new(bytes)).expect("valid stream");
    assert_eq!(metadata.vendor(), Some("reference libFLAC 1.4.3"));
    assert_eq!(metadata.tag("Title"), Some("Angel"));
    assert_eq!(
        metadata.tag_values("artist").map(|v| v.len()),
        Some(2)
    );

    let front = metadata.front_cover().expect("front cover");
    assert_eq!(front.picture_type, PictureType::CoverFront);
    assert_eq!(front.mime_type, "image/jpeg");
    assert_eq!(front.extension(), "jpg");
    assert_eq!(front.data, vec![0xFF, 0xD8, 0xFF]);
}

#[test]
fn stream_info_only_skips_payload_decoders() {
    let cover = picture_payload(3, "image/png", &[1, 2, 3]);
    let tags = vorbis_payload("vendor", &["TITLE=x"]);
    let bytes = stream(&[(0, &STREAMINFO[..]), (4, &tags[..]), (6, &cover[..])]);

    let full = flac::read_metadata(&mut Cursor::new(&bytes)).expect("valid stream");
    let lean = flac::read_metadata_with(&mut Cursor::new(&bytes), ReadOptions::stream_info_only())
        .expect("valid stream");
    assert!(lean.tags().is_empty());
    assert!(lean.pictures().is_empty());
    assert_eq!(lean.total_metadata_bytes(), full.total_metadata_bytes());
    assert_eq!(lean.blocks(), full.blocks());
}

#[test]
fn malformed_tag_vector() {
    let mut tags = vorbis_payload("vendor", &["TITLE=x"]);
    // claim a longer comment than the block holds
    let last = tags.len() - 7 - 4;
    tags[last..last + 4].copy_from_slice(&200u32.to_le_bytes());
    let bytes = stream(&[(0, &STREAMINFO[..]), (4, &tags[..])]);
    let result = flac::read_metadata(&mut Cursor::new(bytes));
    assert!(matches!(result, Err(MetadataError::MalformedTagVector(_))));
}
