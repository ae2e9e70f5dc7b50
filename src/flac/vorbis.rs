// VORBIS_COMMENT implementation for FLAC

use std::collections::HashMap;
use std::io::Cursor;

use crate::error::{MetadataError, Result};
use crate::utils::encoding::{decode_text, TextEncoding};
use crate::utils::io::{read_bytes, read_le_u32};

/// Decoded VORBIS_COMMENT block
///
/// Lengths inside the block are little-endian, unlike the rest of FLAC.
/// Each comment is a `NAME=value` vector; names compare case-insensitively
/// and are stored upper-cased. A name may carry several values.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct VorbisComment {
    pub vendor: String,
    pub tags: HashMap<String, Vec<String>>,
}

impl VorbisComment {
    /// Decode a complete block payload.
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(payload);

        let vendor = read_vector(&mut cursor, payload.len(), "vendor string")?;
        let count = read_le_u32(&mut cursor)
            .map_err(|_| truncated("comment count"))? as usize;

        let mut tags: HashMap<String, Vec<String>> = HashMap::new();
        for index in 0..count {
            let comment = read_vector(&mut cursor, payload.len(), "comment")?;
            let (name, value) = comment.split_once('=').ok_or_else(|| {
                MetadataError::MalformedTagVector(format!("comment {} has no '=' separator", index))
            })?;
            if !is_valid_name(name) {
                return Err(MetadataError::MalformedTagVector(format!(
                    "comment {} has an invalid field name {:?}",
                    index, name
                )));
            }
            tags.entry(name.to_ascii_uppercase())
                .or_default()
                .push(value.to_string());
        }

        let trailing = payload.len() as u64 - cursor.position();
        if trailing > 0 {
            log::debug!("{} trailing bytes after {} comments", trailing, count);
        }

        Ok(VorbisComment { vendor, tags })
    }

    /// First value for a field name, case-insensitive
    pub fn get(&self, field: &str) -> Option<&String> {
        self.get_all(field).and_then(|values| values.first())
    }

    /// All values for a field name, case-insensitive
    pub fn get_all(&self, field: &str) -> Option<&Vec<String>> {
        self.tags.get(&field.to_ascii_uppercase())
    }
}

fn truncated(what: &str) -> MetadataError {
    MetadataError::MalformedTagVector(format!("{} runs past the end of the block", what))
}

// Length-prefixed UTF-8 vector. The declared length is checked against what
// is left in the block before allocating.
fn read_vector(cursor: &mut Cursor<&[u8]>, total: usize, what: &str) -> Result<String> {
    let len = read_le_u32(cursor).map_err(|_| truncated(what))? as usize;
    let remaining = total - cursor.position() as usize;
    if len > remaining {
        return Err(truncated(what));
    }
    let bytes = read_bytes(cursor, len).map_err(|_| truncated(what))?;
    Ok(decode_text(&bytes, TextEncoding::Utf8))
}

// Field names are ASCII 0x20 through 0x7D, '=' excluded.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| (0x20..=0x7D).contains(&b) && b != b'=')
}

/// Build a tag-vector payload; used by tests across the crate.
#[cfg(test)]
pub(crate) fn encode_payload(vendor: &str, comments: &[&str]) -> Vec<u8> {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_vendor_and_tags() {
        let payload = encode_payload(
            "reference libFLAC 1.4.3 20230623",
            &["TITLE=Hyperballad", "artist=Björk", "Album=Post"],
        );
        let vc = VorbisComment::from_payload(&payload).unwrap();
        assert_eq!(vc.vendor, "reference libFLAC 1.4.3 20230623");
        assert_eq!(vc.get("TITLE").unwrap(), "Hyperballad");
        assert_eq!(vc.get("Artist").unwrap(), "Björk");
        assert_eq!(vc.get("album").unwrap(), "Post");
        assert!(vc.get("GENRE").is_none());
    }

    #[test]
    fn repeated_names_accumulate() {
        let payload = encode_payload("", &["ARTIST=A", "artist=B", "GENRE=Pop"]);
        let vc = VorbisComment::from_payload(&payload).unwrap();
        let mut artists = vc.get_all("ARTIST").unwrap().clone();
        artists.sort();
        assert_eq!(artists, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(vc.tags.len(), 2);
    }

    #[test]
    fn value_may_contain_equals() {
        let payload = encode_payload("", &["COMMENT=a=b"]);
        let vc = VorbisComment::from_payload(&payload).unwrap();
        assert_eq!(vc.get("comment").unwrap(), "a=b");
    }

    #[test]
    fn empty_comment_list() {
        let payload = encode_payload("vendor", &[]);
        let vc = VorbisComment::from_payload(&payload).unwrap();
        assert!(vc.tags.is_empty());
    }

    #[test]
    fn missing_separator_is_malformed() {
        let payload = encode_payload("", &["NOSEPARATOR"]);
        assert!(matches!(
            VorbisComment::from_payload(&payload),
            Err(MetadataError::MalformedTagVector(_))
        ));
    }

    #[test]
    fn length_past_block_is_malformed() {
        let mut payload = encode_payload("", &["TITLE=x"]);
        payload.truncate(payload.len() - 3);
        assert!(matches!(
            VorbisComment::from_payload(&payload),
            Err(MetadataError::MalformedTagVector(_))
        ));

        // count claims more comments than present
        let mut payload = encode_payload("", &[]);
        let len = payload.len();
        payload[len - 4..].copy_from_slice(&5u32.to_le_bytes());
        assert!(VorbisComment::from_payload(&payload).is_err());
    }

    #[test]
    fn huge_declared_length_does_not_allocate() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            VorbisComment::from_payload(&payload),
            Err(MetadataError::MalformedTagVector(_))
        ));
    }
}
