// Encoding utilities

use encoding_rs::{UTF_8, WINDOWS_1252};

/// Text encodings found in the tag formats we read
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextEncoding {
    /// ID3v1 fields. Decoded as Windows-1252, the superset browsers use for Latin-1.
    Latin1,
    /// Vorbis comments and FLAC picture descriptions
    Utf8,
}

/// Decode text with specified encoding, replacing malformed sequences
pub fn decode_text(data: &[u8], encoding: TextEncoding) -> String {
    match encoding {
        TextEncoding::Latin1 => WINDOWS_1252.decode(data).0.into_owned(),
        TextEncoding::Utf8 => UTF_8.decode(data).0.into_owned(),
    }
}

/// Decode a fixed-width, NUL-padded field and trim surrounding whitespace.
pub fn decode_fixed_field(data: &[u8], encoding: TextEncoding) -> String {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    decode_text(&data[..end], encoding).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_high_bytes() {
        assert_eq!(decode_text(&[0x42, 0x6a, 0xf6, 0x72, 0x6b], TextEncoding::Latin1), "Björk");
    }

    #[test]
    fn utf8_lossy() {
        assert_eq!(decode_text("Sigur Rós".as_bytes(), TextEncoding::Utf8), "Sigur Rós");
        assert_eq!(decode_text(&[0x61, 0xff], TextEncoding::Utf8), "a\u{fffd}");
    }

    #[test]
    fn fixed_field_stops_at_nul() {
        let mut field = [0u8; 30];
        field[..7].copy_from_slice(b" Title ");
        field[8] = b'x';
        assert_eq!(decode_fixed_field(&field, TextEncoding::Latin1), "Title");
    }
}
