// Codec identification from file signatures

use std::fmt;

use serde::Serialize;

/// Container/codec families we can recognise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Codec {
    Flac,
    Mp3,
    Ogg,
    Opus,
    M4a,
    Wav,
    Unknown,
}

impl Codec {
    /// Bytes needed from the start of a file for [`Codec::identify`]
    pub const SIGNATURE_LEN: usize = 36;

    /// Identify the codec from the first bytes of a file.
    ///
    /// | Codec | Signature                                   |
    /// |-------|---------------------------------------------|
    /// | FLAC  | `fLaC`                                      |
    /// | MP3   | `ID3`, or an MPEG frame sync (0xFFE)        |
    /// | Opus  | `OggS` page carrying an `OpusHead` packet   |
    /// | Ogg   | any other `OggS` page                       |
    /// | M4A   | `ftyp` box at offset 4                      |
    /// | WAV   | `RIFF` .... `WAVE`                          |
    pub fn identify(header: &[u8]) -> Codec {
        if header.starts_with(b"fLaC") {
            return Codec::Flac;
        }
        if header.starts_with(b"ID3") {
            return Codec::Mp3;
        }
        if header.len() >= 2 && header[0] == 0xFF && header[1] & 0xE0 == 0xE0 {
            return Codec::Mp3;
        }
        if header.starts_with(b"OggS") {
            // first page: 27-byte header + one-entry segment table
            if header.len() >= 36 && &header[28..36] == b"OpusHead" {
                return Codec::Opus;
            }
            return Codec::Ogg;
        }
        if header.len() >= 8 && &header[4..8] == b"ftyp" {
            return Codec::M4a;
        }
        if header.len() >= 12 && header.starts_with(b"RIFF") && &header[8..12] == b"WAVE" {
            return Codec::Wav;
        }
        Codec::Unknown
    }

    pub fn name(&self) -> &'static str {
        match self {
            Codec::Flac => "FLAC",
            Codec::Mp3 => "MP3",
            Codec::Ogg => "OGG",
            Codec::Opus => "OPUS",
            Codec::M4a => "M4A",
            Codec::Wav => "WAV",
            Codec::Unknown => "?",
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
