// ID3v1 tag implementation

use std::io::{Read, Seek, SeekFrom};

use crate::error::Result;
use crate::utils::encoding::{decode_fixed_field, TextEncoding};
use crate::utils::io::read_exact_array;

/// Genres as listed by the ID3v1 specification plus the Winamp extensions
const GENRES: [&str; 126] = [
    "Blues", "Classic Rock", "Country", "Dance", "Disco", "Funk", "Grunge",
    "Hip-Hop", "Jazz", "Metal", "New Age", "Oldies", "Other", "Pop", "R&B",
    "Rap", "Reggae", "Rock", "Techno", "Industrial", "Alternative", "Ska",
    "Death Metal", "Pranks", "Soundtrack", "Euro-Techno", "Ambient",
    "Trip-Hop", "Vocal", "Jazz+Funk", "Fusion", "Trance", "Classical",
    "Instrumental", "Acid", "House", "Game", "Sound Clip", "Gospel",
    "Noise", "AlternRock", "Bass", "Soul", "Punk", "Space", "Meditative",
    "Instrumental Pop", "Instrumental Rock", "Ethnic", "Gothic",
    "Darkwave", "Techno-Industrial", "Electronic", "Pop-Folk",
    "Eurodance", "Dream", "Southern Rock", "Comedy", "Cult", "Gangsta",
    "Top 40", "Christian Rap", "Pop/Funk", "Jungle", "Native American",
    "Cabaret", "New Wave", "Psychadelic", "Rave", "Showtunes", "Trailer",
    "Lo-Fi", "Tribal", "Acid Punk", "Acid Jazz", "Polka", "Retro",
    "Musical", "Rock & Roll", "Hard Rock", "Folk", "Folk-Rock",
    "National Folk", "Swing", "Fast Fusion", "Bebob", "Latin", "Revival",
    "Celtic", "Bluegrass", "Avantgarde", "Gothic Rock", "Progressive Rock",
    "Psychedelic Rock", "Symphonic Rock", "Slow Rock", "Big Band",
    "Chorus", "Easy Listening", "Acoustic", "Humour", "Speech", "Chanson",
    "Opera", "Chamber Music", "Sonata", "Symphony", "Booty Bass", "Primus",
    "Porn Groove", "Satire", "Slow Jam", "Club", "Tango", "Samba",
    "Folklore", "Ballad", "Power Ballad", "Rhythmic Soul", "Freestyle",
    "Duet", "Punk Rock", "Drum Solo", "Acapella", "Euro-House", "Dance Hall",
];

/// ID3v1 tag structure
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Id3v1Tag {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: Option<u16>,
    pub comment: String,
    /// Only present in ID3v1.1 tags
    pub track: Option<u8>,
    pub genre: Option<&'static str>,
}

impl Id3v1Tag {
    pub const TAG_SIZE: usize = 128;
    const TAG_ID: [u8; 3] = [b'T', b'A', b'G'];

    /// Read the trailing 128-byte tag.
    ///
    /// Seeks once to 128 bytes before the end. Returns `Ok(None)` when the
    /// source is too short or the trailer does not start with `TAG`.
    pub fn read<R: Read + Seek + ?Sized>(reader: &mut R) -> Result<Option<Self>> {
        let size = reader.seek(SeekFrom::End(0))?;
        if size < Self::TAG_SIZE as u64 {
            return Ok(None);
        }

        reader.seek(SeekFrom::End(-(Self::TAG_SIZE as i64)))?;
        let buffer: [u8; Self::TAG_SIZE] = read_exact_array(reader)?;

        // Check for TAG identifier
        if buffer[0..3] != Self::TAG_ID {
            return Ok(None);
        }

        Ok(Some(Self::parse(&buffer)))
    }

    /// Parse ID3v1 tag from buffer
    fn parse(buffer: &[u8; 128]) -> Self {
        let text = |range: std::ops::Range<usize>| decode_fixed_field(&buffer[range], TextEncoding::Latin1);

        // ID3v1.1 steals the last two comment bytes for a zero and the track
        let (comment, track) = if buffer[125] == 0 && buffer[126] != 0 {
            (text(97..125), Some(buffer[126]))
        } else {
            (text(97..127), None)
        };

        Id3v1Tag {
            title: text(3..33),
            artist: text(33..63),
            album: text(63..93),
            year: text(93..97).parse().ok(),
            comment,
            track,
            genre: GENRES.get(buffer[127] as usize).copied(),
        }
    }
}
