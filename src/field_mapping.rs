// Unified metadata field mapping
//
// Vorbis comment keys are free-form; this maps the common ones onto the
// fixed set of fields the uniform `AudioMetadata` view exposes, and parses
// the value conventions (dates, "n/m" positions) found in the wild.

/// Standard metadata fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardField {
    Title,
    Artist,
    Album,
    AlbumArtist,
    Composer,
    Year,
    Genre,
    Track,
    TrackTotal,
    Disc,
    DiscTotal,
    Comment,
}

impl StandardField {
    /// Vorbis comment keys for this field, preferred key first
    pub fn vorbis_keys(&self) -> &'static [&'static str] {
        match self {
            StandardField::Title => &["TITLE"],
            StandardField::Artist => &["ARTIST"],
            StandardField::Album => &["ALBUM"],
            StandardField::AlbumArtist => &["ALBUMARTIST", "ALBUM ARTIST"],
            StandardField::Composer => &["COMPOSER"],
            StandardField::Year => &["DATE", "YEAR", "ORIGINALDATE"],
            StandardField::Genre => &["GENRE"],
            StandardField::Track => &["TRACKNUMBER"],
            StandardField::TrackTotal => &["TRACKTOTAL", "TOTALTRACKS"],
            StandardField::Disc => &["DISCNUMBER"],
            StandardField::DiscTotal => &["DISCTOTAL", "TOTALDISCS"],
            StandardField::Comment => &["COMMENT", "DESCRIPTION"],
        }
    }

    /// Convert Vorbis Comment key to standard field
    pub fn from_vorbis(key: &str) -> Option<Self> {
        let key = key.to_ascii_uppercase();
        ALL_FIELDS
            .iter()
            .copied()
            .find(|field| field.vorbis_keys().contains(&key.as_str()))
    }
}

const ALL_FIELDS: [StandardField; 12] = [
    StandardField::Title,
    StandardField::Artist,
    StandardField::Album,
    StandardField::AlbumArtist,
    StandardField::Composer,
    StandardField::Year,
    StandardField::Genre,
    StandardField::Track,
    StandardField::TrackTotal,
    StandardField::Disc,
    StandardField::DiscTotal,
    StandardField::Comment,
];

/// Metadata value converter for handling format-specific value formats
pub struct ValueConverter;

impl ValueConverter {
    /// Leading four-digit year of a date ("2024-01-15" -> 2024)
    pub fn parse_year(value: &str) -> Option<u16> {
        let value = value.trim();
        let digits = value.get(..4)?;
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// Split a position such as "3/12" into (3, Some(12)).
    /// A bare number yields no total; zero is treated as absent.
    pub fn parse_position(value: &str) -> (Option<u32>, Option<u32>) {
        let mut parts = value.trim().splitn(2, '/');
        let number = parts
            .next()
            .and_then(|n| n.trim().parse().ok())
            .filter(|&n| n > 0);
        let total = parts
            .next()
            .and_then(|n| n.trim().parse().ok())
            .filter(|&n| n > 0);
        (number, total)
    }
}
