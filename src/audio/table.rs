// Capability table: which reader handles which codec

use std::io::{Read, Seek};

use crate::codec::Codec;
use crate::error::Result;

use super::metadata::AudioMetadata;
use super::readers::{FlacReader, Id3v1Reader};

/// Anything a reader can pull metadata from
pub trait MediaSource: Read + Seek {}

impl<T: Read + Seek> MediaSource for T {}

/// Per-codec metadata reader
pub trait MetadataReader: Send + Sync {
    fn codec(&self) -> Codec;

    /// Whether the leading bytes of a file belong to this reader's codec
    fn identify(&self, header: &[u8]) -> bool {
        Codec::identify(header) == self.codec()
    }

    /// Read metadata from a source positioned anywhere; readers seek to
    /// where they need to be. `file_size` is the total length of the source.
    fn read_metadata(&self, source: &mut dyn MediaSource, file_size: u64) -> Result<AudioMetadata>;
}

/// Immutable mapping from codec to reader, built once and passed to
/// [`AudioFile`](super::AudioFile).
pub struct CodecTable {
    readers: Vec<Box<dyn MetadataReader>>,
    fallback: Option<Box<dyn MetadataReader>>,
}

impl CodecTable {
    pub fn builder() -> CodecTableBuilder {
        CodecTableBuilder::default()
    }

    /// Reader registered for a codec
    pub fn reader(&self, codec: Codec) -> Option<&dyn MetadataReader> {
        self.readers
            .iter()
            .find(|reader| reader.codec() == codec)
            .map(|reader| reader.as_ref())
    }

    /// Reader tried when the codec's own reader is missing or fails
    pub fn fallback(&self) -> Option<&dyn MetadataReader> {
        self.fallback.as_deref()
    }

    /// Identify a file from its leading bytes. Registered readers are asked
    /// in registration order; signatures nobody claims still get a name.
    pub fn identify(&self, header: &[u8]) -> Codec {
        self.readers
            .iter()
            .find(|reader| reader.identify(header))
            .map(|reader| reader.codec())
            .unwrap_or_else(|| Codec::identify(header))
    }

    pub fn codecs(&self) -> impl Iterator<Item = Codec> + '_ {
        self.readers.iter().map(|reader| reader.codec())
    }
}

impl Default for CodecTable {
    /// FLAC metadata blocks, ID3v1 trailers for MP3, and ID3v1 as fallback
    fn default() -> Self {
        CodecTable::builder()
            .register(FlacReader::default())
            .register(Id3v1Reader::new(Codec::Mp3))
            .fallback(Id3v1Reader::new(Codec::Unknown))
            .build()
    }
}

#[derive(Default)]
pub struct CodecTableBuilder {
    readers: Vec<Box<dyn MetadataReader>>,
    fallback: Option<Box<dyn MetadataReader>>,
}

impl CodecTableBuilder {
    /// Add a reader. A later registration for the same codec replaces the
    /// earlier one.
    pub fn register<R: MetadataReader + 'static>(mut self, reader: R) -> Self {
        let codec = reader.codec();
        self.readers.retain(|existing| existing.codec() != codec);
        self.readers.push(Box::new(reader));
        self
    }

    pub fn fallback<R: MetadataReader + 'static>(mut self, reader: R) -> Self {
        self.fallback = Some(Box::new(reader));
        self
    }

    pub fn build(self) -> CodecTable {
        CodecTable {
            readers: self.readers,
            fallback: self.fallback,
        }
    }
}
