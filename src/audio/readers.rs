// Concrete metadata readers registered in the capability table

use std::io::{BufReader, SeekFrom};

use crate::codec::Codec;
use crate::error::{MetadataError, Result};
use crate::flac::{self, ReadOptions};
use crate::id3::Id3v1Tag;

use super::metadata::AudioMetadata;
use super::table::{MediaSource, MetadataReader};

/// FLAC metadata blocks
#[derive(Debug, Default, Clone, Copy)]
pub struct FlacReader {
    options: ReadOptions,
}

impl FlacReader {
    pub fn new(options: ReadOptions) -> Self {
        FlacReader { options }
    }
}

impl MetadataReader for FlacReader {
    fn codec(&self) -> Codec {
        Codec::Flac
    }

    fn read_metadata(&self, source: &mut dyn MediaSource, file_size: u64) -> Result<AudioMetadata> {
        source.seek(SeekFrom::Start(0))?;
        let flac = flac::read_metadata_with(&mut BufReader::new(source), self.options)?;
        if flac.stream_info().is_none() {
            return Err(MetadataError::invalid("missing STREAMINFO block"));
        }
        Ok(AudioMetadata::from_flac(&flac, file_size))
    }
}

/// ID3v1 trailer, reported under the given codec
#[derive(Debug, Clone, Copy)]
pub struct Id3v1Reader {
    codec: Codec,
}

impl Id3v1Reader {
    pub fn new(codec: Codec) -> Self {
        Id3v1Reader { codec }
    }
}

impl MetadataReader for Id3v1Reader {
    fn codec(&self) -> Codec {
        self.codec
    }

    // A trailer can follow any codec, so the signature says nothing.
    fn identify(&self, header: &[u8]) -> bool {
        self.codec != Codec::Unknown && Codec::identify(header) == self.codec
    }

    fn read_metadata(&self, source: &mut dyn MediaSource, _file_size: u64) -> Result<AudioMetadata> {
        match Id3v1Tag::read(source)? {
            Some(tag) => Ok(AudioMetadata::from_id3v1(&tag, self.codec)),
            None => Err(MetadataError::Unsupported(self.codec)),
        }
    }
}
