// Metadata façade: open a file, identify its codec, dispatch to a reader

pub mod metadata;
pub mod readers;
pub mod table;

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::codec::Codec;
use crate::error::{MetadataError, Result};
use crate::flac::{self, FlacMetadata, ReadOptions};

pub use metadata::{AudioMetadata, PictureSummary, TagSource};
pub use readers::{FlacReader, Id3v1Reader};
pub use table::{CodecTable, CodecTableBuilder, MediaSource, MetadataReader};

/// An audio file on disk, identified but not yet decoded
pub struct AudioFile<'t> {
    path: PathBuf,
    codec: Codec,
    file_size: u64,
    table: &'t CodecTable,
}

impl<'t> AudioFile<'t> {
    /// Open `path` and identify its codec from the leading bytes.
    pub fn open<P: AsRef<Path>>(path: P, table: &'t CodecTable) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path)?;
        let file_size = file.metadata()?.len();

        let mut header = Vec::with_capacity(Codec::SIGNATURE_LEN);
        (&mut file)
            .take(Codec::SIGNATURE_LEN as u64)
            .read_to_end(&mut header)?;
        let codec = table.identify(&header);
        debug!("{}: identified as {}", path.display(), codec);

        Ok(AudioFile {
            path,
            codec,
            file_size,
            table,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Read the uniform metadata view.
    ///
    /// The codec's own reader runs first. When there is none, or it fails
    /// with a format error, the table's fallback reader gets a turn; if that
    /// fails too, the first error is returned.
    pub fn read_metadata(&self) -> Result<AudioMetadata> {
        let mut file = File::open(&self.path)?;

        let primary = match self.table.reader(self.codec) {
            Some(reader) => match reader.read_metadata(&mut file, self.file_size) {
                Ok(metadata) => return Ok(metadata),
                Err(err) if err.is_format_error() => {
                    warn!("{}: {} reader failed: {}", self.path.display(), self.codec, err);
                    err
                }
                Err(err) => return Err(err),
            },
            None => MetadataError::Unsupported(self.codec),
        };

        let Some(fallback) = self.table.fallback() else {
            return Err(primary);
        };
        match fallback.read_metadata(&mut file, self.file_size) {
            Ok(mut metadata) => {
                debug!("{}: using fallback tags", self.path.display());
                metadata.codec = self.codec;
                Ok(metadata)
            }
            Err(err) if err.is_format_error() => Err(primary),
            Err(err) => Err(err),
        }
    }

    /// Decode the FLAC metadata section directly, for callers that want the
    /// block inventory or raw tags rather than the uniform view.
    pub fn read_flac(&self, options: ReadOptions) -> Result<FlacMetadata> {
        if self.codec != Codec::Flac {
            return Err(MetadataError::Unsupported(self.codec));
        }
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(0))?;
        flac::read_metadata_with(&mut BufReader::new(file), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flac::tests::{build_stream, stream_info_block};
    use crate::id3::v1::tests::trailer;
    use std::io::Write;

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn reads_flac() {
        let table = CodecTable::default();
        let file = write_temp(&build_stream(&[stream_info_block()]));
        let audio = AudioFile::open(file.path(), &table).unwrap();
        assert_eq!(audio.codec(), Codec::Flac);

        let metadata = audio.read_metadata().unwrap();
        assert_eq!(metadata.tag_source, TagSource::None);
        assert_eq!(metadata.metadata_bytes, Some(42));
        assert_eq!(metadata.duration_ms, Some(374));
    }

    #[test]
    fn broken_flac_falls_back_to_trailer() {
        let table = CodecTable::default();
        // Reserved block type 127 right after the marker
        let mut bytes = build_stream(&[(127, vec![0u8; 8])]);
        bytes.extend_from_slice(&trailer("Fallback", "Someone", None, 0));
        let file = write_temp(&bytes);

        let audio = AudioFile::open(file.path(), &table).unwrap();
        let metadata = audio.read_metadata().unwrap();
        assert_eq!(metadata.codec, Codec::Flac);
        assert_eq!(metadata.tag_source, TagSource::Id3v1);
        assert_eq!(metadata.title.as_deref(), Some("Fallback"));
        assert_eq!(metadata.genre.as_deref(), Some("Blues"));
    }

    #[test]
    fn broken_flac_without_trailer_keeps_first_error() {
        let table = CodecTable::default();
        let file = write_temp(&build_stream(&[(127, vec![0u8; 8])]));
        let audio = AudioFile::open(file.path(), &table).unwrap();
        assert!(matches!(audio.read_metadata(), Err(MetadataError::StreamInvalid(_))));
    }

    #[test]
    fn unregistered_codec() {
        let table = CodecTable::default();
        let mut bytes = b"OggS".to_vec();
        bytes.extend_from_slice(&[0u8; 200]);
        let file = write_temp(&bytes);
        let audio = AudioFile::open(file.path(), &table).unwrap();
        assert_eq!(audio.codec(), Codec::Ogg);
        assert!(matches!(
            audio.read_metadata(),
            Err(MetadataError::Unsupported(Codec::Ogg))
        ));
        assert!(matches!(
            audio.read_flac(ReadOptions::default()),
            Err(MetadataError::Unsupported(Codec::Ogg))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let table = CodecTable::default();
        let dir = tempfile::tempdir().unwrap();
        let result = AudioFile::open(dir.path().join("missing.flac"), &table);
        assert!(matches!(result, Err(MetadataError::Io(_))));
    }

    #[test]
    fn short_file_is_unknown() {
        let table = CodecTable::default();
        let file = write_temp(b"fL");
        let audio = AudioFile::open(file.path(), &table).unwrap();
        assert_eq!(audio.codec(), Codec::Unknown);
        assert_eq!(audio.file_size(), 2);
    }
}
