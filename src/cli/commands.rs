// CLI command implementations
//
// Every command keeps going after a per-file failure, reports it, and
// returns how many files failed so `main` can pick the exit status.

use anyhow::{Context, Result};
use audiometa::flac::BlockSummary;
use audiometa::{AudioFile, AudioMetadata, Codec, CodecTable, ReadOptions, StreamInfo};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::output::OutputFormatter;

/// A report tagged with the file it describes
#[derive(Serialize)]
struct FileReport<'a, T: Serialize> {
    file: String,
    #[serde(flatten)]
    report: &'a T,
}

impl<'a, T: Serialize> FileReport<'a, T> {
    fn new(path: &Path, report: &'a T) -> Self {
        FileReport {
            file: path.display().to_string(),
            report,
        }
    }
}

#[derive(Serialize)]
struct DetectReport {
    codec: Codec,
    size: u64,
}

#[derive(Serialize)]
struct InfoReport {
    size: u64,
    modified: Option<String>,
    codec: Codec,
    stream_info: Option<StreamInfo>,
    duration_ms: Option<u64>,
    bitrate_kbps: Option<u32>,
    metadata_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    blocks: Option<Vec<BlockSummary>>,
}

#[derive(Serialize)]
struct ScanFailure {
    file: String,
    error: String,
}

#[derive(Serialize)]
struct ScanSummary {
    directory: String,
    pattern: String,
    matched: usize,
    succeeded: usize,
    failed: Vec<ScanFailure>,
}

fn read_file(path: &Path, table: &CodecTable, pictures: bool) -> Result<AudioMetadata> {
    let audio = AudioFile::open(path, table)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut metadata = audio
        .read_metadata()
        .with_context(|| format!("failed to read {}", path.display()))?;
    if pictures {
        metadata.embed_picture_data();
    }
    Ok(metadata)
}

/// Read metadata from files
pub fn command_read(
    files: &[PathBuf],
    pictures: bool,
    table: &CodecTable,
    formatter: &OutputFormatter,
    out: &mut dyn Write,
) -> Result<usize> {
    let mut failures = 0;
    for path in files {
        match read_file(path, table, pictures) {
            Ok(metadata) => formatter.output(&FileReport::new(path, &metadata), out)?,
            Err(err) => {
                formatter.print_error(&format!("{:#}", err));
                failures += 1;
            }
        }
    }
    Ok(failures)
}

/// Detect file format
pub fn command_detect(
    files: &[PathBuf],
    table: &CodecTable,
    formatter: &OutputFormatter,
    out: &mut dyn Write,
) -> Result<usize> {
    let mut failures = 0;
    for path in files {
        match AudioFile::open(path, table) {
            Ok(audio) => {
                let report = DetectReport {
                    codec: audio.codec(),
                    size: audio.file_size(),
                };
                formatter.output(&FileReport::new(path, &report), out)?;
            }
            Err(err) => {
                formatter.print_error(&format!("{}: {}", path.display(), err));
                failures += 1;
            }
        }
    }
    Ok(failures)
}

fn file_info(path: &Path, table: &CodecTable, blocks: bool) -> Result<InfoReport> {
    let modified = std::fs::metadata(path)
        .with_context(|| format!("failed to stat {}", path.display()))?
        .modified()
        .ok()
        .map(|time| {
            DateTime::<Utc>::from(time)
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string()
        });

    let audio = AudioFile::open(path, table)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut report = InfoReport {
        size: audio.file_size(),
        modified,
        codec: audio.codec(),
        stream_info: None,
        duration_ms: None,
        bitrate_kbps: None,
        metadata_bytes: None,
        blocks: None,
    };

    if audio.codec() == Codec::Flac {
        let flac = audio
            .read_flac(ReadOptions::stream_info_only())
            .with_context(|| format!("failed to read {}", path.display()))?;
        report.stream_info = flac.stream_info().cloned();
        report.duration_ms = flac.duration().map(|d| d.as_millis() as u64);
        report.bitrate_kbps = flac.estimated_bitrate(audio.file_size());
        report.metadata_bytes = Some(flac.total_metadata_bytes());
        if blocks {
            report.blocks = Some(flac.blocks().to_vec());
        }
    }
    Ok(report)
}

/// Show detailed file information
pub fn command_info(
    files: &[PathBuf],
    blocks: bool,
    table: &CodecTable,
    formatter: &OutputFormatter,
    out: &mut dyn Write,
) -> Result<usize> {
    let mut failures = 0;
    for path in files {
        match file_info(path, table, blocks) {
            Ok(report) => formatter.output(&FileReport::new(path, &report), out)?,
            Err(err) => {
                formatter.print_error(&format!("{:#}", err));
                failures += 1;
            }
        }
    }
    Ok(failures)
}

/// Read every file under `directory` matching `pattern`
pub fn command_scan(
    directory: &Path,
    pattern: &str,
    table: &CodecTable,
    formatter: &OutputFormatter,
    out: &mut dyn Write,
) -> Result<usize> {
    let glob_pattern = directory.join(pattern).to_string_lossy().into_owned();

    let mut files = Vec::new();
    for entry in glob::glob(&glob_pattern).with_context(|| format!("invalid pattern {}", pattern))? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(err) => formatter.print_error(&format!("error reading path: {}", err)),
        }
    }

    if files.is_empty() {
        formatter.print_info("No files found matching pattern");
    } else {
        formatter.print_info(&format!("Processing {} files...", files.len()));
    }

    let mut summary = ScanSummary {
        directory: directory.display().to_string(),
        pattern: pattern.to_string(),
        matched: files.len(),
        succeeded: 0,
        failed: Vec::new(),
    };
    for path in &files {
        match read_file(path, table, false) {
            Ok(_) => {
                formatter.print_success(&path.display().to_string());
                summary.succeeded += 1;
            }
            Err(err) => {
                formatter.print_error(&format!("{:#}", err));
                summary.failed.push(ScanFailure {
                    file: path.display().to_string(),
                    error: format!("{:#}", err),
                });
            }
        }
    }

    formatter.print_info(&format!(
        "Completed: {} successful, {} errors",
        summary.succeeded,
        summary.failed.len()
    ));
    formatter.output(&summary, out)?;
    Ok(summary.failed.len())
}
