//! Reading a source dump from disk.
//!
//! Compressed dumps are decompressed on the fly based on their extension.
//! The whole document is returned as one string because the translator works
//! on complete text.

use crate::progress::{ProgressFn, ProgressReader};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Compression format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
    Xz,
    Zstd,
}

impl Compression {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("gz" | "gzip") => Compression::Gzip,
            Some("bz2" | "bzip2") => Compression::Bzip2,
            Some("xz" | "lzma") => Compression::Xz,
            Some("zst" | "zstd") => Compression::Zstd,
            _ => Compression::None,
        }
    }

    /// Wrap a reader with the matching decompressor.
    pub fn wrap_reader<'a>(&self, reader: Box<dyn Read + 'a>) -> io::Result<Box<dyn Read + 'a>> {
        Ok(match self {
            Compression::None => reader,
            Compression::Gzip => Box::new(flate2::read::GzDecoder::new(reader)),
            Compression::Bzip2 => Box::new(bzip2::read::BzDecoder::new(reader)),
            Compression::Xz => Box::new(xz2::read::XzDecoder::new(reader)),
            Compression::Zstd => Box::new(zstd::stream::read::Decoder::new(reader)?),
        })
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compression::None => write!(f, "none"),
            Compression::Gzip => write!(f, "gzip"),
            Compression::Bzip2 => write!(f, "bzip2"),
            Compression::Xz => write!(f, "xz"),
            Compression::Zstd => write!(f, "zstd"),
        }
    }
}

/// Read the dump at `path` into a string.
///
/// `on_progress` receives the number of compressed bytes consumed so far.
/// Invalid UTF-8 is replaced rather than rejected.
pub fn read_source(path: &Path, on_progress: Option<ProgressFn>) -> io::Result<String> {
    let file = File::open(path)?;
    let raw: Box<dyn Read> = match on_progress {
        Some(callback) => Box::new(ProgressReader::new(file, callback)),
        None => Box::new(file),
    };

    let compression = Compression::from_path(path);
    tracing::debug!(path = %path.display(), %compression, "reading source dump");

    let mut reader = compression.wrap_reader(raw)?;
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}
