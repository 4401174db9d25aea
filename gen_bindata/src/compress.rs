//! Parallel compression of source files into temporary artifacts.
use std::{
    fmt,
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    num::NonZeroUsize,
    ops::RangeInclusive,
    path::{Path, PathBuf},
    str::FromStr,
    thread,
};

use flate2::{Compression, GzBuilder};
use rayon::prelude::*;
use tempfile::NamedTempFile;

use crate::{Error, Result, collect::SourceFile};

/// Stream compressor applied to every asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Codec {
    /// gzip, through `flate2`.
    #[default]
    Gzip,
    /// Zstandard.
    Zstd,
}

impl Codec {
    /// Suffix appended to asset names to mark them as compressed.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Gzip => ".gz",
            Self::Zstd => ".zst",
        }
    }

    /// Levels accepted by this codec.
    pub fn level_range(self) -> RangeInclusive<i32> {
        match self {
            Self::Gzip => 0..=9,
            Self::Zstd => zstd::compression_level_range(),
        }
    }

    /// Returns `level`, or the maximum-ratio level when unset.
    pub(crate) fn resolve_level(self, level: Option<i32>) -> Result<i32> {
        let range = self.level_range();
        match level {
            None => Ok(*range.end()),
            Some(level) if range.contains(&level) => Ok(level),
            Some(level) => Err(Error::InvalidLevel {
                codec: self,
                level,
                min: *range.start(),
                max: *range.end(),
            }),
        }
    }

    /// Compresses everything `reader` yields into `sink`.
    ///
    /// Returns the number of uncompressed bytes read and the sink, with the
    /// compressed stream finished.
    ///
    /// # Errors
    /// Fails with [`io::ErrorKind::InvalidInput`] if `level` is outside
    /// [`Codec::level_range`], or with any error of the reader or sink.
    pub fn encode<R: Read, W: Write>(self, level: i32, mut reader: R, sink: W) -> io::Result<(u64, W)> {
        if !self.level_range().contains(&level) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("compression level {level} is out of range for {self}"),
            ));
        }
        match self {
            Self::Gzip => {
                let mut encoder = GzBuilder::new().write(sink, Compression::new(level.unsigned_abs()));
                let raw = io::copy(&mut reader, &mut encoder)?;
                Ok((raw, encoder.finish()?))
            }
            Self::Zstd => {
                let mut encoder = zstd::stream::Encoder::new(sink, level)?;
                let raw = io::copy(&mut reader, &mut encoder)?;
                Ok((raw, encoder.finish()?))
            }
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gzip => "gzip",
            Self::Zstd => "zstd",
        })
    }
}

impl FromStr for Codec {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gzip" | "gz" => Ok(Self::Gzip),
            "zstd" | "zst" => Ok(Self::Zstd),
            other => Err(format!("unknown codec '{other}' (expected gzip or zstd)")),
        }
    }
}

/// Settings for [`compress_all`].
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub codec: Codec,
    /// Checked against [`Codec::level_range`]; the maximum-ratio level when unset.
    pub level: Option<i32>,
    /// Upper bound on worker threads; defaults to the available parallelism.
    pub jobs: Option<NonZeroUsize>,
    /// Where artifacts are created; defaults to the system temp directory.
    pub temp_dir: Option<PathBuf>,
}

impl Options {
    fn workers(&self, items: usize) -> usize {
        let limit = self
            .jobs
            .or_else(|| thread::available_parallelism().ok())
            .map_or(4, NonZeroUsize::get);
        limit.min(items).max(1)
    }
}

/// A source file whose compressed bytes wait in a temporary artifact.
///
/// The artifact is deleted when this value is dropped.
#[derive(Debug)]
pub struct Compressed {
    pub source: SourceFile,
    pub artifact: NamedTempFile,
    /// Uncompressed length of the source.
    pub raw_size: u64,
}

/// Compresses every source on a bounded pool of worker threads.
///
/// Once any item fails no further work is started and that error is
/// returned. On error every artifact written so far is deleted.
///
/// The result is in the same order as `sources`.
///
/// # Errors
/// Returns [`Error::InvalidLevel`] before touching any file if the level does
/// not suit the codec, [`Error::ThreadPool`] if no threads can be started,
/// otherwise the first I/O error encountered.
pub fn compress_all(sources: Vec<SourceFile>, options: &Options) -> Result<Vec<Compressed>> {
    let level = options.codec.resolve_level(options.level)?;
    if sources.is_empty() {
        return Ok(Vec::new());
    }

    let workers = options.workers(sources.len());
    tracing::debug!(workers, files = sources.len(), level, "starting compression");

    let pool = rayon::ThreadPoolBuilder::new().num_threads(workers).build()?;
    pool.install(|| {
        sources
            .into_par_iter()
            .map(|source| compress_one(source, options.codec, level, options.temp_dir.as_deref()))
            .collect::<Result<Vec<_>>>()
    })
}

fn compress_one(source: SourceFile, codec: Codec, level: i32, temp_dir: Option<&Path>) -> Result<Compressed> {
    let input = File::open(&source.path).map_err(|e| Error::ReadSource {
        path: source.path.clone(),
        source: e,
    })?;

    let stem = source
        .path
        .file_name()
        .map(|n| format!("{}.", n.to_string_lossy()))
        .unwrap_or_default();
    let mut builder = tempfile::Builder::new();
    builder.prefix(&stem).suffix(codec.suffix());
    let artifact = match temp_dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|e| Error::Artifact {
        name: source.name.clone(),
        source: e,
    })?;

    let compress_err = |e: io::Error| Error::Compress {
        path: source.path.clone(),
        source: e,
    };
    let (raw_size, sink) = codec
        .encode(level, BufReader::new(input), BufWriter::new(artifact.as_file()))
        .map_err(compress_err)?;
    sink.into_inner().map_err(|e| compress_err(e.into_error()))?;

    let compressed_size = artifact.as_file().metadata().map_err(compress_err)?.len();
    tracing::info!(
        name = %source.name,
        compressed_bytes = compressed_size,
        raw_bytes = raw_size,
        "compressed asset"
    );

    Ok(Compressed {
        source,
        artifact,
        raw_size,
    })
}
