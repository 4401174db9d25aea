//! Builder API and orchestration of the packing pipeline.
use std::{
    fs::File,
    io,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::{
    assemble::{self, Bindata},
    collect,
    compress::{self, Codec},
    emit,
};

/// Blob path used when none is configured.
pub const DEFAULT_OUTPUT: &str = "./bindata";

/// Generated source path used when none is configured.
pub const DEFAULT_SOURCE_OUTPUT: &str = "./bindata.rs";

/// Module name used in the generated source when none is configured.
pub const DEFAULT_PACKAGE: &str = "bindata";

//
// ==================== PUBLIC BUILDER API ====================
//

/// A builder for configuring the asset packing process.
///
/// # Example
/// ```no_run
/// gen_bindata::Config::new(["static", "templates"])
///     .prefix("static")
///     .package("assets")
///     .output("target/assets.bin")
///     .source_output("src/assets.rs")
///     .build()
///     .expect("Failed to pack assets");
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    dirs: Vec<PathBuf>,
    prefix: String,
    package: String,
    output: PathBuf,
    source_output: PathBuf,
    codec: Codec,
    level: Option<i32>,
    jobs: Option<NonZeroUsize>,
    temp_dir: Option<PathBuf>,
    cargo_rerun: bool,
}

impl Config {
    /// Creates a new configuration packing the given directories, in order.
    ///
    /// Only regular files directly inside each directory are packed.
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            dirs: dirs.into_iter().map(|d| d.as_ref().to_path_buf()).collect(),
            prefix: String::new(),
            package: DEFAULT_PACKAGE.to_owned(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            source_output: PathBuf::from(DEFAULT_SOURCE_OUTPUT),
            codec: Codec::default(),
            level: None,
            jobs: None,
            temp_dir: None,
            cargo_rerun: false,
        }
    }

    /// Strips this literal prefix off asset names.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the module name wrapping the generated index.
    #[must_use]
    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// Sets the path of the blob to write.
    #[must_use]
    pub fn output(mut self, path: impl AsRef<Path>) -> Self {
        self.output = path.as_ref().to_path_buf();
        self
    }

    /// Sets the path of the generated Rust source.
    #[must_use]
    pub fn source_output(mut self, path: impl AsRef<Path>) -> Self {
        self.source_output = path.as_ref().to_path_buf();
        self
    }

    /// Selects the compressor. Defaults to gzip.
    #[must_use]
    pub const fn codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    /// Sets the compression level.
    ///
    /// If not set, the highest level of the selected codec is used.
    #[must_use]
    pub const fn level(mut self, level: i32) -> Self {
        self.level = Some(level);
        self
    }

    /// Caps the number of compression threads.
    ///
    /// If not set, the available parallelism of the machine is used.
    #[must_use]
    pub const fn jobs(mut self, jobs: NonZeroUsize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// Places temporary artifacts in `dir` instead of the system temp directory.
    #[must_use]
    pub fn temp_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.temp_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Prints `cargo:rerun-if-changed` for every input directory.
    ///
    /// Enable this when running from a `build.rs` script.
    #[must_use]
    pub const fn cargo_rerun(mut self, enabled: bool) -> Self {
        self.cargo_rerun = enabled;
        self
    }

    /// Runs the packing pipeline and writes both the blob and the index.
    ///
    /// Nothing is written to the output paths unless every file was
    /// collected and compressed successfully.
    ///
    /// # Errors
    /// Returns an [`Error`] if the configuration is invalid or any file I/O
    /// fails. The run is aborted at the first error.
    pub fn build(self) -> Result<Bindata> {
        if self.dirs.is_empty() {
            return Err(Error::NoInputs);
        }
        let module = emit::module_ident(&self.package)?;
        // Reject a bad level before any I/O.
        self.codec.resolve_level(self.level)?;

        if self.cargo_rerun {
            for dir in &self.dirs {
                println!("cargo:rerun-if-changed={}", dir.display());
            }
        }

        let sources = collect::collect(&self.dirs, &self.prefix, self.codec.suffix())?;
        tracing::debug!(files = sources.len(), "collected assets");

        let options = compress::Options {
            codec: self.codec,
            level: self.level,
            jobs: self.jobs,
            temp_dir: self.temp_dir,
        };
        let compressed = compress::compress_all(sources, &options)?;

        tracing::info!(path = %self.output.display(), "writing blob");
        let bindata = assemble::assemble(compressed, &self.output)?;

        let source = emit::render(&self.output, &module, &bindata)?;
        emit::write_index(&self.source_output, &source)?;
        tracing::info!(
            path = %self.source_output.display(),
            assets = bindata.assets.len(),
            total_size = bindata.total_size,
            "wrote index"
        );

        Ok(bindata)
    }
}

/// A specialized `Result` type for packing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that aborts the packing process.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no input directories given")]
    NoInputs,
    #[error("could not list directory '{}'", path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not open '{}'", path.display())]
    ReadSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not access temporary artifact for '{name}'")]
    Artifact {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("could not compress '{}'", path.display())]
    Compress {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not write '{}'", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(
        "asset name '{name}' is produced by both '{}' and '{}'",
        first.display(),
        second.display()
    )]
    DuplicateName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("'{0}' is not a valid Rust module name")]
    InvalidPackage(String),
    #[error("compression level {level} is out of range for {codec} ({min}..={max})")]
    InvalidLevel {
        codec: Codec,
        level: i32,
        min: i32,
        max: i32,
    },
    #[error("could not start compression threads")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("generated index is not valid Rust")]
    Render(#[source] syn::Error),
}

/// Creates a temporary file next to `path`, to be persisted over it once complete.
pub(crate) fn staging_file(path: &Path) -> Result<NamedTempFile> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    NamedTempFile::new_in(dir).map_err(|source| Error::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}

/// Atomically moves a finished staging file to `path`.
pub(crate) fn persist(staged: NamedTempFile, path: &Path) -> Result<File> {
    staged.persist(path).map_err(|e| Error::WriteOutput {
        path: path.to_path_buf(),
        source: e.error,
    })
}
