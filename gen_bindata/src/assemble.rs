//! Concatenation of compressed artifacts into the output blob.
use std::{
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{
    Error, Result,
    build::{persist, staging_file},
    compress::Compressed,
};

/// An asset whose location inside the blob is final.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedAsset {
    pub name: String,
    /// Location of the original file.
    pub path: PathBuf,
    /// Byte position of the compressed body inside the blob.
    pub offset: u64,
    /// Compressed length in bytes.
    pub size: u64,
}

/// The result of a packing run: every asset, in discovery order, and the
/// length of the blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindata {
    pub assets: Vec<PackedAsset>,
    pub total_size: u64,
}

impl Bindata {
    /// Looks an asset up by name.
    pub fn get(&self, name: &str) -> Option<&PackedAsset> {
        self.assets.iter().find(|a| a.name == name)
    }
}

/// Writes the artifacts back to back into `output`, in the order given.
///
/// Each artifact is deleted once copied. The blob is staged next to
/// `output` and only moved into place after the last artifact was written.
///
/// # Errors
/// Returns [`Error::Artifact`] if an artifact cannot be reopened or removed,
/// and [`Error::WriteOutput`] if the blob cannot be written.
pub fn assemble(compressed: Vec<Compressed>, output: &Path) -> Result<Bindata> {
    let write_err = |source: io::Error| Error::WriteOutput {
        path: output.to_path_buf(),
        source,
    };

    let staged = staging_file(output)?;
    let mut writer = BufWriter::new(staged.as_file());
    let mut assets = Vec::with_capacity(compressed.len());
    let mut offset = 0u64;

    for Compressed { source, artifact, .. } in compressed {
        let artifact_err = |e: io::Error| Error::Artifact {
            name: source.name.clone(),
            source: e,
        };
        let mut reader = artifact.reopen().map_err(artifact_err)?;
        let size = io::copy(&mut reader, &mut writer).map_err(write_err)?;
        drop(reader);
        artifact.close().map_err(artifact_err)?;

        assets.push(PackedAsset {
            name: source.name,
            path: source.path,
            offset,
            size,
        });
        offset += size;
    }

    writer.flush().map_err(write_err)?;
    drop(writer);
    persist(staged, output)?;

    Ok(Bindata {
        assets,
        total_size: offset,
    })
}
