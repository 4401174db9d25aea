//! Discovery of the files to pack and derivation of their asset names.
use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use crate::{Error, Result};

/// A file selected for packing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Logical name under which the asset is indexed.
    pub name: String,
    /// Location of the original file.
    pub path: PathBuf,
}

/// Lists the regular files directly inside each of `dirs`.
///
/// Directories are visited in the given order and their entries sorted by
/// file name, which together define the discovery order of the assets.
/// Subdirectories are not descended into.
///
/// # Errors
/// Returns [`Error::ListDir`] if a directory or one of its entries cannot be
/// read, and [`Error::DuplicateName`] if two files map to the same name.
pub fn collect<P: AsRef<Path>>(dirs: &[P], prefix: &str, suffix: &str) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();

    for dir in dirs {
        let dir = dir.as_ref();
        let list_err = |source: io::Error| Error::ListDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = fs::read_dir(dir)
            .map_err(list_err)?
            .collect::<io::Result<Vec<_>>>()
            .map_err(list_err)?;
        entries.sort_by_key(fs::DirEntry::file_name);

        let dir_name = dir.to_string_lossy();
        for entry in entries {
            let path = entry.path();
            if !fs::metadata(&path).map_err(list_err)?.is_file() {
                tracing::debug!(path = %path.display(), "skipping non-file entry");
                continue;
            }
            let file_name = entry.file_name();
            files.push(SourceFile {
                name: asset_name(&dir_name, &file_name.to_string_lossy(), prefix, suffix),
                path,
            });
        }
    }

    ensure_unique(&files)?;
    Ok(files)
}

/// Derives the indexed name of `file_name` inside `dir`.
///
/// The two are joined with `/` and lexically cleaned, `prefix` is removed if
/// the result starts with it, and `suffix` is appended.
pub fn asset_name(dir: &str, file_name: &str, prefix: &str, suffix: &str) -> String {
    let joined = join_clean(dir, file_name);
    let stripped = joined.strip_prefix(prefix).unwrap_or(&joined);
    format!("{stripped}{suffix}")
}

fn join_clean(dir: &str, file_name: &str) -> String {
    let rooted = dir.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in dir.split('/').chain(file_name.split('/')) {
        match part {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            _ => parts.push(part),
        }
    }

    let joined = parts.join("/");
    if rooted {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_owned()
    } else {
        joined
    }
}

fn ensure_unique(files: &[SourceFile]) -> Result<()> {
    let mut seen: HashMap<&str, &Path> = HashMap::with_capacity(files.len());
    for file in files {
        if let Some(first) = seen.insert(&file.name, &file.path) {
            return Err(Error::DuplicateName {
                name: file.name.clone(),
                first: first.to_path_buf(),
                second: file.path.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_strips_literal_prefix() {
        assert_eq!(asset_name("assets", "a.txt", "assets", ".gz"), "/a.txt.gz");
        assert_eq!(asset_name("assets", "a.txt", "assets/", ".gz"), "a.txt.gz");
    }

    #[test]
    fn name_keeps_path_when_prefix_absent_or_not_matching() {
        assert_eq!(asset_name("assets", "a.txt", "", ".gz"), "assets/a.txt.gz");
        assert_eq!(asset_name("assets", "a.txt", "static", ".gz"), "assets/a.txt.gz");
        // Only a literal prefix of the whole path is stripped.
        assert_eq!(asset_name("web/assets", "a.txt", "assets", ".gz"), "web/assets/a.txt.gz");
    }

    #[test]
    fn name_is_lexically_cleaned() {
        assert_eq!(asset_name("./assets/", "a.txt", "", ".gz"), "assets/a.txt.gz");
        assert_eq!(asset_name("a//b/../c", "f", "", ""), "a/c/f");
        assert_eq!(asset_name("../shared", "f", "", ""), "../shared/f");
        assert_eq!(asset_name("/srv/../www", "f", "/www", ".zst"), "/f.zst");
        assert_eq!(asset_name("/..", "f", "", ""), "/f");
    }

    #[test]
    fn collects_files_sorted_and_skips_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "world").unwrap();
        fs::write(dir.path().join("a.txt"), "hi").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.txt"), "skipped").unwrap();

        let prefix = dir.path().to_string_lossy().into_owned();
        let files = collect(&[dir.path()], &prefix, ".gz").unwrap();

        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["/a.txt.gz", "/b.txt.gz"]);
        assert_eq!(files[0].path, dir.path().join("a.txt"));
    }

    #[test]
    fn preserves_directory_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(first.path().join("z"), "").unwrap();
        fs::write(second.path().join("a"), "").unwrap();

        let files = collect(&[first.path(), second.path()], "", "").unwrap();

        assert_eq!(files[0].path, first.path().join("z"));
        assert_eq!(files[1].path, second.path().join("a"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let err = collect(&[&missing], "", ".gz").unwrap_err();

        assert!(matches!(err, Error::ListDir { ref path, .. } if *path == missing));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let root = tempfile::tempdir().unwrap();
        let one = root.path().join("one");
        fs::create_dir(&one).unwrap();
        fs::write(one.join("same.txt"), "1").unwrap();

        // Two spellings of the same directory clean to the same name.
        let respelled = one.join(".");
        let err = collect(&[one.as_path(), respelled.as_path()], "", ".gz").unwrap_err();
        match err {
            Error::DuplicateName { name, first, second } => {
                assert!(name.ends_with("/one/same.txt.gz"));
                assert_eq!(first, one.join("same.txt"));
                assert_eq!(second, respelled.join("same.txt"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
