use crate::errors::{FileOperation, IoError};
use miette::Diagnostic;
use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf, StripPrefixError},
};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error, Diagnostic)]
pub enum MirrorError {
    #[error("Could not find aspect directory")]
    #[diagnostic(
        code(aspect_mirror::mirror::source_unavailable),
        help("Set ASPECT_MIRROR_DIR or configure [aspects] in aspect-mirror.toml")
    )]
    SourceUnavailable,

    #[error("Could not determine relative path of '{path}'")]
    #[diagnostic(code(aspect_mirror::mirror::relative_path))]
    RelativePath {
        path: PathBuf,
        root: PathBuf,
        #[source]
        source: StripPrefixError,
    },

    #[error("Could not copy aspects")]
    #[diagnostic(code(aspect_mirror::mirror::failed))]
    Failed(#[from] IoError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
}

/// A single entry produced while walking the source tree.
#[derive(Debug, Clone)]
pub struct TreeEntry {
    /// Location relative to the source root. Empty for the root itself.
    pub relative: PathBuf,
    /// Absolute location inside the source tree.
    pub source: PathBuf,
    pub kind: EntryKind,
}

/// Counts of what a successful [`mirror`] wrote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MirrorSummary {
    pub directories: usize,
    pub files: usize,
    pub symlinks: usize,
    pub bytes: u64,
}

/// Expresses `path` relative to `root`.
pub fn relative_path(root: &Path, path: &Path) -> Result<PathBuf, MirrorError> {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .map_err(|error| MirrorError::RelativePath {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
            source: error,
        })
}

/// Lazily walks `source` depth-first, yielding every directory before its descendants.
///
/// Symlinks are reported as [`EntryKind::Symlink`] and never followed. The walk holds no
/// lock on the source tree, so a tree modified concurrently may be observed in an
/// inconsistent state.
pub fn walk(source: &Path) -> impl Iterator<Item = Result<TreeEntry, MirrorError>> + '_ {
    WalkDir::new(source)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .map(move |entry| -> Result<TreeEntry, MirrorError> {
            let entry = match entry {
                Ok(e) => e,
                Err(error) => {
                    let path = error.path().unwrap_or(source).to_path_buf();

                    Err(IoError::new(FileOperation::Walk, path, error.into()))?
                }
            };

            let file_type = entry.file_type();
            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_symlink() {
                EntryKind::Symlink
            } else {
                EntryKind::File
            };

            Ok(TreeEntry {
                relative: relative_path(source, entry.path())?,
                source: entry.path().to_path_buf(),
                kind,
            })
        })
}

/// Collects the walk of `source` without touching any destination.
pub fn plan(source: &Path) -> Result<Vec<TreeEntry>, MirrorError> {
    ensure_source(source)?;

    walk(source).collect()
}

/// Recursively copies `source` over `destination`.
///
/// Directories are created on demand and existing files are truncated and rewritten.
/// Entries already under `destination` that have no counterpart in `source` are left
/// untouched. The first failure aborts the whole operation; anything written before it
/// stays in place.
///
/// # Errors
///
/// - [`MirrorError::SourceUnavailable`] if `source` is not an existing directory. Nothing
///   is written in that case.
/// - [`MirrorError::RelativePath`] if an entry cannot be expressed relative to `source`.
/// - [`MirrorError::Failed`] for any I/O failure while walking, creating directories or
///   copying bytes.
pub fn mirror(source: &Path, destination: &Path) -> Result<MirrorSummary, MirrorError> {
    ensure_source(source)?;

    log::info!(
        "mirroring {} into {}",
        source.display(),
        destination.display()
    );

    let mut summary = MirrorSummary::default();

    for entry in walk(source) {
        let entry = entry?;
        let target = destination.join(&entry.relative);

        match entry.kind {
            EntryKind::Directory => {
                log::debug!("mkdir {}", target.display());
                // the destination root itself may be a link chosen by the caller
                if !entry.relative.as_os_str().is_empty() {
                    remove_link(&target, FileOperation::Mkdir)?;
                }
                create_directory(&target)?;
                summary.directories += 1;
            }
            EntryKind::File => {
                log::debug!("copy {} -> {}", entry.source.display(), target.display());
                summary.bytes += copy_file(&entry.source, &target)?;
                summary.files += 1;
            }
            EntryKind::Symlink => {
                log::debug!("link {} -> {}", entry.source.display(), target.display());
                copy_symlink(&entry.source, &target)?;
                summary.symlinks += 1;
            }
        }
    }

    log::info!(
        "mirrored {} directories, {} files, {} symlinks ({} bytes)",
        summary.directories,
        summary.files,
        summary.symlinks,
        summary.bytes
    );

    Ok(summary)
}

fn ensure_source(source: &Path) -> Result<(), MirrorError> {
    if source.is_dir() {
        Ok(())
    } else {
        log::warn!("aspect directory {} is not a directory", source.display());
        Err(MirrorError::SourceUnavailable)
    }
}

fn create_directory(path: &Path) -> Result<(), IoError> {
    fs::create_dir_all(path).map_err(|error| IoError::new(FileOperation::Mkdir, path.into(), error))
}

/// Overwrites `to` with the bytes of `from`. Both handles are closed when this returns.
fn copy_file(from: &Path, to: &Path) -> Result<u64, IoError> {
    let mut input =
        File::open(from).map_err(|error| IoError::new(FileOperation::Read, from.into(), error))?;

    remove_link(to, FileOperation::Write)?;

    let mut output =
        File::create(to).map_err(|error| IoError::new(FileOperation::Write, to.into(), error))?;

    io::copy(&mut input, &mut output)
        .map_err(|error| IoError::new(FileOperation::Copy, to.into(), error))
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> Result<(), IoError> {
    let link_target =
        fs::read_link(from).map_err(|error| IoError::new(FileOperation::Read, from.into(), error))?;

    let replaceable = fs::symlink_metadata(to).is_ok_and(|meta| !meta.is_dir());
    if replaceable {
        fs::remove_file(to)
            .map_err(|error| IoError::new(FileOperation::Symlink, to.into(), error))?;
    }

    std::os::unix::fs::symlink(&link_target, to)
        .map_err(|error| IoError::new(FileOperation::Symlink, to.into(), error))
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, _to: &Path) -> Result<(), IoError> {
    Err(IoError::new(
        FileOperation::Symlink,
        from.into(),
        io::Error::new(
            io::ErrorKind::Unsupported,
            "symlinks can only be mirrored on unix",
        ),
    ))
}

/// Removes a symlink left at `path` so nothing is written through it.
fn remove_link(path: &Path, operation: FileOperation) -> Result<(), IoError> {
    if is_symlink(path) {
        fs::remove_file(path).map_err(|error| IoError::new(operation, path.into(), error))?;
    }

    Ok(())
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_symlink())
}
