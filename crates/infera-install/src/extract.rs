use std::fs;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use xz2::read::XzDecoder;

use crate::entry::{Entry, EntryKind};
use crate::error::{InstallError, Result};
use crate::sanitize::{sanitize_entry_path, sanitize_link_target};

/// Summary of a completed extraction, for logging and assertions.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExtractionReport {
    pub entry_count: usize,
    pub total_bytes: u64,
}

/// Extract a single-member xz-compressed tar archive into `destination`.
///
/// Entries are processed strictly in stream order and never buffered. Every
/// entry path and every link target is containment-checked against
/// `destination` before any filesystem mutation; a violation aborts the
/// whole extraction.
pub fn extract_tar_xz(archive_path: &Path, destination: &Path) -> Result<ExtractionReport> {
    debug!(archive = %archive_path.display(), dest = %destination.display(), "extracting");

    let file = fs::File::open(archive_path).map_err(|source| InstallError::Extraction {
        path: archive_path.to_path_buf(),
        source,
    })?;
    let decoder = XzDecoder::new(BufReader::new(file));
    let mut archive = tar::Archive::new(decoder);

    let mut report = ExtractionReport::default();
    let entries = archive
        .entries()
        .map_err(|source| stream_error(archive_path, source))?;

    for raw in entries {
        let mut raw = raw.map_err(|source| stream_error(archive_path, source))?;
        let entry = read_entry(&raw).map_err(|source| stream_error(archive_path, source))?;
        let target = sanitize_entry_path(&entry.original_path, destination)?;
        apply_entry(&mut raw, &entry, &target.resolved, destination)?;
        report.entry_count += 1;
        report.total_bytes += entry.size;
    }

    Ok(report)
}

/// Decode one tar header into the entry model.
fn read_entry<R: Read>(raw: &tar::Entry<'_, R>) -> io::Result<Entry> {
    let original_path = raw.path()?.into_owned();
    let header = raw.header();
    let size = header.size().unwrap_or(0);
    let mode = header.mode().ok();

    let entry_type = header.entry_type();
    let kind = if entry_type.is_dir() {
        EntryKind::Directory
    } else if entry_type.is_symlink() {
        EntryKind::Symlink {
            target: required_link_target(raw)?,
        }
    } else if entry_type.is_hard_link() {
        EntryKind::HardLink {
            target: required_link_target(raw)?,
        }
    } else {
        EntryKind::File
    };

    Ok(Entry::new(original_path, size, mode, kind))
}

fn required_link_target<R: Read>(raw: &tar::Entry<'_, R>) -> io::Result<PathBuf> {
    raw.link_name()?
        .map(|target| target.into_owned())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "link entry without a target"))
}

fn apply_entry<R: Read>(
    raw: &mut tar::Entry<'_, R>,
    entry: &Entry,
    target: &Path,
    destination: &Path,
) -> Result<()> {
    match &entry.kind {
        EntryKind::Directory => {
            fs::create_dir_all(target).map_err(|source| entry_error(target, source))
        }
        EntryKind::File => write_file(raw, entry, target),
        EntryKind::Symlink { target: link_target } => {
            place_symlink(link_target, target, destination)
        }
        EntryKind::HardLink { target: link_target } => {
            emulate_hard_link(link_target, target, destination)
        }
    }
}

fn write_file<R: Read>(raw: &mut tar::Entry<'_, R>, entry: &Entry, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|source| entry_error(target, source))?;
    }

    let mut out = fs::File::create(target).map_err(|source| entry_error(target, source))?;
    io::copy(raw, &mut out).map_err(|source| entry_error(target, source))?;
    drop(out);

    // Only touch permissions when the archive recorded an execute bit; the
    // read/write bits the filesystem chose stay as they are.
    if entry.is_executable() {
        add_execute_bits(target).map_err(|source| entry_error(target, source))?;
    }
    Ok(())
}

#[cfg(unix)]
fn add_execute_bits(target: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(target)?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    fs::set_permissions(target, perms)
}

#[cfg(not(unix))]
fn add_execute_bits(_target: &Path) -> io::Result<()> {
    Ok(())
}

/// Create a symlink at `target`, replacing whatever sits there so the same
/// archive can be re-extracted. A replacement failure leaves the install in a
/// best-effort state and is reported as the degraded class, not a hard error.
///
/// The link target must resolve inside `destination`; an escaping link would
/// let later file entries routed through it land outside the root.
fn place_symlink(link_target: &Path, target: &Path, destination: &Path) -> Result<()> {
    sanitize_link_target(link_target, target, destination)?;

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|source| entry_error(target, source))?;
    }

    if let Ok(meta) = fs::symlink_metadata(target) {
        let removal = if meta.is_dir() {
            fs::remove_dir(target)
        } else {
            fs::remove_file(target)
        };
        if let Err(source) = removal {
            warn!(path = %target.display(), %source, "cannot clear path for symlink");
            return Err(InstallError::DegradedExtraction {
                path: target.to_path_buf(),
                source,
            });
        }
    }

    create_symlink(link_target, target)
}

#[cfg(unix)]
fn create_symlink(link_target: &Path, target: &Path) -> Result<()> {
    std::os::unix::fs::symlink(link_target, target).map_err(|source| entry_error(target, source))
}

#[cfg(not(unix))]
fn create_symlink(link_target: &Path, target: &Path) -> Result<()> {
    warn!(
        path = %target.display(),
        link = %link_target.display(),
        "symlinks unsupported on this platform, skipping entry"
    );
    Ok(())
}

/// Hard links are emulated by copying the already-extracted target, since the
/// install root may sit on a filesystem that does not support real links. A
/// forward reference (target not yet materialized) is skipped with a warning.
fn emulate_hard_link(link_target: &Path, target: &Path, destination: &Path) -> Result<()> {
    let resolved = sanitize_entry_path(link_target, destination)?;

    if fs::symlink_metadata(&resolved.resolved).is_err() {
        warn!(link = %link_target.display(), "hard link target does not exist yet, skipping");
        return Ok(());
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|source| entry_error(target, source))?;
    }
    fs::copy(&resolved.resolved, target).map_err(|source| entry_error(target, source))?;
    Ok(())
}

fn entry_error(target: &Path, source: io::Error) -> InstallError {
    InstallError::Extraction {
        path: target.to_path_buf(),
        source,
    }
}

fn stream_error(archive_path: &Path, source: io::Error) -> InstallError {
    InstallError::Extraction {
        path: archive_path.to_path_buf(),
        source,
    }
}
