use std::path::{Path, PathBuf};

/// One archive entry, produced by the tar reader and consumed immediately.
#[derive(Clone, Debug)]
pub struct Entry {
    pub original_path: PathBuf,
    pub size: u64,
    pub mode: Option<u32>,
    pub kind: EntryKind,
}

/// Closed set of entry kinds the extractor understands.
///
/// Dispatch is by exhaustive matching, so a new kind is a compile-time
/// exercise rather than a runtime surprise.
#[derive(Clone, Debug)]
pub enum EntryKind {
    Directory,
    File,
    Symlink { target: PathBuf },
    HardLink { target: PathBuf },
}

impl Entry {
    pub fn new(original_path: PathBuf, size: u64, mode: Option<u32>, kind: EntryKind) -> Self {
        Self {
            original_path,
            size,
            mode,
            kind,
        }
    }

    /// Check if entry has any execute bit set in its recorded mode.
    pub fn is_executable(&self) -> bool {
        self.mode.is_some_and(|m| m & 0o111 != 0)
    }

    pub fn link_target(&self) -> Option<&Path> {
        match &self.kind {
            EntryKind::Symlink { target } | EntryKind::HardLink { target } => Some(target),
            EntryKind::Directory | EntryKind::File => None,
        }
    }
}
