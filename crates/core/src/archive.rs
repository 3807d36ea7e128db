//! In-memory inspection of uploaded skill archives.
//!
//! [`SkillArchive::from_bytes`] walks every zip entry once and keeps an
//! owned snapshot: file paths, implied directories and the UTF-8 text of each
//! readable file. Individual entries that cannot be read (bad compression,
//! oversize, non-UTF-8, unsafe path) are kept as paths without content; only
//! an archive whose central directory cannot be parsed is an error.
//!
//! Archives commonly wrap everything in a single top-level folder
//! (`myskill/SKILL.md`). The resolved [`root`](SkillArchive::root) prefix hides
//! that difference so lookups like `has_file("README.md")` work for both
//! layouts.

use std::collections::BTreeSet;
use std::io::{Cursor, Read};

use sha2::{Digest, Sha256};
use zip::ZipArchive;

/// Largest entry whose text content is loaded for inspection.
pub const MAX_TEXT_ENTRY_BYTES: u64 = 2 * 1024 * 1024;

/// Lowercase hex SHA-256 of the raw archive bytes, recorded with each run so
/// a Silver score can be traced back to the exact upload.
pub fn archive_digest(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Fatal archive failure. Per-entry problems never produce this.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Archive could not be opened: {0}")]
    Unreadable(String),
}

#[derive(Debug, Clone)]
struct ArchiveEntry {
    path: String,
    text: Option<String>,
}

/// Read-only view over the contents of a skill archive.
#[derive(Debug, Clone)]
pub struct SkillArchive {
    files: Vec<ArchiveEntry>,
    directories: BTreeSet<String>,
    root: String,
}

impl SkillArchive {
    /// Parse a zip archive held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArchiveError> {
        let mut zip = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ArchiveError::Unreadable(e.to_string()))?;

        let mut files = Vec::with_capacity(zip.len());
        let mut directories = BTreeSet::new();

        for index in 0..zip.len() {
            let mut entry = match zip.by_index(index) {
                Ok(entry) => entry,
                Err(_) => continue,
            };
            if entry.enclosed_name().is_none() {
                continue;
            }
            let path = entry.name().replace('\\', "/");

            if entry.is_dir() {
                directories.insert(format!("{}/", path.trim_end_matches('/')));
                continue;
            }

            let text = read_text(&mut entry);
            files.push(ArchiveEntry { path, text });
        }

        for file in &files {
            for (idx, ch) in file.path.char_indices() {
                if ch == '/' {
                    directories.insert(file.path[..=idx].to_string());
                }
            }
        }

        let root = resolve_root(
            files
                .iter()
                .map(|f| f.path.as_str())
                .chain(directories.iter().map(String::as_str)),
        );

        Ok(Self {
            files,
            directories,
            root,
        })
    }

    /// Resolved root prefix (`"myskill/"` or `""`).
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Number of non-directory entries.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Full paths of every non-directory entry, in archive order.
    pub fn file_paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.path.as_str())
    }

    /// Root-relative paths of the files located under the root prefix.
    pub fn relative_paths(&self) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .filter_map(|f| f.path.strip_prefix(self.root.as_str()))
    }

    /// Whether `root + path` is a file in the archive.
    pub fn has_file(&self, path: &str) -> bool {
        let full = self.full_path(path);
        self.files.iter().any(|f| f.path == full)
    }

    /// Whether `root + dir` is a directory, explicit or implied by a file path.
    pub fn has_dir(&self, dir: &str) -> bool {
        let full = format!("{}/", self.full_path(dir.trim_end_matches('/')));
        self.directories.contains(&full)
    }

    /// UTF-8 content of the root-relative `path`, if it was readable.
    pub fn read_text(&self, path: &str) -> Option<&str> {
        self.read_text_at(&self.full_path(path))
    }

    /// UTF-8 content of an entry addressed by its full archive path.
    pub fn read_text_at(&self, full_path: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.path == full_path)
            .and_then(|f| f.text.as_deref())
    }

    fn full_path(&self, path: &str) -> String {
        format!("{}{}", self.root, path)
    }
}

fn read_text(entry: &mut impl Read) -> Option<String> {
    let mut buf = Vec::new();
    let read = entry
        .take(MAX_TEXT_ENTRY_BYTES + 1)
        .read_to_end(&mut buf)
        .ok()?;
    if read as u64 > MAX_TEXT_ENTRY_BYTES {
        return None;
    }
    String::from_utf8(buf).ok()
}

/// Resolve the single wrapping folder shared by every entry path.
///
/// Returns `"<dir>/"` when every path starts with the same first component
/// followed by a separator, and `""` otherwise (including empty input).
pub fn resolve_root<'a>(paths: impl IntoIterator<Item = &'a str>) -> String {
    let mut shared: Option<&str> = None;
    for path in paths {
        let Some((first, _)) = path.split_once('/') else {
            return String::new();
        };
        if first.is_empty() {
            return String::new();
        }
        match shared {
            None => shared = Some(first),
            Some(existing) if existing == first => {}
            Some(_) => return String::new(),
        }
    }
    shared.map(|dir| format!("{dir}/")).unwrap_or_default()
}
