//! Directory reading and entry ordering

use std::borrow::Cow;
use std::cmp::Ordering;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use tokio::fs;

/// Snapshot of one directory member, taken per request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Display name; invalid UTF-8 is replaced with U+FFFD
    pub name: String,
    /// Name as stored on disk, used to build links
    pub raw_name: OsString,
    pub is_dir: bool,
    /// Size in bytes, meaningless for directories
    pub size: u64,
    pub modified: SystemTime,
}

impl Entry {
    /// Raw bytes of the on-disk name
    #[cfg(unix)]
    pub fn name_bytes(&self) -> Cow<'_, [u8]> {
        use std::os::unix::ffi::OsStrExt;
        Cow::Borrowed(self.raw_name.as_bytes())
    }

    #[cfg(not(unix))]
    pub fn name_bytes(&self) -> Cow<'_, [u8]> {
        match self.raw_name.to_string_lossy() {
            Cow::Borrowed(name) => Cow::Borrowed(name.as_bytes()),
            Cow::Owned(name) => Cow::Owned(name.into_bytes()),
        }
    }

    #[cfg(test)]
    pub fn file(name: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            raw_name: OsString::from(name),
            is_dir: false,
            size,
            modified: SystemTime::UNIX_EPOCH,
        }
    }

    #[cfg(test)]
    pub fn dir(name: &str) -> Self {
        Self {
            name: name.to_string(),
            raw_name: OsString::from(name),
            is_dir: true,
            size: 4096,
            modified: SystemTime::UNIX_EPOCH,
        }
    }
}

/// Directory read failure; aborts the whole listing
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("no such directory: {}", .0.display())]
    NotFound(PathBuf),
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ListingError {
    fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

/// Directories before files, then ascending by name
pub fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name.cmp(&b.name))
}

/// Read one directory (non-recursive) and return its entries in display order
///
/// Symlinks are followed; a dangling link is listed with its own metadata.
pub async fn read_entries(dir: &Path, show_hidden: bool) -> Result<Vec<Entry>, ListingError> {
    let mut reader = fs::read_dir(dir)
        .await
        .map_err(|e| ListingError::from_io(dir, e))?;

    let mut entries = Vec::new();
    while let Some(item) = reader
        .next_entry()
        .await
        .map_err(|e| ListingError::from_io(dir, e))?
    {
        let raw_name = item.file_name();
        let name = raw_name.to_string_lossy().into_owned();
        if !show_hidden && name.starts_with('.') {
            continue;
        }

        let path = item.path();
        let metadata = match fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => fs::symlink_metadata(&path)
                .await
                .map_err(|e| ListingError::from_io(&path, e))?,
            Err(e) => return Err(ListingError::from_io(&path, e)),
        };

        entries.push(Entry {
            name,
            raw_name,
            is_dir: metadata.is_dir(),
            size: metadata.len(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        });
    }

    entries.sort_by(compare_entries);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        stdfs::write(tmp.path().join("b.txt"), b"bee").unwrap();
        stdfs::write(tmp.path().join("a.txt"), b"").unwrap();
        stdfs::write(tmp.path().join(".hidden"), b"secret").unwrap();
        stdfs::create_dir(tmp.path().join("zeta")).unwrap();
        stdfs::create_dir(tmp.path().join("alpha")).unwrap();
        tmp
    }

    #[test]
    fn test_directories_sort_first() {
        let mut entries = vec![
            Entry::file("b.txt", 1),
            Entry::dir("docs"),
            Entry::file("a.txt", 1),
            Entry::dir("assets"),
        ];
        entries.sort_by(compare_entries);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["assets", "docs", "a.txt", "b.txt"]);
    }

    #[test]
    fn test_sort_is_bytewise() {
        let mut entries = vec![
            Entry::file("banana", 1),
            Entry::file("Cherry", 1),
            Entry::file("apple", 1),
        ];
        entries.sort_by(compare_entries);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Cherry", "apple", "banana"]);
    }

    #[test]
    fn test_compare_is_total() {
        let a = Entry::dir("x");
        let b = Entry::file("x", 0);
        assert_eq!(compare_entries(&a, &b), Ordering::Less);
        assert_eq!(compare_entries(&b, &a), Ordering::Greater);
        assert_eq!(compare_entries(&a, &a.clone()), Ordering::Equal);
    }

    #[tokio::test]
    async fn test_read_entries_orders_and_classifies() {
        let tmp = fixture();
        let entries = read_entries(tmp.path(), false).await.unwrap();

        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["alpha", "zeta", "a.txt", "b.txt"]);
        assert!(entries[0].is_dir && entries[1].is_dir);
        assert_eq!(entries[2].size, 0);
        assert_eq!(entries[3].size, 3);
    }

    #[tokio::test]
    async fn test_read_entries_hidden_files() {
        let tmp = fixture();
        let hidden = read_entries(tmp.path(), false).await.unwrap();
        assert!(hidden.iter().all(|e| e.name != ".hidden"));

        let shown = read_entries(tmp.path(), true).await.unwrap();
        assert_eq!(shown[2].name, ".hidden");
    }

    #[tokio::test]
    async fn test_read_entries_is_repeatable() {
        let tmp = fixture();
        let first = read_entries(tmp.path(), true).await.unwrap();
        let second = read_entries(tmp.path(), true).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let err = read_entries(&tmp.path().join("nope"), false)
            .await
            .unwrap_err();
        assert!(matches!(err, ListingError::NotFound(_)));
        assert!(err.to_string().contains("nope"));
    }

    #[tokio::test]
    async fn test_reading_a_file_fails() {
        let tmp = fixture();
        let err = read_entries(&tmp.path().join("a.txt"), false).await;
        assert!(err.is_err());
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_non_utf8_name_keeps_raw_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().unwrap();
        stdfs::write(tmp.path().join(OsStr::from_bytes(b"caf\xe9.txt")), b"x").unwrap();
        let entries = read_entries(tmp.path(), true).await.unwrap();
        assert_eq!(entries[0].name, "caf\u{FFFD}.txt");
        assert_eq!(&*entries[0].name_bytes(), b"caf\xe9.txt");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dangling_symlink_is_listed() {
        let tmp = TempDir::new().unwrap();
        std::os::unix::fs::symlink(tmp.path().join("gone"), tmp.path().join("link")).unwrap();
        let entries = read_entries(tmp.path(), false).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "link");
        assert!(!entries[0].is_dir);
    }
}
