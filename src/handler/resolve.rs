//! Mapping of request paths onto the served root

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

use crate::http::uri;

/// A request path mapped under the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Decoded, normalized web path for display and logs; keeps a trailing
    /// `/` when the request had one
    pub web_path: String,
    /// The same path re-encoded from the raw segment bytes
    pub url_path: String,
    pub fs_path: PathBuf,
}

/// Why a path was refused (answered with 403)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("malformed path encoding")]
    BadEncoding,
    #[error("path escapes the served directory")]
    Traversal,
    #[error("only the root directory is served")]
    Restricted,
}

/// Decode `raw_path` and join it onto `root`
///
/// Empty and `.` segments are dropped; `..` or anything that is not a plain
/// file name is refused rather than normalized away. Segments are raw bytes,
/// so names that are not valid UTF-8 resolve on Unix.
pub fn resolve(root: &Path, raw_path: &str, restrict_to_root: bool) -> Result<Target, ResolveError> {
    let decoded = uri::percent_decode(raw_path).ok_or(ResolveError::BadEncoding)?;
    if decoded.contains(&0) {
        return Err(ResolveError::BadEncoding);
    }

    let mut segments: Vec<&[u8]> = Vec::new();
    let mut fs_path = root.to_path_buf();
    for segment in decoded.split(|&b| b == b'/') {
        match segment {
            b"" | b"." => {}
            b".." => return Err(ResolveError::Traversal),
            name => {
                let name_os = os_segment(name)?;
                let mut components = Path::new(name_os).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(_)), None) => {
                        fs_path.push(name_os);
                        segments.push(name);
                    }
                    _ => return Err(ResolveError::Traversal),
                }
            }
        }
    }

    if restrict_to_root && !segments.is_empty() {
        return Err(ResolveError::Restricted);
    }

    let trailing = !segments.is_empty() && decoded.ends_with(b"/");
    let mut url_path = String::from("/");
    url_path.push_str(
        &segments
            .iter()
            .map(|s| uri::encode_bytes(s))
            .collect::<Vec<_>>()
            .join("/"),
    );
    if trailing {
        url_path.push('/');
    }

    Ok(Target {
        web_path: uri::decode_lossy(&url_path),
        url_path,
        fs_path,
    })
}

#[cfg(unix)]
fn os_segment(bytes: &[u8]) -> Result<&OsStr, ResolveError> {
    use std::os::unix::ffi::OsStrExt;
    Ok(OsStr::from_bytes(bytes))
}

/// Non-Unix file names must be valid Unicode
#[cfg(not(unix))]
fn os_segment(bytes: &[u8]) -> Result<&OsStr, ResolveError> {
    std::str::from_utf8(bytes)
        .map(OsStr::new)
        .map_err(|_| ResolveError::BadEncoding)
}
