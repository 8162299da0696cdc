//! Single byte-range requests (RFC 7233)
//!
//! Multi-range requests and non-`bytes` units are ignored and the whole file
//! is sent instead.

/// Outcome of evaluating a `Range` header against a file length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRange {
    /// No usable range; send everything
    Full,
    /// Inclusive byte span
    Partial { start: u64, end: u64 },
    /// Answer with 416
    Unsatisfiable,
}

impl ByteRange {
    /// Evaluate a `Range` header value for a file of `len` bytes
    pub fn from_header(header: Option<&str>, len: u64) -> Self {
        let Some(spec) = header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
            return Self::Full;
        };
        if spec.contains(',') {
            return Self::Full;
        }
        let Some((first, last)) = spec.split_once('-') else {
            return Self::Full;
        };

        match (first.trim(), last.trim()) {
            ("", "") => Self::Full,
            ("", suffix) => suffix.parse::<u64>().map_or(Self::Full, |n| Self::suffix(n, len)),
            (start, "") => start
                .parse::<u64>()
                .map_or(Self::Full, |s| Self::bounded(s, None, len)),
            (start, end) => match (start.parse::<u64>(), end.parse::<u64>()) {
                (Ok(s), Ok(e)) => Self::bounded(s, Some(e), len),
                _ => Self::Full,
            },
        }
    }

    /// Last `n` bytes; a suffix longer than the file selects all of it
    fn suffix(n: u64, len: u64) -> Self {
        if n == 0 || len == 0 {
            return Self::Unsatisfiable;
        }
        Self::Partial {
            start: len.saturating_sub(n),
            end: len - 1,
        }
    }

    fn bounded(start: u64, end: Option<u64>, len: u64) -> Self {
        if start >= len {
            return Self::Unsatisfiable;
        }
        let end = end.map_or(len - 1, |e| e.min(len - 1));
        if start > end {
            return Self::Unsatisfiable;
        }
        Self::Partial { start, end }
    }
}
