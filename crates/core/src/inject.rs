//! Single-chunk style injection.
//!
//! The streaming transform lives in the shell crate; the actual text
//! substitution is this pure function. A marker that spans a chunk boundary
//! is not detected - there is no look-back buffering, so injection is
//! skipped for that response. See DESIGN.md.

/// Injection anchor: the closing head tag.
pub const HEAD_CLOSE_MARKER: &str = "</head>";

/// Insert `payload` immediately before the first occurrence of `marker` in
/// `chunk`. Returns `None` when the marker is absent; later occurrences are
/// left untouched.
pub fn inject_once(chunk: &str, marker: &str, payload: &str) -> Option<String> {
    let idx = chunk.find(marker)?;
    let mut out = String::with_capacity(chunk.len() + payload.len());
    out.push_str(&chunk[..idx]);
    out.push_str(payload);
    out.push_str(&chunk[idx..]);
    Some(out)
}
