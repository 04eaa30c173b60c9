//! Blank node normalization.
//!
//! Blank node labels are only meaningful inside the document they came from.
//! Scoping them by a hash of the source identifier makes them comparable
//! across documents without collisions: `_:b<hash(source)>_<sanitized label>`.

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Normalize a blank node label against its source document.
///
/// Without a source there is no scope to normalize against, so the label is
/// returned unchanged.
pub fn normalize(source_id: Option<&str>, original_id: &str) -> String {
    match source_id {
        Some(source) => format!("_:b{:016x}_{}", source_hash(source), sanitize(original_id)),
        None => original_id.to_string(),
    }
}

/// FNV-1a over the UTF-8 bytes. Stable across platforms and releases.
pub fn source_hash(source: &str) -> u64 {
    source.bytes().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Replace every character outside `[A-Za-z0-9]` with `_`.
pub fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
