//! Opaque-text handling of job and view configuration documents
//!
//! Jenkins config schemas are open-ended and plugin-extensible, so the
//! client never builds an XML object model: a lossy partial parser would
//! silently drop plugin fields on the write-back half of a
//! read-modify-write. Callers edit the raw text instead, and unknown
//! markup survives the round trip untouched.

use crate::error::{
    Error,
    Result,
};

/// Applies a caller-supplied edit to a raw configuration document.
///
/// The transform receives the exact text the server returned and must
/// produce the full replacement document. The result is sanity-checked
/// to still look like an XML document before it is accepted.
pub fn apply_transform<F>(xml: &str, transform: F) -> Result<String>
where
    F: FnOnce(&str) -> String,
{
    let transformed = transform(xml);

    if !looks_like_xml(&transformed) {
        return Err(Error::Config(
            "Config transform did not produce an XML document".to_string(),
        ));
    }

    Ok(transformed)
}

fn looks_like_xml(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.starts_with('<') && trimmed.ends_with('>')
}
