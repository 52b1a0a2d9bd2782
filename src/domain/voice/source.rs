//! Source and target references

/// Scheme marker for local files
pub const FILE_SCHEME: &str = "file://";

/// Removes the `file://` prefix from a reference, if applicable.
///
/// A `file://` reference is reduced to its path component: the authority is
/// dropped, the query and fragment are dropped and percent-escapes are
/// decoded. Any other reference is returned unchanged.
pub fn strip_file_protocol(reference: &str) -> String {
    let Some(rest) = reference.strip_prefix(FILE_SCHEME) else {
        return reference.to_string();
    };

    // file://host/path -> /path
    let path = match rest.find('/') {
        Some(0) => rest,
        Some(idx) => &rest[idx..],
        None => "",
    };

    let path = path
        .split(&['?', '#'][..])
        .next()
        .unwrap_or_default();

    match urlencoding::decode(path) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => path.to_string(),
    }
}

/// Check whether a reference points at a network resource
pub fn is_network_reference(reference: &str) -> bool {
    let lower = reference.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
