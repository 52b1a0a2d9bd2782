//! Filesystem resource resolver
//!
//! Relative references are joined onto a base directory. Absolute paths,
//! `file://` URIs and http(s) URLs pass through untouched.

use std::path::{Path, PathBuf};

use crate::application::ports::{ResolveError, ResourceResolver};

const PASSTHROUGH_SCHEMES: &[&str] = &["file", "http", "https"];

/// Resolver rooted at a base directory
#[derive(Debug, Clone)]
pub struct FsResourceResolver {
    base_dir: PathBuf,
}

impl FsResourceResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Scheme of a URI-like reference, if it has one.
    /// Single letters are treated as Windows drive prefixes, not schemes.
    fn scheme(reference: &str) -> Option<&str> {
        let (scheme, _) = reference.split_once("://")?;
        let valid = scheme.len() > 1
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        valid.then_some(scheme)
    }
}

impl ResourceResolver for FsResourceResolver {
    fn remap(&self, reference: &str) -> Result<String, ResolveError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(ResolveError::Empty);
        }

        if let Some(scheme) = Self::scheme(reference) {
            let lower = scheme.to_ascii_lowercase();
            return if PASSTHROUGH_SCHEMES.contains(&lower.as_str()) {
                Ok(reference.to_string())
            } else {
                Err(ResolveError::UnsupportedScheme(scheme.to_string()))
            };
        }

        if reference.contains("://") {
            return Err(ResolveError::Malformed(reference.to_string()));
        }

        let path = Path::new(reference);
        if path.is_absolute() {
            return Ok(reference.to_string());
        }

        Ok(self.base_dir.join(path).to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> FsResourceResolver {
        FsResourceResolver::new("/srv/voice")
    }

    #[test]
    fn relative_path_joins_base_dir() {
        assert_eq!(
            resolver().remap("memos/a.wav").unwrap(),
            "/srv/voice/memos/a.wav"
        );
    }

    #[test]
    fn absolute_path_passes_through() {
        assert_eq!(resolver().remap("/tmp/a.wav").unwrap(), "/tmp/a.wav");
    }

    #[test]
    fn known_schemes_pass_through() {
        let r = resolver();
        assert_eq!(r.remap("file:///a/b.wav").unwrap(), "file:///a/b.wav");
        assert_eq!(r.remap("http://host/a.wav").unwrap(), "http://host/a.wav");
        assert_eq!(r.remap("HTTPS://host/a.wav").unwrap(), "HTTPS://host/a.wav");
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        assert_eq!(
            resolver().remap("content://media/1"),
            Err(ResolveError::UnsupportedScheme("content".to_string()))
        );
    }

    #[test]
    fn empty_reference_is_rejected() {
        assert_eq!(resolver().remap("   "), Err(ResolveError::Empty));
    }

    #[test]
    fn malformed_scheme_is_rejected() {
        assert!(matches!(
            resolver().remap("bad scheme://x"),
            Err(ResolveError::Malformed(_))
        ));
    }
}
