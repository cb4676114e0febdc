use thiserror::Error;

use crate::core::config::UploadConfig;

/// Why an upload was turned away. The `Display` strings are shown to the
/// user verbatim on the upload form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadRejection {
    #[error("Invalid file type. Only image files are allowed.")]
    InvalidType,

    #[error("File size exceeds the limit of {limit_mb} MB.")]
    TooLarge { limit_mb: usize },
}

/// Immutable upload acceptance policy, built from config at startup and
/// injected into the handlers.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    allowed_types: Vec<String>,
    max_bytes: usize,
}

impl UploadPolicy {
    pub fn new(allowed_types: Vec<String>, max_bytes: usize) -> Self {
        Self {
            allowed_types,
            max_bytes,
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.allowed_types.clone(), config.max_bytes)
    }

    pub fn allowed_types(&self) -> &[String] {
        &self.allowed_types
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn max_megabytes(&self) -> usize {
        self.max_bytes / (1024 * 1024)
    }

    /// Decide whether a payload is acceptable from its declared MIME type
    /// and byte size. The declared type is trusted as-is; the bytes are
    /// never sniffed. Type is checked before size, first failure wins.
    pub fn check(&self, content_type: &str, byte_size: usize) -> Result<(), UploadRejection> {
        if !self.allowed_types.iter().any(|t| t.as_str() == content_type) {
            return Err(UploadRejection::InvalidType);
        }

        if byte_size > self.max_bytes {
            return Err(UploadRejection::TooLarge {
                limit_mb: self.max_megabytes(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> UploadPolicy {
        UploadPolicy::new(
            vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/gif".to_string(),
            ],
            5 * 1024 * 1024,
        )
    }

    #[test]
    fn test_allowed_types_accepted() {
        let policy = policy();
        assert!(policy.check("image/jpeg", 10).is_ok());
        assert!(policy.check("image/png", 10).is_ok());
        assert!(policy.check("image/gif", 10).is_ok());
    }

    #[test]
    fn test_disallowed_type_rejected_regardless_of_size() {
        let policy = policy();
        assert_eq!(
            policy.check("application/pdf", 10),
            Err(UploadRejection::InvalidType)
        );
        assert_eq!(
            policy.check("text/html", 0),
            Err(UploadRejection::InvalidType)
        );
        // Type is checked first, even when the size would also fail
        assert_eq!(
            policy.check("application/pdf", 100 * 1024 * 1024),
            Err(UploadRejection::InvalidType)
        );
    }

    #[test]
    fn test_size_limit_boundary() {
        let policy = policy();
        assert!(policy.check("image/png", 5 * 1024 * 1024).is_ok());
        assert_eq!(
            policy.check("image/png", 5 * 1024 * 1024 + 1),
            Err(UploadRejection::TooLarge { limit_mb: 5 })
        );
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(
            UploadRejection::InvalidType.to_string(),
            "Invalid file type. Only image files are allowed."
        );
        assert_eq!(
            UploadRejection::TooLarge { limit_mb: 5 }.to_string(),
            "File size exceeds the limit of 5 MB."
        );
    }
}
