//! Shared-password gate
//!
//! The service guards its admin screens with a single shared password kept
//! in a file on the server. This module only answers "does this password
//! match"; sessions and tokens are out of scope.

use crate::error::{DrawError, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Trait for password verification services
#[async_trait]
pub trait PasswordVerifier: Send + Sync {
    /// Check a supplied password against the configured one
    async fn verify(&self, supplied: &str) -> Result<bool>;
}

/// Verifier that reads the expected password from a file on every check
///
/// Surrounding whitespace in both the file and the supplied password is
/// ignored, so a trailing newline in the file does not matter.
pub struct FilePasswordVerifier {
    path: PathBuf,
}

impl FilePasswordVerifier {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PasswordVerifier for FilePasswordVerifier {
    async fn verify(&self, supplied: &str) -> Result<bool> {
        let expected = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Password file {} not found", self.path.display());
                return Err(DrawError::ConfigurationError {
                    message: "Password file not found on server".to_string(),
                }
                .into());
            }
            Err(e) => {
                return Err(DrawError::ConfigurationError {
                    message: format!("Failed to read password file: {}", e),
                }
                .into());
            }
        };

        let valid = supplied.trim() == expected.trim();
        debug!("Password check against {}: {}", self.path.display(), valid);
        Ok(valid)
    }
}

/// Verifier with a fixed password (for testing)
pub struct StaticPasswordVerifier {
    password: String,
}

impl StaticPasswordVerifier {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }
}

#[async_trait]
impl PasswordVerifier for StaticPasswordVerifier {
    async fn verify(&self, supplied: &str) -> Result<bool> {
        Ok(supplied.trim() == self.password.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_verifier_trims_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("password.txt");
        std::fs::write(&path, "s3cret\n").unwrap();

        let verifier = FilePasswordVerifier::new(&path);
        assert!(verifier.verify("s3cret").await.unwrap());
        assert!(verifier.verify("  s3cret ").await.unwrap());
        assert!(!verifier.verify("wrong").await.unwrap());
    }

    #[tokio::test]
    async fn test_file_verifier_missing_file() {
        let verifier = FilePasswordVerifier::new("/nonexistent/password.txt");
        let err = verifier.verify("anything").await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DrawError>(),
            Some(DrawError::ConfigurationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_is_reread_on_every_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("password.txt");
        std::fs::write(&path, "first").unwrap();

        let verifier = FilePasswordVerifier::new(&path);
        assert!(verifier.verify("first").await.unwrap());

        std::fs::write(&path, "second").unwrap();
        assert!(!verifier.verify("first").await.unwrap());
        assert!(verifier.verify("second").await.unwrap());
    }

    #[tokio::test]
    async fn test_static_verifier() {
        let verifier = StaticPasswordVerifier::new("letmein");
        assert!(verifier.verify("letmein").await.unwrap());
        assert!(!verifier.verify("").await.unwrap());
    }
}
