//! Bearer token persistence
//!
//! The token is the only client state that survives a restart. It lives in a
//! single file (mode 600 on Unix) and is held in memory as a `SecretString`.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use crate::error::{ConfigError, Result};

/// File-backed bearer token store
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the token, preferring `VILLASTAY_TOKEN` over the file
    ///
    /// Returns `Ok(None)` when neither is present; requests then go out
    /// with an empty bearer value and the backend decides.
    pub fn load(&self) -> Result<Option<SecretString>> {
        if let Ok(token) = std::env::var("VILLASTAY_TOKEN") {
            let token = token.trim().to_string();
            if !token.is_empty() {
                return Ok(Some(SecretString::from(token)));
            }
        }

        if !self.path.exists() {
            return Ok(None);
        }
        reject_symlink(&self.path)?;

        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            ConfigError::Token(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        let token = raw.trim().to_string();
        if token.is_empty() {
            return Ok(None);
        }
        tracing::debug!(path = %self.path.display(), "Loaded bearer token");
        Ok(Some(SecretString::from(token)))
    }

    /// Persist a token, replacing any previous one
    pub fn save(&self, token: &str) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ConfigError::Token("refusing to store an empty token".to_string()).into());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Token(format!("cannot create {}: {}", parent.display(), e)))?;
        }
        std::fs::write(&self.path, token)
            .map_err(|e| ConfigError::Token(format!("cannot write {}: {}", self.path.display(), e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms)
                .map_err(|e| ConfigError::Token(format!("cannot chmod {}: {}", self.path.display(), e)))?;
        }

        tracing::debug!(path = %self.path.display(), "Stored bearer token");
        Ok(())
    }

    /// Remove the stored token (logout). Missing file is fine.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).map_err(|e| {
                ConfigError::Token(format!("cannot remove {}: {}", self.path.display(), e))
            })?;
            tracing::debug!(path = %self.path.display(), "Removed bearer token");
        }
        Ok(())
    }
}

fn reject_symlink(path: &Path) -> Result<()> {
    let metadata = std::fs::symlink_metadata(path)
        .map_err(|e| ConfigError::Token(format!("cannot stat {}: {}", path.display(), e)))?;
    if metadata.file_type().is_symlink() {
        return Err(ConfigError::Token(format!(
            "{} is a symlink; refusing to read the token through it",
            path.display()
        ))
        .into());
    }
    Ok(())
}
