//! API credential and its single-entry durable store
//!
//! The credential is read once at startup and written when the user submits
//! one. Nothing else is persisted.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from credential handling
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("API key is empty")]
    Empty,

    #[error("Failed to access credential file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Credential file {path} is malformed: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A non-empty API key
///
/// Debug and Display never print the raw value; use [`Credential::expose`]
/// at the single point where it goes on the wire.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Trim and validate a user-supplied key
    pub fn new(raw: impl Into<String>) -> Result<Self, CredentialError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CredentialError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The raw key
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Short masked form for display, e.g. `AIza…9xQk`
    pub fn redacted(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 12 {
            return "*".repeat(chars.len().min(8));
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}…{}", head, tail)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({})", self.redacted())
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// Durable home for the one credential the app keeps
pub trait CredentialStore: Send {
    /// Read the stored credential, if any
    fn load(&self) -> Result<Option<Credential>, CredentialError>;

    /// Replace the stored credential
    fn save(&mut self, credential: &Credential) -> Result<(), CredentialError>;

    /// Remove the stored credential
    fn clear(&mut self) -> Result<(), CredentialError>;
}

/// On-disk layout: `{"api-key": "..."}`
#[derive(Debug, Serialize, Deserialize)]
struct StoredCredential {
    #[serde(rename = "api-key")]
    api_key: String,
}

/// JSON file store, written with owner-only permissions on Unix
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> CredentialError {
        CredentialError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credential>, CredentialError> {
        debug!(path = %self.path.display(), "FileCredentialStore::load: called");
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("FileCredentialStore::load: no credential file");
                return Ok(None);
            }
            Err(e) => return Err(self.io_err(e)),
        };

        let stored: StoredCredential = serde_json::from_str(&content).map_err(|source| CredentialError::Format {
            path: self.path.clone(),
            source,
        })?;

        // A blank entry reads as "no credential" rather than an error
        Ok(Credential::new(stored.api_key).ok())
    }

    fn save(&mut self, credential: &Credential) -> Result<(), CredentialError> {
        debug!(path = %self.path.display(), "FileCredentialStore::save: called");
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }

        let stored = StoredCredential {
            api_key: credential.expose().to_string(),
        };
        let body = serde_json::to_string_pretty(&stored).map_err(|source| CredentialError::Format {
            path: self.path.clone(),
            source,
        })?;
        let mut file = open_owner_only(&self.path).map_err(|e| self.io_err(e))?;

        // The mode above only applies to a newly created file
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)).map_err(|e| self.io_err(e))?;
        }

        file.write_all(body.as_bytes()).map_err(|e| self.io_err(e))?;

        info!(path = %self.path.display(), "Credential saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), CredentialError> {
        debug!(path = %self.path.display(), "FileCredentialStore::clear: called");
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Credential removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_err(e)),
        }
    }
}

/// Open `path` for a fresh write, creating it readable by the owner only
fn open_owner_only(path: &Path) -> std::io::Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}

/// In-memory store, for embedding and tests
#[derive(Debug, Default, Clone)]
pub struct MemoryCredentialStore {
    value: Option<Credential>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            value: Some(credential),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credential>, CredentialError> {
        Ok(self.value.clone())
    }

    fn save(&mut self, credential: &Credential) -> Result<(), CredentialError> {
        self.value = Some(credential.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), CredentialError> {
        self.value = None;
        Ok(())
    }
}
