use std::fs;
use std::path::PathBuf;

/// Name of the single persisted entry holding the raw credential.
pub const CREDENTIAL_KEY: &str = "access_token";

/// Durable storage for the raw credential string.
///
/// Exactly one entry exists, keyed by [`CREDENTIAL_KEY`]. Only the session
/// manager writes it; it is read once at startup during rehydration. Storage
/// failures are a convenience gap rather than a security problem, so
/// implementations log and degrade to "no credential" instead of failing.
pub trait CredentialStore {
    /// Reads the stored credential, if one exists.
    fn load(&self) -> Option<String>;
    /// Persists the credential, replacing any previous value.
    fn save(&mut self, credential: &str);
    /// Removes the stored credential. Must be idempotent.
    fn clear(&mut self);
}

/// Credential store backed by a single file named [`CREDENTIAL_KEY`] under a
/// caller-supplied directory.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store rooted at `dir`. The directory is created lazily on
    /// first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(CREDENTIAL_KEY),
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.path.display(), "failed to read stored credential: {e}");
                None
            }
        }
    }

    fn save(&mut self, credential: &str) {
        if let Some(parent) = self.path.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warn!(path = %parent.display(), "failed to create credential directory: {e}");
            return;
        }
        if let Err(e) = fs::write(&self.path, credential) {
            warn!(path = %self.path.display(), "failed to persist credential: {e}");
        }
    }

    fn clear(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.path.display(), "failed to clear stored credential: {e}");
            }
        }
    }
}

/// In-memory credential store, for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    credential: Option<String>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a credential, as if persisted by a
    /// previous run.
    #[must_use]
    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            credential: Some(credential.into()),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<String> {
        self.credential.clone()
    }

    fn save(&mut self, credential: &str) {
        self.credential = Some(credential.to_string());
    }

    fn clear(&mut self) {
        self.credential = None;
    }
}
