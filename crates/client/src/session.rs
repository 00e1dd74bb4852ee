//! Session store: the one persisted bearer credential.
//!
//! The credential lives in a durable [`CredentialSlot`] and is mirrored in
//! memory so every outgoing request can read it without touching storage.
//! Presence is all the store knows about; whether the backend still accepts
//! the token is only discovered when a call is rejected.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{Mutex as AsyncMutex, RwLock};

/// Errors from the durable credential slot.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the slot failed.
    #[error("session storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The slot holds something that is not a session record.
    #[error("session storage at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An empty string was offered as a credential.
    #[error("credential cannot be empty")]
    EmptyCredential,

    /// The in-memory slot lock was poisoned by a panicking writer.
    #[error("session storage lock poisoned")]
    Poisoned,

    /// The blocking storage task panicked or was cancelled.
    #[error("session storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A durable key-value slot holding at most one token.
///
/// Implementations must make `store` and `clear` durable before returning.
pub trait CredentialSlot: Send + Sync + fmt::Debug {
    /// Read the persisted token, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the slot cannot be read.
    fn load(&self) -> Result<Option<String>, SessionError>;

    /// Persist `token`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the slot cannot be written.
    fn store(&self, token: &str) -> Result<(), SessionError>;

    /// Remove the persisted token. Clearing an empty slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the slot cannot be written.
    fn clear(&self) -> Result<(), SessionError>;
}

// =============================================================================
// Slots
// =============================================================================

#[derive(Serialize, Deserialize)]
struct SessionRecord {
    token: String,
}

/// A slot backed by a small JSON file, e.g. `.atelier/session.json`.
///
/// Writes go to a sibling temp file that is renamed into place, so a crash
/// never leaves a half-written token behind. On Unix the file is created
/// with mode `0600`.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    /// A slot stored at `path`. Parent directories are created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CredentialSlot for FileSlot {
    fn load(&self) -> Result<Option<String>, SessionError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        let record: SessionRecord =
            serde_json::from_str(&raw).map_err(|source| SessionError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(record.token).filter(|t| !t.is_empty()))
    }

    fn store(&self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let body = serde_json::to_vec(&SessionRecord {
            token: token.to_owned(),
        })
        .map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.path.with_extension("tmp");
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&tmp).map_err(|e| self.io_error(e))?;
        file.write_all(&body).map_err(|e| self.io_error(e))?;
        file.sync_all().map_err(|e| self.io_error(e))?;
        drop(file);
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// A slot that lives only as long as the process. Used in tests and for
/// one-shot runs that should not leave a token on disk.
#[derive(Debug, Default)]
pub struct MemorySlot {
    token: Mutex<Option<String>>,
}

impl CredentialSlot for MemorySlot {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.token.lock().map_err(|_| SessionError::Poisoned)?.clone())
    }

    fn store(&self, token: &str) -> Result<(), SessionError> {
        *self.token.lock().map_err(|_| SessionError::Poisoned)? = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.token.lock().map_err(|_| SessionError::Poisoned)? = None;
        Ok(())
    }
}

// =============================================================================
// Store
// =============================================================================

/// Process-wide holder of the bearer credential.
///
/// Cheap to clone; clones share the same credential. Slot I/O runs on the
/// blocking pool and never holds the lock requests read the token through.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    slot: Box<dyn CredentialSlot>,
    token: RwLock<Option<SecretString>>,
    /// Serializes writers so the slot and `token` change in the same order.
    writer: AsyncMutex<()>,
}

impl SessionStore {
    /// Open a store over `slot`, loading any credential persisted earlier.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the slot cannot be read.
    pub fn open(slot: impl CredentialSlot + 'static) -> Result<Self, SessionError> {
        let token = slot.load()?.map(SecretString::from);
        tracing::debug!(restored = token.is_some(), "Session store opened");
        Ok(Self {
            inner: Arc::new(SessionInner {
                slot: Box::new(slot),
                token: RwLock::new(token),
                writer: AsyncMutex::new(()),
            }),
        })
    }

    /// A store backed by a fresh [`MemorySlot`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(SessionInner {
                slot: Box::new(MemorySlot::default()),
                token: RwLock::new(None),
                writer: AsyncMutex::new(()),
            }),
        }
    }

    /// Persist `token` as the current credential.
    ///
    /// Nothing changes if persisting fails.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyCredential`] for an empty token, or the
    /// slot's error if it cannot be written.
    pub async fn set_credential(&self, token: impl Into<String>) -> Result<(), SessionError> {
        let token = token.into();
        if token.is_empty() {
            return Err(SessionError::EmptyCredential);
        }
        let _writer = self.inner.writer.lock().await;
        let token = self
            .on_slot(move |slot| slot.store(&token).map(|()| token))
            .await?;
        *self.inner.token.write().await = Some(SecretString::from(token));
        tracing::debug!("Credential stored");
        Ok(())
    }

    /// The current credential, if one is set.
    pub async fn credential(&self) -> Option<SecretString> {
        self.inner.token.read().await.clone()
    }

    /// Forget the credential.
    ///
    /// The in-memory copy is always dropped, even if the slot cannot be
    /// cleared, so the process stops sending it immediately.
    ///
    /// # Errors
    ///
    /// Returns the slot's error if the persisted copy could not be removed.
    pub async fn clear_credential(&self) -> Result<(), SessionError> {
        let _writer = self.inner.writer.lock().await;
        *self.inner.token.write().await = None;
        let result = self.on_slot(|slot| slot.clear()).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Credential dropped from memory but not from storage");
        } else {
            tracing::debug!("Credential cleared");
        }
        result
    }

    /// Whether a credential is present. Does not contact the backend.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.token.read().await.is_some()
    }

    /// Run a slot operation on the blocking pool.
    async fn on_slot<R, F>(&self, op: F) -> Result<R, SessionError>
    where
        R: Send + 'static,
        F: FnOnce(&dyn CredentialSlot) -> Result<R, SessionError> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || op(inner.slot.as_ref())).await?
    }

    /// Run `f` with the exposed token, if any.
    pub(crate) async fn with_token<R>(&self, f: impl FnOnce(Option<&str>) -> R) -> R {
        let guard = self.inner.token.read().await;
        f(guard.as_ref().map(|t| t.expose_secret()))
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("slot", &self.inner.slot)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use super::*;

    /// A slot whose writes take a while, like a slow disk.
    #[derive(Debug, Default)]
    struct SlowSlot(MemorySlot);

    impl CredentialSlot for SlowSlot {
        fn load(&self) -> Result<Option<String>, SessionError> {
            self.0.load()
        }

        fn store(&self, token: &str) -> Result<(), SessionError> {
            std::thread::sleep(Duration::from_millis(300));
            self.0.store(token)
        }

        fn clear(&self) -> Result<(), SessionError> {
            self.0.clear()
        }
    }

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_session_path() -> PathBuf {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir()
            .join(format!("atelier-session-test-{}-{n}", std::process::id()))
            .join("session.json")
    }

    #[tokio::test]
    async fn test_set_then_get_returns_token() {
        let store = SessionStore::in_memory();
        store.set_credential("tok-123").await.unwrap();
        let token = store.credential().await.unwrap();
        assert_eq!(token.expose_secret(), "tok-123");
        assert!(store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_clear_then_get_is_absent() {
        let store = SessionStore::in_memory();
        store.set_credential("tok-123").await.unwrap();
        store.clear_credential().await.unwrap();
        assert!(store.credential().await.is_none());
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_empty_token_rejected() {
        let store = SessionStore::in_memory();
        assert!(matches!(
            store.set_credential("").await,
            Err(SessionError::EmptyCredential)
        ));
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_slow_storage_does_not_block_readers() {
        let store = SessionStore::open(SlowSlot::default()).unwrap();
        let writer = store.clone();
        let pending = tokio::spawn(async move { writer.set_credential("fresh").await });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let read = tokio::time::timeout(Duration::from_millis(100), store.is_authenticated()).await;
        assert_eq!(read.ok(), Some(false));

        pending.await.unwrap().unwrap();
        assert!(store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_clones_share_credential() {
        let store = SessionStore::in_memory();
        let view = store.clone();
        store.set_credential("shared").await.unwrap();
        assert!(view.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_file_slot_survives_reopen() {
        let path = temp_session_path();
        let store = SessionStore::open(FileSlot::new(&path)).unwrap();
        assert!(!store.is_authenticated().await);
        store.set_credential("persisted").await.unwrap();

        let reopened = SessionStore::open(FileSlot::new(&path)).unwrap();
        assert_eq!(reopened.credential().await.unwrap().expose_secret(), "persisted");

        reopened.clear_credential().await.unwrap();
        let again = SessionStore::open(FileSlot::new(&path)).unwrap();
        assert!(!again.is_authenticated().await);
    }

    #[test]
    fn test_file_slot_missing_file_is_empty() {
        let slot = FileSlot::new(temp_session_path());
        assert!(slot.load().unwrap().is_none());
        slot.clear().unwrap();
    }

    #[test]
    fn test_file_slot_corrupt_file() {
        let path = temp_session_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            FileSlot::new(&path).load(),
            Err(SessionError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let store = SessionStore::in_memory();
        let rendered = format!("{store:?}");
        assert!(rendered.contains("[REDACTED]"));
    }
}
