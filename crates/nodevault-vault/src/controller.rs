// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault lifecycle controller.
//!
//! Owns the single session: the decrypted document and master password while
//! unlocked, the preferences at all times. State transitions go through one
//! async mutex; key derivation runs on the blocking pool.

use std::sync::{Arc, Weak};
use std::time::Duration;

use nodevault_config::model::VaultConfig;
use nodevault_core::{
    KeyValueStore, NodeVaultError, Preferences, PreferencesPatch, Record, VaultDocument,
};
use secrecy::SecretString;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::codec;
use crate::envelope::EncryptedEnvelope;
use crate::session::{Session, duplicate};

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "vault-data";

/// Upper bound on the auto-lock check period.
pub const MAX_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Controller settings, usually built from `[vault]` config.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub storage_key: String,
    pub check_interval: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            check_interval: MAX_CHECK_INTERVAL,
        }
    }
}

impl From<&VaultConfig> for ControllerSettings {
    fn from(config: &VaultConfig) -> Self {
        Self {
            storage_key: config.storage_key.clone(),
            check_interval: Duration::from_secs(config.auto_lock_check_secs),
        }
    }
}

struct Inner {
    store: Arc<dyn KeyValueStore>,
    storage_key: String,
    check_interval: Duration,
    session: Mutex<Session>,
}

impl Inner {
    /// Lock if the idle timeout has been reached. Returns true if it locked.
    async fn lock_if_idle(&self) -> bool {
        let mut session = self.session.lock().await;
        if session.idle_expired(Instant::now()) && session.end() {
            info!("vault auto-locked after inactivity");
            true
        } else {
            false
        }
    }
}

/// Handle to the vault session. Cheap to clone; clones share the session.
#[derive(Clone)]
pub struct VaultController {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for VaultController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultController")
            .field("storage_key", &self.inner.storage_key)
            .field("check_interval", &self.inner.check_interval)
            .field("session", &"[REDACTED]")
            .finish()
    }
}

impl VaultController {
    /// Create a locked controller over `store`.
    ///
    /// The check interval is clamped to `1s..=60s`.
    pub fn new(store: Arc<dyn KeyValueStore>, settings: ControllerSettings) -> Self {
        let check_interval = settings
            .check_interval
            .clamp(Duration::from_secs(1), MAX_CHECK_INTERVAL);
        Self {
            inner: Arc::new(Inner {
                store,
                storage_key: settings.storage_key,
                check_interval,
                session: Mutex::new(Session::new()),
            }),
        }
    }

    pub fn from_config(store: Arc<dyn KeyValueStore>, config: &VaultConfig) -> Self {
        Self::new(store, ControllerSettings::from(config))
    }

    /// Whether an envelope exists under the storage key.
    pub async fn has_stored_vault(&self) -> Result<bool, NodeVaultError> {
        Ok(self.inner.store.get(&self.inner.storage_key).await?.is_some())
    }

    pub async fn is_locked(&self) -> bool {
        self.inner.session.lock().await.is_locked()
    }

    /// Unlock with the master password.
    ///
    /// With nothing stored this is a first run: the vault starts empty and
    /// `password` becomes the master password. Any failure to open a stored
    /// envelope is reported as [`NodeVaultError::InvalidPassword`].
    pub async fn unlock(&self, password: SecretString) -> Result<(), NodeVaultError> {
        let mut session = self.inner.session.lock().await;
        if !session.is_locked() {
            return Err(NodeVaultError::AlreadyUnlocked);
        }

        let document = match self.inner.store.get(&self.inner.storage_key).await? {
            None => {
                info!("no stored vault found, starting a new one");
                VaultDocument::with_preferences(session.preferences().clone())
            }
            Some(text) => {
                let pw = duplicate(&password);
                match run_blocking(move || codec::open_str(&text, &pw)).await {
                    Ok(document) => document,
                    Err(_) => {
                        warn!("vault unlock rejected");
                        return Err(NodeVaultError::InvalidPassword);
                    }
                }
            }
        };

        let token = CancellationToken::new();
        session.begin(document, password, Instant::now(), token.clone());
        drop(session);

        self.spawn_auto_lock(token);
        info!("vault unlocked");
        Ok(())
    }

    /// Lock the vault. Returns false if it was already locked.
    pub async fn lock(&self) -> bool {
        let locked = self.inner.session.lock().await.end();
        if locked {
            info!("vault locked");
        }
        locked
    }

    /// Record user activity. No effect while locked.
    pub async fn touch(&self) {
        self.inner.session.lock().await.touch(Instant::now());
    }

    /// Run one auto-lock check now. Returns true if the vault was locked.
    pub async fn check_auto_lock(&self) -> bool {
        self.inner.lock_if_idle().await
    }

    /// Seal the document under the master password and persist it.
    pub async fn save(&self) -> Result<(), NodeVaultError> {
        let mut session = self.inner.session.lock().await;
        let (document, password) = session.snapshot()?;
        session.touch(Instant::now());

        let text = run_blocking(move || codec::seal(&document, &password)?.to_json())
            .await
            .map_err(save_error)?;
        self.inner
            .store
            .set(&self.inner.storage_key, &text)
            .await
            .map_err(save_error)?;

        info!("vault saved");
        Ok(())
    }

    /// Seal the document under the master password without storing it.
    pub async fn export(&self) -> Result<EncryptedEnvelope, NodeVaultError> {
        let mut session = self.inner.session.lock().await;
        let (document, password) = session.snapshot()?;
        session.touch(Instant::now());

        let envelope = run_blocking(move || codec::seal(&document, &password)).await?;
        info!("vault exported");
        Ok(envelope)
    }

    /// Replace the in-memory document with one opened from `envelope_text`
    /// under `password`. The master password is unchanged.
    pub async fn import(
        &self,
        envelope_text: &str,
        password: SecretString,
    ) -> Result<(), NodeVaultError> {
        let mut session = self.inner.session.lock().await;
        if session.is_locked() {
            return Err(NodeVaultError::Locked);
        }

        let text = envelope_text.to_string();
        let document = run_blocking(move || codec::open_str(&text, &password))
            .await
            .map_err(|e| {
                debug!(error = %e, "import failed");
                NodeVaultError::Import {
                    source: Box::new(e),
                }
            })?;

        *session.document_mut(Instant::now())? = document;
        info!("vault imported");
        Ok(())
    }

    /// Add a record and return its new id.
    pub async fn add<R: Record>(&self, draft: R::Draft) -> Result<String, NodeVaultError> {
        let mut session = self.inner.session.lock().await;
        let id = session.document_mut(Instant::now())?.insert::<R>(draft);
        debug!(kind = %R::KIND, %id, "record added");
        Ok(id)
    }

    pub async fn update<R: Record>(&self, id: &str, patch: R::Patch) -> Result<(), NodeVaultError> {
        let mut session = self.inner.session.lock().await;
        session.document_mut(Instant::now())?.update::<R>(id, patch)?;
        debug!(kind = %R::KIND, id, "record updated");
        Ok(())
    }

    pub async fn delete<R: Record>(&self, id: &str) -> Result<(), NodeVaultError> {
        let mut session = self.inner.session.lock().await;
        session.document_mut(Instant::now())?.remove::<R>(id)?;
        debug!(kind = %R::KIND, id, "record deleted");
        Ok(())
    }

    /// Delete every record of kind `R` whose id is listed. Unknown ids are
    /// skipped; returns the number removed.
    pub async fn delete_many<R: Record>(&self, ids: &[String]) -> Result<usize, NodeVaultError> {
        let mut session = self.inner.session.lock().await;
        let removed = session.document_mut(Instant::now())?.remove_many::<R>(ids);
        debug!(kind = %R::KIND, removed, "records deleted");
        Ok(removed)
    }

    pub async fn records<R: Record>(&self) -> Result<Vec<R>, NodeVaultError> {
        let session = self.inner.session.lock().await;
        Ok(session.document()?.records::<R>().to_vec())
    }

    /// Records of kind `R` matching `term` case-insensitively.
    pub async fn search<R: Record>(&self, term: &str) -> Result<Vec<R>, NodeVaultError> {
        let session = self.inner.session.lock().await;
        Ok(session
            .document()?
            .records::<R>()
            .iter()
            .filter(|r| r.matches(term))
            .cloned()
            .collect())
    }

    /// Snapshot of the whole decrypted document.
    pub async fn document(&self) -> Result<VaultDocument, NodeVaultError> {
        Ok(self.inner.session.lock().await.document()?.clone())
    }

    /// Current preferences. Available while locked.
    pub async fn preferences(&self) -> Preferences {
        self.inner.session.lock().await.preferences().clone()
    }

    pub async fn update_preferences(&self, patch: PreferencesPatch) -> Result<(), NodeVaultError> {
        let mut session = self.inner.session.lock().await;
        session
            .document_mut(Instant::now())?
            .preferences
            .apply(patch)?;
        debug!("preferences updated");
        Ok(())
    }

    /// Start the periodic idle check for the current unlock.
    ///
    /// The task holds only a weak reference, and stops when `token` is
    /// cancelled (on lock or when the session is dropped).
    fn spawn_auto_lock(&self, token: CancellationToken) {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let period = self.inner.check_interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("auto-lock timer stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        if token.is_cancelled() {
                            break;
                        }
                        let Some(inner) = weak.upgrade() else {
                            break;
                        };
                        if inner.lock_if_idle().await {
                            break;
                        }
                    }
                }
            }
        });
    }
}

fn save_error(e: NodeVaultError) -> NodeVaultError {
    debug!(error = %e, "save failed");
    NodeVaultError::Save {
        source: Box::new(e),
    }
}

/// Run CPU-bound codec work on the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T, NodeVaultError>
where
    F: FnOnce() -> Result<T, NodeVaultError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| NodeVaultError::Internal(format!("codec task failed: {e}")))?
}
