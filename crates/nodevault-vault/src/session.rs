// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory session state behind the controller's mutex.

use std::time::Duration;

use nodevault_core::{NodeVaultError, Preferences, VaultDocument};
use secrecy::{ExposeSecret, SecretString};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Plaintext held only while unlocked.
struct Unlocked {
    document: VaultDocument,
    password: SecretString,
    last_activity: Instant,
    auto_lock: CancellationToken,
}

/// Locked or unlocked session, plus the preferences that outlive a lock.
pub(crate) struct Session {
    preferences: Preferences,
    /// Set once preferences were carried over a lock in this process.
    carried: bool,
    unlocked: Option<Unlocked>,
}

impl Session {
    pub(crate) fn new() -> Self {
        Self {
            preferences: Preferences::default(),
            carried: false,
            unlocked: None,
        }
    }

    pub(crate) fn is_locked(&self) -> bool {
        self.unlocked.is_none()
    }

    pub(crate) fn preferences(&self) -> &Preferences {
        match &self.unlocked {
            Some(u) => &u.document.preferences,
            None => &self.preferences,
        }
    }

    /// Enter the unlocked state. Preferences carried over a previous lock
    /// replace the document's own.
    pub(crate) fn begin(
        &mut self,
        mut document: VaultDocument,
        password: SecretString,
        now: Instant,
        auto_lock: CancellationToken,
    ) {
        if self.carried {
            document.preferences = self.preferences.clone();
        }
        self.unlocked = Some(Unlocked {
            document,
            password,
            last_activity: now,
            auto_lock,
        });
    }

    /// Drop the document and password, keep the preferences, stop the timer.
    /// Returns false if the session was already locked.
    pub(crate) fn end(&mut self) -> bool {
        match self.unlocked.take() {
            Some(u) => {
                u.auto_lock.cancel();
                self.preferences = u.document.preferences.clone();
                self.carried = true;
                true
            }
            None => false,
        }
    }

    pub(crate) fn document(&self) -> Result<&VaultDocument, NodeVaultError> {
        self.unlocked
            .as_ref()
            .map(|u| &u.document)
            .ok_or(NodeVaultError::Locked)
    }

    /// Mutable document access. Counts as user activity.
    pub(crate) fn document_mut(
        &mut self,
        now: Instant,
    ) -> Result<&mut VaultDocument, NodeVaultError> {
        let u = self.unlocked.as_mut().ok_or(NodeVaultError::Locked)?;
        u.last_activity = now;
        Ok(&mut u.document)
    }

    /// Copy of the document and master password for sealing off the lock.
    pub(crate) fn snapshot(&self) -> Result<(VaultDocument, SecretString), NodeVaultError> {
        let u = self.unlocked.as_ref().ok_or(NodeVaultError::Locked)?;
        Ok((u.document.clone(), duplicate(&u.password)))
    }

    /// Record user activity. No-op while locked.
    pub(crate) fn touch(&mut self, now: Instant) {
        if let Some(u) = self.unlocked.as_mut() {
            u.last_activity = now;
        }
    }

    /// Whether the idle time has reached the auto-lock timeout.
    pub(crate) fn idle_expired(&self, now: Instant) -> bool {
        match &self.unlocked {
            Some(u) => {
                let minutes = u64::from(u.document.preferences.auto_lock_minutes.get());
                let timeout = Duration::from_secs(minutes * 60);
                now.saturating_duration_since(u.last_activity) >= timeout
            }
            None => false,
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(u) = &self.unlocked {
            u.auto_lock.cancel();
        }
    }
}

/// Clone a secret for hand-off to a blocking task.
pub(crate) fn duplicate(password: &SecretString) -> SecretString {
    SecretString::from(password.expose_secret().to_owned())
}
