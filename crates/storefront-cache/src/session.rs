//! Admin session flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CacheError, LocalStore};

/// Store key holding the admin flag.
pub const ADMIN_FLAG_KEY: &str = "adminAuthenticated";

/// Marker written after a successful password check.
///
/// This is a client-side convenience flag, not a credential. The backend
/// does not consult it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminFlag {
    pub authenticated: bool,
    pub since: DateTime<Utc>,
}

impl AdminFlag {
    pub fn now() -> Self {
        Self {
            authenticated: true,
            since: Utc::now(),
        }
    }
}

/// Admin session gate backed by a [`LocalStore`].
#[derive(Debug)]
pub struct AdminSession {
    store: LocalStore,
}

impl AdminSession {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// The stored flag, if any. An unreadable entry counts as absent.
    pub fn flag(&self) -> Option<AdminFlag> {
        match self.store.get::<AdminFlag>(ADMIN_FLAG_KEY) {
            Ok(flag) => flag,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable admin flag");
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.flag().is_some_and(|f| f.authenticated)
    }

    /// Record a successful login.
    pub fn mark_authenticated(&mut self) -> Result<AdminFlag, CacheError> {
        let flag = AdminFlag::now();
        self.store.set(ADMIN_FLAG_KEY, &flag)?;
        tracing::info!("admin session started");
        Ok(flag)
    }

    /// Forget the login.
    pub fn clear(&mut self) -> Result<(), CacheError> {
        if self.store.delete(ADMIN_FLAG_KEY)? {
            tracing::info!("admin session cleared");
        }
        Ok(())
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }
}
