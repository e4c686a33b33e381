//! Local persistence for the storefront client.
//!
//! [`LocalStore`] is a small JSON-file key/value store, the terminal
//! counterpart of a browser's local storage. The admin page keeps its
//! session flag here.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_cache::{AdminSession, LocalStore};
//!
//! let mut session = AdminSession::new(LocalStore::open("session.json")?);
//! session.mark_authenticated()?;
//! assert!(session.is_authenticated());
//! ```

mod error;
mod kv;
mod session;

pub use error::CacheError;
pub use kv::LocalStore;
pub use session::{AdminFlag, AdminSession, ADMIN_FLAG_KEY};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{AdminFlag, AdminSession, CacheError, LocalStore};
}
