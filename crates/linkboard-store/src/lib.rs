//! In-memory stores for users, sessions, posts and comments.
//!
//! Every store owns one collection behind a single reader/writer lock.
//! Reads share the lock; any mutation holds the write lock for its whole
//! check-then-modify sequence.

pub mod comments;
pub mod error;
pub mod posts;
pub mod sessions;
pub mod users;

use std::sync::RwLock;

pub use comments::CommentStore;
pub use error::{Resource, StoreError};
pub use posts::PostStore;
pub use sessions::{Session, SessionManager};
pub use users::UserStore;

pub type Result<T> = std::result::Result<T, StoreError>;

/// A collection guarded by one lock. Access only happens inside a closure,
/// so the guard is dropped on every exit path, including `?` returns.
pub(crate) struct Table<T> {
    inner: RwLock<T>,
}

impl<T: Default> Default for Table<T> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(T::default()),
        }
    }
}

impl<T> Table<T> {
    pub(crate) fn with_read<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&T) -> Result<R>,
    {
        let guard = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        f(&guard)
    }

    pub(crate) fn with_write<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> Result<R>,
    {
        let mut guard = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        f(&mut guard)
    }
}
