//! Session cache: a fail-open shadow of verified token claims.

pub mod cache;

pub use cache::{CachedSession, SessionCache, SessionStore};
