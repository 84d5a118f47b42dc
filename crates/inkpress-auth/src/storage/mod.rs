//! Storage traits for auth-related data.
//!
//! Backends implement these traits; the core never assumes a concrete
//! store. An in-memory implementation lives in `inkpress-db-memory`.

pub mod user;

pub use user::{User, UserBuilder, UserStorage};
