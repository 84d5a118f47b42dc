//! # inkpress-server
//!
//! HTTP server for the Inkpress blog CMS: configuration loading, tracing
//! setup, router assembly, and the server lifecycle. The auth core lives
//! in `inkpress-auth`; this crate wires it to the in-memory backends and
//! exposes the `/api/auth/*` endpoints.

pub mod config;
pub mod observability;
pub mod server;

pub use config::{AppConfig, ConfigLoadError, LoggingConfig, ServerConfig, load_config};
pub use server::{AppState, InkpressServer, build_app, build_state};
