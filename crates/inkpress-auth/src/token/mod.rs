//! Session token types and codec.

pub mod codec;

pub use codec::{InvalidToken, SessionClaims, TokenCodec};
