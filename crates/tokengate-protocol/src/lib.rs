//! Wire protocol for the Tokengate session API.
//!
//! This crate defines what the client and the remote session service
//! say to each other:
//!
//! - **Types** ([`Endpoint`], [`Credentials`], [`ApiResponse`], ...):
//!   the request bodies and the decoded response.
//! - **Api** ([`Api`]): builds a transport [`Request`](tokengate_transport::Request)
//!   for each operation and decodes what comes back.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how bodies are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! ```text
//! Transport (bytes) → Protocol (ApiResponse) → Session (token state)
//! ```

mod api;
mod codec;
mod error;
mod types;

pub use api::Api;
pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    ACCESS_GRANTED, ApiResponse, Credentials, DEFAULT_REJECTION, Endpoint,
    LogoutRequest,
};
