//! Authenticated HTTP client for the Reserva booking backend
//!
//! Wraps `reqwest` with bearer-token handling and a transparent
//! refresh-on-401 retry. This crate is a standalone library with no
//! knowledge of specific endpoints beyond the auth routes — the typed
//! API surface lives in `reserva-api`.
//!
//! Request flow:
//! 1. Caller builds an [`ApiRequest`] (method, path, optional JSON body)
//! 2. [`ApiClient::request`] joins the configured base URL and sends,
//!    attaching `Authorization: Bearer <token>` when one is held
//! 3. On 401 the client runs the refresh protocol once (coalesced across
//!    concurrent callers) and resends the original request once
//! 4. Unresolved auth failures clear the token holder so the UI can
//!    redirect to login; every other non-2xx passes through to the caller
//!
//! The access token lives in an injectable [`TokenHolder`]; the refresh
//! grant never touches this crate — it rides on an httpOnly cookie kept
//! by reqwest's cookie store.

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod refresh;
pub mod token;

pub use client::{ApiClient, ApiRequest, ResponseBody};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use token::TokenHolder;
