//! Error taxonomy for API calls
//!
//! The client resolves authentication failures itself (refresh + retry)
//! and only surfaces what it could not fix. `SessionExpired` and
//! `AuthenticationFailed` mean the token holder has been cleared and the
//! user must log in again; everything else leaves the credential alone
//! and is the caller's problem to present.

/// Errors from API client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing base URL or invalid caller input. Raised before any
    /// network call.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request never produced an HTTP response (DNS, TLS, connect, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx outside the auth path. The credential is untouched.
    #[error("request failed: {status} {status_text}")]
    RequestFailed {
        status: u16,
        status_text: String,
        body: String,
    },

    /// 401, refresh succeeded, but the retried request still failed.
    /// The credential has been cleared.
    #[error("authentication failed: retry returned {status}")]
    AuthenticationFailed { status: u16, body: String },

    /// 401 and the refresh grant was rejected. The credential has been
    /// cleared; the user must log in again.
    #[error("session expired, please log in again")]
    SessionExpired,

    /// 2xx response whose body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl Error {
    /// HTTP status attached to this error, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::RequestFailed { status, .. } | Error::AuthenticationFailed { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

impl From<common::Error> for Error {
    fn from(e: common::Error) -> Self {
        match e {
            common::Error::Config(msg) => Error::Config(msg),
            other => Error::Config(other.to_string()),
        }
    }
}

/// Result alias for API client operations.
pub type Result<T> = std::result::Result<T, Error>;
