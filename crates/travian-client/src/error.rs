//! Error types for the Travian client.
//!
//! Only transport failures, structural parse failures and authentication
//! failures are errors. Business-rule outcomes (capacity, affordability,
//! availability) are returned as values by the action functions.

/// Why a login attempt was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// The login endpoint answered without a nonce.
    MissingNonce,
    /// The nonce exchange answered without a bearer token.
    MissingToken,
    /// The dashboard has no active-player name element.
    PlayerNameMissing,
    /// The dashboard shows a different player than the one logging in.
    PlayerNameMismatch { expected: String, found: String },
}

impl std::fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthFailure::MissingNonce => write!(f, "cannot get the nonce"),
            AuthFailure::MissingToken => write!(f, "cannot get the token"),
            AuthFailure::PlayerNameMissing => write!(f, "cannot get the username"),
            AuthFailure::PlayerNameMismatch { expected, found } => {
                write!(f, "logged in as {found:?}, expected {expected:?}")
            }
        }
    }
}

/// All errors that can occur in the client.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A selector or pattern the page layout guarantees came back empty.
    #[error("Parse error: {what}")]
    Parse { what: String },

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("Login failed: {0}")]
    Authentication(AuthFailure),
}

impl Error {
    pub(crate) fn parse(what: impl Into<String>) -> Self {
        Error::Parse { what: what.into() }
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, Error>;
