// src/error.rs
use reqwest::StatusCode;
use thiserror::Error;

/// Duplicate-key rejections the service reports in its error body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Conflict {
    /// Another allocator claimed the address between `allocate_free_ip`
    /// and `create_interface`. Fetch a fresh address and try again.
    #[error("address {0} is already in use, try again")]
    AddressInUse(String),

    #[error("username {0} already exists")]
    DuplicateUsername(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("error from tidyDNS server: {0}")]
    UnexpectedStatus(StatusCode),

    #[error("unable to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AmbiguousMatch(String),

    #[error("conflict: {0}")]
    Conflict(#[from] Conflict),

    #[error("unknown {kind}: {value}")]
    UnknownEnumValue { kind: &'static str, value: String },

    #[error("request cancelled")]
    Cancelled,
}

impl Error {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    pub fn ambiguous(msg: impl Into<String>) -> Self {
        Error::AmbiguousMatch(msg.into())
    }

    pub fn decode<E>(what: &'static str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Decode {
            what,
            source: Box::new(err),
        }
    }

    pub fn unknown_enum(kind: &'static str, value: impl ToString) -> Self {
        Error::UnknownEnumValue {
            kind,
            value: value.to_string(),
        }
    }

    /// True for the interface-creation race that callers resolve by
    /// re-polling for a free address.
    pub fn is_retryable_conflict(&self) -> bool {
        matches!(self, Error::Conflict(Conflict::AddressInUse(_)))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
