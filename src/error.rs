// src/error.rs
//
// Library error types. Binaries flatten these into Box<dyn Error> at the edge.

use thiserror::Error;

/// Problems inside a serialized graph document.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unknown sentinel index {0}")]
    UnknownSentinel(i64),

    #[error("slot {slot}: reference {value} is not an integer index")]
    BadReference { slot: usize, value: String },

    #[error("slot {slot}: reference {target} is past the end of the slot table")]
    DanglingReference { slot: usize, target: i64 },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Problems talking to the proxy.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {code} from {url}")]
    Status { code: u16, url: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("failed to read response body: {0}")]
    Body(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("unrecognized payload shape for {0}")]
    Shape(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
