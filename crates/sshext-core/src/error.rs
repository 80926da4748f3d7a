use thiserror::Error;
use tokio::sync::mpsc;

use crate::request::GlobalRequest;

/// Errors produced by the extension layer.
#[derive(Debug, Error)]
pub enum SshextError {
    #[error("codec error: {0}")]
    Codec(String),

    #[error("unknown key: {0}")]
    UnknownKey(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("channel closed: {0}")]
    ChannelClosed(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ssh_key::Error> for SshextError {
    fn from(e: ssh_key::Error) -> Self {
        SshextError::Codec(e.to_string())
    }
}

impl From<ssh_encoding::Error> for SshextError {
    fn from(e: ssh_encoding::Error) -> Self {
        SshextError::Codec(e.to_string())
    }
}

pub type SshextResult<T> = Result<T, SshextError>;

/// The host key announcement could not be sent.
///
/// Filtering never started; `requests` is the raw stream, untouched, so the
/// caller can keep serving it.
#[derive(Debug, Error)]
#[error("failed to announce host keys: {source}")]
pub struct AnnounceError {
    #[source]
    pub source: SshextError,
    pub requests: mpsc::Receiver<GlobalRequest>,
}
