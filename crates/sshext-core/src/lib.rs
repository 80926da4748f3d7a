//! sshext-core: OpenSSH global-request extensions for an established session.
//!
//! Provides the `no-more-sessions@openssh.com` gate, host key rotation
//! (`hostkeys-00@openssh.com` / `hostkeys-prove-00@openssh.com`), the packed
//! key/signature codec they share, and the transport trait they run over.

pub mod codec;
pub mod config;
pub mod error;
pub mod extensions;
pub mod gate;
pub mod identity;
pub mod prover;
pub mod request;
pub mod rotator;
pub mod transport;

// Re-export commonly used items at crate root.
pub use config::ExtensionConfig;
pub use error::{AnnounceError, SshextError, SshextResult};
pub use extensions::{install, Filtered};
pub use gate::{no_more_sessions, no_more_sessions_with_config};
pub use identity::{fingerprint, short_fingerprint, HostKey, HostKeySigner, HostKeys};
pub use prover::{prove, proof_message, verify_ownership};
pub use request::{GlobalRequest, ReplySink, RequestReply};
pub use rotator::{update_host_keys, update_host_keys_with_config};
pub use transport::Transport;
