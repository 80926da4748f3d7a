//! The slice of an SSH connection the extensions need.
//!
//! Inbound global requests arrive separately as an
//! `mpsc::Receiver<GlobalRequest>`; this trait covers the outbound side.

use crate::error::SshextResult;
use crate::request::RequestReply;

/// Outbound half of an established, authenticated SSH session.
#[allow(async_fn_in_trait)]
pub trait Transport: Send + Sync {
    /// Exchange hash of the key exchange that started this session.
    fn session_id(&self) -> &[u8];

    /// Send a global request. Returns the peer's reply when `want_reply`
    /// is set, `None` otherwise.
    async fn send_request(
        &self,
        kind: &str,
        want_reply: bool,
        payload: &[u8],
    ) -> SshextResult<Option<RequestReply>>;
}
