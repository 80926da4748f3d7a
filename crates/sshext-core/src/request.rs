//! Global requests as delivered by the transport.
//!
//! The reply side is a [`ReplySink`] that is consumed when used, so a request
//! can be answered at most once.

use crate::error::{SshextError, SshextResult};
use tokio::sync::oneshot;

/// `no-more-sessions@openssh.com`
pub const NO_MORE_SESSIONS: &str = "no-more-sessions@openssh.com";
/// `hostkeys-00@openssh.com`
pub const HOSTKEYS: &str = "hostkeys-00@openssh.com";
/// `hostkeys-prove-00@openssh.com`
pub const HOSTKEYS_PROVE: &str = "hostkeys-prove-00@openssh.com";

/// Answer to a global request: `SSH_MSG_REQUEST_SUCCESS` with a payload or
/// `SSH_MSG_REQUEST_FAILURE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestReply {
    pub success: bool,
    pub payload: Vec<u8>,
}

impl RequestReply {
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            success: true,
            payload,
        }
    }

    pub fn failure() -> Self {
        Self {
            success: false,
            payload: Vec::new(),
        }
    }
}

/// Write-once reply channel back to the transport.
#[derive(Debug)]
pub struct ReplySink {
    tx: oneshot::Sender<RequestReply>,
}

impl ReplySink {
    pub fn new(tx: oneshot::Sender<RequestReply>) -> Self {
        Self { tx }
    }

    pub fn send(self, reply: RequestReply) -> SshextResult<()> {
        self.tx
            .send(reply)
            .map_err(|_| SshextError::ChannelClosed("reply receiver dropped".into()))
    }
}

/// An inbound global request.
#[derive(Debug)]
pub struct GlobalRequest {
    /// Request name, e.g. `hostkeys-prove-00@openssh.com`.
    pub kind: String,
    pub payload: Vec<u8>,
    pub want_reply: bool,
    reply: Option<ReplySink>,
}

impl GlobalRequest {
    /// Build a request. When `want_reply` is set, the returned receiver
    /// resolves once the request is answered (or errors if it is dropped
    /// unanswered).
    pub fn new(
        kind: impl Into<String>,
        payload: Vec<u8>,
        want_reply: bool,
    ) -> (Self, Option<oneshot::Receiver<RequestReply>>) {
        let (reply, rx) = if want_reply {
            let (tx, rx) = oneshot::channel();
            (Some(ReplySink::new(tx)), Some(rx))
        } else {
            (None, None)
        };

        let req = Self {
            kind: kind.into(),
            payload,
            want_reply,
            reply,
        };
        (req, rx)
    }

    /// Build a request around a transport-supplied reply sink.
    pub fn with_sink(kind: impl Into<String>, payload: Vec<u8>, reply: Option<ReplySink>) -> Self {
        Self {
            kind: kind.into(),
            payload,
            want_reply: reply.is_some(),
            reply,
        }
    }

    /// Answer the request. A no-op when the peer did not ask for a reply.
    pub fn reply(self, success: bool, payload: Vec<u8>) -> SshextResult<()> {
        match self.reply {
            Some(sink) => sink.send(RequestReply { success, payload }),
            None => Ok(()),
        }
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reply_reaches_receiver() {
        let (req, rx) = GlobalRequest::new("tcpip-forward", vec![1, 2], true);
        assert!(req.want_reply);
        req.reply(true, vec![9]).unwrap();
        let reply = rx.unwrap().await.unwrap();
        assert_eq!(reply, RequestReply::success(vec![9]));
    }

    #[tokio::test]
    async fn no_reply_wanted_is_noop() {
        let (req, rx) = GlobalRequest::new("keepalive@openssh.com", Vec::new(), false);
        assert!(rx.is_none());
        assert!(req.reply(false, Vec::new()).is_ok());
    }

    #[tokio::test]
    async fn dropped_request_closes_receiver() {
        let (req, rx) = GlobalRequest::new("tcpip-forward", Vec::new(), true);
        drop(req);
        assert!(rx.unwrap().await.is_err());
    }

    #[test]
    fn reply_after_receiver_dropped_errors() {
        let (req, rx) = GlobalRequest::new("tcpip-forward", Vec::new(), true);
        drop(rx);
        assert!(matches!(
            req.reply(true, Vec::new()),
            Err(SshextError::ChannelClosed(_))
        ));
    }
}
