//! Host key rotation: `hostkeys-00@openssh.com` and
//! `hostkeys-prove-00@openssh.com`.
//!
//! After authentication the server announces every host key it holds so the
//! client can learn new ones. The client may then ask the server to prove it
//! holds the private halves; those challenges are answered here and never
//! reach the application.

use crate::codec;
use crate::config::ExtensionConfig;
use crate::error::{AnnounceError, SshextError};
use crate::identity::HostKeys;
use crate::prover;
use crate::request::{GlobalRequest, HOSTKEYS, HOSTKEYS_PROVE};
use crate::transport::Transport;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

/// Announce `keys` over `transport`, then answer ownership proofs found in
/// `requests`.
///
/// On success returns the request stream with proof challenges removed. If
/// the announcement cannot be sent, nothing is spawned and the untouched
/// `requests` come back inside the error.
pub async fn update_host_keys<T: Transport>(
    transport: &T,
    requests: mpsc::Receiver<GlobalRequest>,
    keys: HostKeys,
) -> Result<mpsc::Receiver<GlobalRequest>, AnnounceError> {
    update_host_keys_with_config(transport, requests, keys, &ExtensionConfig::default()).await
}

/// Like [`update_host_keys`] with explicit settings.
pub async fn update_host_keys_with_config<T: Transport>(
    transport: &T,
    requests: mpsc::Receiver<GlobalRequest>,
    keys: HostKeys,
    config: &ExtensionConfig,
) -> Result<mpsc::Receiver<GlobalRequest>, AnnounceError> {
    if let Err(source) = announce(transport, &keys).await {
        warn!(error = %source, "host key announcement failed");
        return Err(AnnounceError { source, requests });
    }

    let session_id: Arc<[u8]> = transport.session_id().into();
    Ok(spawn_prover(requests, keys, session_id, config.capacity()))
}

/// Payload of a `hostkeys-00@openssh.com` request announcing `keys`.
pub fn announcement_payload(keys: &HostKeys) -> Result<Vec<u8>, SshextError> {
    codec::pack_blobs(keys.blobs())
}

/// Send the `hostkeys-00@openssh.com` announcement, not asking for a reply.
pub async fn announce<T: Transport>(transport: &T, keys: &HostKeys) -> Result<(), SshextError> {
    let payload = announcement_payload(keys)?;
    transport
        .send_request(HOSTKEYS, false, &payload)
        .await
        .map_err(|e| SshextError::Transport(format!("failed to send {HOSTKEYS}: {e}")))?;

    info!(count = keys.len(), "announced host keys");
    Ok(())
}

fn spawn_prover(
    mut requests: mpsc::Receiver<GlobalRequest>,
    keys: HostKeys,
    session_id: Arc<[u8]>,
    capacity: usize,
) -> mpsc::Receiver<GlobalRequest> {
    let (relayed_tx, relayed_rx) = mpsc::channel(capacity);

    tokio::spawn(async move {
        while let Some(req) = requests.recv().await {
            if req.is(HOSTKEYS_PROVE) {
                let reply = prover::prove(&req.payload, &session_id, &keys);
                debug!(accepted = reply.success, "answered host key proof request");
                if let Err(e) = req.reply(reply.success, reply.payload) {
                    debug!(error = %e, "host key proof reply not delivered");
                }
                continue;
            }

            trace!(kind = %req.kind, "relaying global request");
            if relayed_tx.send(req).await.is_err() {
                debug!("relayed request receiver dropped, draining");
            }
        }

        debug!("global request stream closed");
    });

    relayed_rx
}
