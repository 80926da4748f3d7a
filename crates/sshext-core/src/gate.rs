//! `no-more-sessions@openssh.com` filter.
//!
//! A client sends this once it will open no further session channels; the
//! server should refuse any that follow. The gate strips the request from the
//! stream and fires a one-shot notification the first time it is seen.

use crate::config::ExtensionConfig;
use crate::request::{GlobalRequest, NO_MORE_SESSIONS};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

/// Filter `no-more-sessions@openssh.com` out of `requests` with default settings.
///
/// Returns the relayed request stream and a receiver that resolves `Ok(())`
/// once the client asked for no more sessions, or errors if the stream ended
/// without it.
pub fn no_more_sessions(
    requests: mpsc::Receiver<GlobalRequest>,
) -> (mpsc::Receiver<GlobalRequest>, oneshot::Receiver<()>) {
    no_more_sessions_with_config(requests, &ExtensionConfig::default())
}

/// Like [`no_more_sessions`] with an explicit channel capacity.
pub fn no_more_sessions_with_config(
    mut requests: mpsc::Receiver<GlobalRequest>,
    config: &ExtensionConfig,
) -> (mpsc::Receiver<GlobalRequest>, oneshot::Receiver<()>) {
    let (relayed_tx, relayed_rx) = mpsc::channel(config.capacity());
    let (notify_tx, notify_rx) = oneshot::channel();

    tokio::spawn(async move {
        let mut notify = Some(notify_tx);

        while let Some(req) = requests.recv().await {
            if req.is(NO_MORE_SESSIONS) {
                match notify.take() {
                    Some(tx) => {
                        debug!("client requested no more sessions");
                        let _ = tx.send(());
                    }
                    None => trace!("duplicate no-more-sessions request ignored"),
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

    (relayed_rx, notify_rx)
}
