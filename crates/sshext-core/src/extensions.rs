//! Wire both filters onto one request stream according to an
//! [`ExtensionConfig`].

use crate::config::ExtensionConfig;
use crate::error::AnnounceError;
use crate::gate::no_more_sessions_with_config;
use crate::identity::HostKeys;
use crate::request::GlobalRequest;
use crate::rotator::update_host_keys_with_config;
use crate::transport::Transport;
use tokio::sync::{mpsc, oneshot};
use tracing::info;

/// Output of [`install`].
#[derive(Debug)]
pub struct Filtered {
    /// Requests left for the application.
    pub requests: mpsc::Receiver<GlobalRequest>,
    /// Fires when the client sends `no-more-sessions@openssh.com`; `None`
    /// when that extension is disabled.
    pub no_more_sessions: Option<oneshot::Receiver<()>>,
}

/// Host key rotation first (it announces immediately), then the session gate.
pub async fn install<T: Transport>(
    transport: &T,
    requests: mpsc::Receiver<GlobalRequest>,
    keys: HostKeys,
    config: &ExtensionConfig,
) -> Result<Filtered, AnnounceError> {
    let requests = if config.host_key_rotation {
        update_host_keys_with_config(transport, requests, keys, config).await?
    } else {
        requests
    };

    let (requests, no_more_sessions) = if config.no_more_sessions {
        let (requests, notify) = no_more_sessions_with_config(requests, config);
        (requests, Some(notify))
    } else {
        (requests, None)
    };

    info!(
        host_key_rotation = config.host_key_rotation,
        no_more_sessions = config.no_more_sessions,
        "global request extensions installed"
    );

    Ok(Filtered {
        requests,
        no_more_sessions,
    })
}
