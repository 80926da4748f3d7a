//! Tunables shared by the request filters.

use serde::Deserialize;

/// Buffering of the relayed request stream, matching the transport's own
/// request queue depth.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// `[extensions]` section of a host config.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionConfig {
    /// Capacity of each filtered output channel.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    /// Intercept `no-more-sessions@openssh.com`.
    #[serde(default = "default_true")]
    pub no_more_sessions: bool,
    /// Announce host keys and answer `hostkeys-prove-00@openssh.com`.
    #[serde(default = "default_true")]
    pub host_key_rotation: bool,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            no_more_sessions: true,
            host_key_rotation: true,
        }
    }
}

impl ExtensionConfig {
    /// Channel capacity clamped to at least one slot.
    pub fn capacity(&self) -> usize {
        self.channel_capacity.max(1)
    }
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

fn default_true() -> bool {
    true
}
