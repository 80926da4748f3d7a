//! CLI subcommand implementations.

pub mod announce;
pub mod inspect;
pub mod prove;
pub mod verify;

use anyhow::{Context, Result};

/// Decode a hex command-line argument.
pub(crate) fn parse_hex(what: &str, input: &str) -> Result<Vec<u8>> {
    hex::decode(input.trim()).with_context(|| format!("{what} is not valid hex"))
}

#[cfg(test)]
pub(crate) mod testdata {
    use std::path::PathBuf;

    /// Test key shipped with sshext-core.
    pub fn path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../sshext-core/testdata")
            .join(name)
    }

    /// RSA, ECDSA P-256 and Ed25519 private keys, in that order.
    pub fn host_keys() -> Vec<PathBuf> {
        ["host_rsa", "host_ecdsa_p256", "host_ed25519"]
            .into_iter()
            .map(path)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_trims_whitespace() {
        assert_eq!(parse_hex("payload", " 0a0b\n").unwrap(), [10, 11]);
    }

    #[test]
    fn parse_hex_rejects_garbage() {
        assert!(parse_hex("payload", "xyz").is_err());
    }
}
