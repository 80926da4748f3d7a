//! `sshext verify` — check a `hostkeys-prove-00@openssh.com` reply.

use super::parse_hex;
use anyhow::{Context, Result};
use serde::Serialize;
use sshext_core::identity::load_public_key;
use sshext_core::prover::verify_ownership;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Serialize)]
pub struct Verification {
    pub verified: bool,
    pub keys: usize,
}

pub(crate) fn check(public_keys: &[PathBuf], session_id_hex: &str, reply_hex: &str) -> Result<usize> {
    let session_id = parse_hex("session id", session_id_hex)?;
    let reply = parse_hex("reply", reply_hex)?;

    let keys = public_keys
        .iter()
        .map(|p| load_public_key(p).with_context(|| format!("failed to load {}", p.display())))
        .collect::<Result<Vec<_>>>()?;
    debug!(keys = keys.len(), reply_len = reply.len(), "verifying proof reply");

    verify_ownership(&session_id, &keys, &reply).context("host key proof did not verify")?;
    Ok(keys.len())
}

pub fn run(public_keys: &[PathBuf], session_id_hex: &str, reply_hex: &str, json: bool) -> Result<()> {
    let proven = check(public_keys, session_id_hex, reply_hex)?;

    if json {
        let report = Verification {
            verified: true,
            keys: proven,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("ok: {proven} host key(s) proven");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{announce, prove, testdata};

    fn pub_paths() -> Vec<PathBuf> {
        ["host_rsa.pub", "host_ecdsa_p256.pub", "host_ed25519.pub"]
            .into_iter()
            .map(testdata::path)
            .collect()
    }

    #[test]
    fn verifies_prove_output() {
        let keys = testdata::host_keys();
        let announcement = announce::build(&keys).unwrap();
        let report = prove::answer(&keys, "666f6f", &announcement.payload).unwrap();

        assert_eq!(check(&pub_paths(), "666f6f", &report.payload).unwrap(), 3);
    }

    #[test]
    fn json_report_shape() {
        let report = Verification {
            verified: true,
            keys: 3,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value, serde_json::json!({ "verified": true, "keys": 3 }));
    }

    #[test]
    fn wrong_session_fails() {
        let keys = testdata::host_keys();
        let announcement = announce::build(&keys).unwrap();
        let report = prove::answer(&keys, "666f6f", &announcement.payload).unwrap();

        assert!(check(&pub_paths(), "626172", &report.payload).is_err());
    }

    #[test]
    fn wrong_key_order_fails() {
        let keys = testdata::host_keys();
        let announcement = announce::build(&keys).unwrap();
        let report = prove::answer(&keys, "666f6f", &announcement.payload).unwrap();

        let mut reversed = pub_paths();
        reversed.reverse();
        assert!(check(&reversed, "666f6f", &report.payload).is_err());
    }
}
