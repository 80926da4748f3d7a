//! `sshext prove` — answer a `hostkeys-prove-00@openssh.com` challenge.
//!
//! Signs with the configured host keys exactly as a server would and prints
//! the reply. A rejected challenge prints the reason; the server itself only
//! ever sends a bare failure.

use super::parse_hex;
use anyhow::{Context, Result};
use serde::Serialize;
use sshext_core::identity::HostKeys;
use sshext_core::prover::try_prove;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
pub struct ProofReport {
    pub accepted: bool,
    pub payload: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

pub(crate) fn answer(
    paths: &[PathBuf],
    session_id_hex: &str,
    challenge_hex: &str,
) -> Result<ProofReport> {
    let session_id = parse_hex("session id", session_id_hex)?;
    let challenge = parse_hex("challenge", challenge_hex)?;
    let keys = HostKeys::load(paths).context("failed to load host keys")?;

    let report = match try_prove(&challenge, &session_id, &keys) {
        Ok(signatures) => ProofReport {
            accepted: true,
            payload: hex::encode(signatures),
            reason: None,
        },
        Err(e) => ProofReport {
            accepted: false,
            payload: String::new(),
            reason: Some(e.to_string()),
        },
    };
    Ok(report)
}

pub fn run(
    paths: &[PathBuf],
    session_id_hex: &str,
    challenge_hex: &str,
    json: bool,
) -> Result<()> {
    let report = answer(paths, session_id_hex, challenge_hex)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.accepted {
        println!("accepted\n{}", report.payload);
    } else {
        println!(
            "rejected: {}",
            report.reason.as_deref().unwrap_or("unknown reason")
        );
    }

    Ok(())
}
