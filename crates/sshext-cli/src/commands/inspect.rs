//! `sshext inspect` — list the keys in a received announcement.

use super::parse_hex;
use anyhow::{Context, Result};
use serde::Serialize;
use sshext_core::identity::{fingerprint, key_blob};
use sshext_core::prover::parse_announcement;

#[derive(Debug, Serialize)]
pub struct AnnouncedKey {
    pub algorithm: String,
    pub fingerprint: String,
}

pub(crate) fn inspect(payload_hex: &str) -> Result<Vec<AnnouncedKey>> {
    let payload = parse_hex("payload", payload_hex)?;
    let keys = parse_announcement(&payload).context("malformed hostkeys-00 payload")?;

    keys.iter()
        .map(|key| -> Result<AnnouncedKey> {
            Ok(AnnouncedKey {
                algorithm: key.algorithm().to_string(),
                fingerprint: fingerprint(&key_blob(key)?),
            })
        })
        .collect()
}

pub fn run(payload_hex: &str, json: bool) -> Result<()> {
    let keys = inspect(payload_hex)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&keys)?);
        return Ok(());
    }

    for key in &keys {
        println!("{:<22} {}", key.algorithm, key.fingerprint);
    }
    println!("\n{} key(s) announced.", keys.len());

    Ok(())
}
