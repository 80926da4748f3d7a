//! `sshext announce` — build the `hostkeys-00@openssh.com` payload.
//!
//! Loads the host keys, prints each key's algorithm and fingerprint, then the
//! announcement payload as hex.

use anyhow::{Context, Result};
use serde::Serialize;
use sshext_core::identity::{fingerprint, HostKey, HostKeySigner, HostKeys};
use sshext_core::request::HOSTKEYS;
use sshext_core::rotator::announcement_payload;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
pub struct KeyEntry {
    pub path: String,
    pub algorithm: String,
    pub fingerprint: String,
}

#[derive(Debug, Serialize)]
pub struct Announcement {
    pub request: &'static str,
    pub keys: Vec<KeyEntry>,
    pub payload: String,
}

pub(crate) fn build(paths: &[PathBuf]) -> Result<Announcement> {
    let mut entries = Vec::with_capacity(paths.len());
    let mut loaded = Vec::with_capacity(paths.len());

    for path in paths {
        let key = HostKey::load(path)
            .with_context(|| format!("failed to load host key {}", path.display()))?;
        entries.push(KeyEntry {
            path: path.display().to_string(),
            algorithm: key.algorithm(),
            fingerprint: fingerprint(key.public_key_blob()),
        });
        loaded.push(key);
    }

    let keys: HostKeys = loaded.into_iter().collect();
    Ok(Announcement {
        request: HOSTKEYS,
        keys: entries,
        payload: hex::encode(announcement_payload(&keys)?),
    })
}

pub fn run(paths: &[PathBuf], json: bool) -> Result<()> {
    let announcement = build(paths)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&announcement)?);
        return Ok(());
    }

    println!("{:<22} {:<18} {}", "ALGORITHM", "FINGERPRINT", "PATH");
    for key in &announcement.keys {
        println!("{:<22} {:<18} {}", key.algorithm, &key.fingerprint[..16], key.path);
    }
    println!("\n{} payload:\n{}", announcement.request, announcement.payload);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testdata;

    #[test]
    fn announces_keys_in_given_order() {
        let announcement = build(&testdata::host_keys()).unwrap();
        let algorithms: Vec<&str> = announcement
            .keys
            .iter()
            .map(|k| k.algorithm.as_str())
            .collect();
        assert_eq!(algorithms, ["ssh-rsa", "ecdsa-sha2-nistp256", "ssh-ed25519"]);

        let payload = hex::decode(&announcement.payload).unwrap();
        let announced = sshext_core::prover::parse_announcement(&payload).unwrap();
        assert_eq!(announced.len(), 3);
    }

    #[test]
    fn missing_key_file_fails() {
        assert!(build(&[testdata::path("no_such_key")]).is_err());
    }
}
