//! Proof of host key ownership (`hostkeys-prove-00@openssh.com`).
//!
//! For each key in a challenge the server signs
//!
//! ```text
//! string  "hostkeys-prove-00@openssh.com"
//! string  session identifier
//! string  public key blob
//! ```
//!
//! and replies with the signatures packed in challenge order. One unknown
//! key, one unparsable blob or one signing failure fails the whole request.

use crate::codec::{self, put_string};
use crate::error::{SshextError, SshextResult};
use crate::identity::{key_blob, short_fingerprint, HostKeys};
use crate::request::{RequestReply, HOSTKEYS_PROVE};
use signature::Verifier;
use ssh_key::public::KeyData;
use tracing::debug;

/// The exact bytes signed to prove ownership of `key_blob` in this session.
pub fn proof_message(session_id: &[u8], key_blob: &[u8]) -> SshextResult<Vec<u8>> {
    let mut msg = Vec::with_capacity(12 + HOSTKEYS_PROVE.len() + session_id.len() + key_blob.len());
    put_string(&mut msg, HOSTKEYS_PROVE.as_bytes())?;
    put_string(&mut msg, session_id)?;
    put_string(&mut msg, key_blob)?;
    Ok(msg)
}

/// Sign a proof for every key in `payload`, returning the packed signatures.
pub fn try_prove(payload: &[u8], session_id: &[u8], keys: &HostKeys) -> SshextResult<Vec<u8>> {
    let challenged = codec::decode_public_keys(payload)?;

    let mut signatures = Vec::with_capacity(challenged.len());
    for key in &challenged {
        let blob = key_blob(key)?;
        let signer = keys
            .find(&blob)
            .ok_or_else(|| SshextError::UnknownKey(short_fingerprint(&blob)))?;
        signatures.push(signer.sign(&proof_message(session_id, &blob)?)?);
    }

    codec::encode_signatures(&signatures)
}

/// Answer a `hostkeys-prove-00@openssh.com` payload.
///
/// Never fails: every error becomes a failure reply with an empty payload.
pub fn prove(payload: &[u8], session_id: &[u8], keys: &HostKeys) -> RequestReply {
    match try_prove(payload, session_id, keys) {
        Ok(signatures) => RequestReply::success(signatures),
        Err(e) => {
            debug!(error = %e, "rejecting host key proof request");
            RequestReply::failure()
        }
    }
}

/// Challenge payload a client sends to have `keys` proven.
pub fn prove_request_payload(keys: &[KeyData]) -> SshextResult<Vec<u8>> {
    codec::encode_public_keys(keys)
}

/// Decode a received `hostkeys-00@openssh.com` announcement.
pub fn parse_announcement(payload: &[u8]) -> SshextResult<Vec<KeyData>> {
    codec::decode_public_keys(payload)
}

/// Check a proof reply against the keys that were challenged.
///
/// `keys` must be in challenge order; the reply must hold exactly one valid
/// signature per key.
pub fn verify_ownership(session_id: &[u8], keys: &[KeyData], reply: &[u8]) -> SshextResult<()> {
    let signatures = codec::decode_signatures(reply)?;
    if signatures.len() != keys.len() {
        return Err(SshextError::InvalidSignature(format!(
            "expected {} signatures, got {}",
            keys.len(),
            signatures.len()
        )));
    }

    for (key, sig) in keys.iter().zip(&signatures) {
        let blob = key_blob(key)?;
        let msg = proof_message(session_id, &blob)?;
        Verifier::verify(key, &msg, sig).map_err(|e| {
            SshextError::InvalidSignature(format!("{}: {e}", short_fingerprint(&blob)))
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::identity::{HostKey, HostKeySigner};
    use ssh_key::Signature;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const SESSION_ID: &[u8] = b"foo";

    #[test]
    fn proof_message_layout() {
        let msg = proof_message(b"sid", b"key").unwrap();
        let mut expected = Vec::new();
        expected.extend_from_slice(&29u32.to_be_bytes());
        expected.extend_from_slice(b"hostkeys-prove-00@openssh.com");
        expected.extend_from_slice(&[0, 0, 0, 3]);
        expected.extend_from_slice(b"sid");
        expected.extend_from_slice(&[0, 0, 0, 3]);
        expected.extend_from_slice(b"key");
        assert_eq!(msg, expected);
    }

    #[test]
    fn proves_all_three_key_types() {
        let keys = fixtures::host_keys();
        let public = fixtures::public_keys();
        let challenge = prove_request_payload(&public).unwrap();

        let reply = prove(&challenge, SESSION_ID, &keys);
        assert!(reply.success);

        let sigs = codec::decode_signatures(&reply.payload).unwrap();
        assert_eq!(sigs.len(), 3);
        for (key, sig) in public.iter().zip(&sigs) {
            let msg = proof_message(SESSION_ID, &key_blob(key).unwrap()).unwrap();
            Verifier::verify(key, &msg, sig).unwrap();
        }
        verify_ownership(SESSION_ID, &public, &reply.payload).unwrap();
    }

    #[test]
    fn proves_rsa_key_alone() {
        let rsa = fixtures::public_keys()[0].clone();
        assert_eq!(rsa.algorithm().as_str(), "ssh-rsa");
        let public = vec![rsa];
        let challenge = prove_request_payload(&public).unwrap();

        let signatures = try_prove(&challenge, SESSION_ID, &fixtures::host_keys()).unwrap();
        assert_eq!(codec::decode_signatures(&signatures).unwrap().len(), 1);
        verify_ownership(SESSION_ID, &public, &signatures).unwrap();
    }

    #[test]
    fn signatures_are_bound_to_session() {
        let keys = fixtures::host_keys();
        let public = fixtures::public_keys();
        let challenge = prove_request_payload(&public).unwrap();

        let reply = prove(&challenge, SESSION_ID, &keys);
        assert!(verify_ownership(b"bar", &public, &reply.payload).is_err());
    }

    #[test]
    fn reply_order_follows_challenge_order() {
        let keys = fixtures::host_keys();
        let mut public = fixtures::public_keys();
        public.reverse();
        let challenge = prove_request_payload(&public).unwrap();

        let reply = prove(&challenge, SESSION_ID, &keys);
        assert!(reply.success);
        verify_ownership(SESSION_ID, &public, &reply.payload).unwrap();
    }

    #[test]
    fn repeated_key_is_signed_each_time() {
        let keys = fixtures::host_keys();
        let ed25519 = fixtures::public_keys()[2].clone();
        let public = vec![ed25519.clone(), ed25519];
        let challenge = prove_request_payload(&public).unwrap();

        let reply = prove(&challenge, SESSION_ID, &keys);
        assert!(reply.success);
        assert_eq!(codec::decode_signatures(&reply.payload).unwrap().len(), 2);
        verify_ownership(SESSION_ID, &public, &reply.payload).unwrap();
    }

    #[test]
    fn known_then_unknown_key_rejects_everything() {
        let keys: HostKeys = [
            fixtures::host_key(fixtures::RSA),
            fixtures::host_key(fixtures::ECDSA_P256),
        ]
        .into_iter()
        .collect();
        let challenge = prove_request_payload(&fixtures::public_keys()).unwrap();

        let reply = prove(&challenge, SESSION_ID, &keys);
        assert_eq!(reply, RequestReply::failure());
        assert!(matches!(
            try_prove(&challenge, SESSION_ID, &keys),
            Err(SshextError::UnknownKey(_))
        ));
    }

    struct CountingSigner {
        inner: HostKey,
        calls: AtomicUsize,
    }

    impl HostKeySigner for CountingSigner {
        fn public_key_blob(&self) -> &[u8] {
            self.inner.public_key_blob()
        }

        fn sign(&self, message: &[u8]) -> SshextResult<Signature> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.sign(message)
        }
    }

    #[test]
    fn truncated_challenge_never_signs() {
        let signer = Arc::new(CountingSigner {
            inner: fixtures::host_key(fixtures::ED25519),
            calls: AtomicUsize::new(0),
        });
        let keys = HostKeys::new(vec![signer.clone() as Arc<dyn HostKeySigner>]);

        let mut challenge = prove_request_payload(&fixtures::public_keys()[2..]).unwrap();
        challenge.extend_from_slice(&[0, 0, 0]);

        let reply = prove(&challenge, SESSION_ID, &keys);
        assert_eq!(reply, RequestReply::failure());
        assert_eq!(signer.calls.load(Ordering::SeqCst), 0);
    }

    struct FailingSigner(Vec<u8>);

    impl HostKeySigner for FailingSigner {
        fn public_key_blob(&self) -> &[u8] {
            &self.0
        }

        fn sign(&self, _message: &[u8]) -> SshextResult<Signature> {
            Err(SshextError::Signing("hardware token unplugged".into()))
        }
    }

    #[test]
    fn signing_failure_rejects() {
        let blob = fixtures::host_key(fixtures::ED25519).public_key_blob().to_vec();
        let keys = HostKeys::new(vec![Arc::new(FailingSigner(blob)) as Arc<dyn HostKeySigner>]);
        let challenge = prove_request_payload(&fixtures::public_keys()[2..]).unwrap();

        assert_eq!(prove(&challenge, SESSION_ID, &keys), RequestReply::failure());
    }

    #[test]
    fn empty_challenge_proves_nothing() {
        let reply = prove(&[], SESSION_ID, &fixtures::host_keys());
        assert_eq!(reply, RequestReply::success(Vec::new()));
    }

    #[test]
    fn verify_rejects_count_mismatch() {
        let keys = fixtures::host_keys();
        let public = fixtures::public_keys();
        let challenge = prove_request_payload(&public[..1]).unwrap();
        let reply = prove(&challenge, SESSION_ID, &keys);

        assert!(matches!(
            verify_ownership(SESSION_ID, &public, &reply.payload),
            Err(SshextError::InvalidSignature(_))
        ));
    }

    #[test]
    fn announcement_round_trips() {
        let public = fixtures::public_keys();
        let payload = codec::encode_public_keys(&public).unwrap();
        assert_eq!(parse_announcement(&payload).unwrap(), public);
    }
}
