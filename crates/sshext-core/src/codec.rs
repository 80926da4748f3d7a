//! Packed string framing for multi-key and multi-signature payloads.
//!
//! Wire format: `[4-byte big-endian length][item]` repeated, no separator.
//! Each item is the canonical SSH wire encoding of a public key or a
//! signature. Decoding is all-or-nothing.

use crate::error::{SshextError, SshextResult};
use ssh_encoding::{Decode, Encode};
use ssh_key::public::KeyData;
use ssh_key::Signature;

/// Big-endian uint32 length prefix for a field of `len` bytes.
fn length_prefix(len: usize) -> SshextResult<[u8; 4]> {
    u32::try_from(len)
        .map(u32::to_be_bytes)
        .map_err(|_| SshextError::Codec(format!("string field of {len} bytes exceeds u32 length")))
}

/// Append one length-prefixed string field to `buf`.
pub fn put_string(buf: &mut Vec<u8>, data: &[u8]) -> SshextResult<()> {
    let prefix = length_prefix(data.len())?;
    buf.reserve(4 + data.len());
    buf.extend_from_slice(&prefix);
    buf.extend_from_slice(data);
    Ok(())
}

/// Pack already-encoded blobs back to back.
pub fn pack_blobs<'a, I>(blobs: I) -> SshextResult<Vec<u8>>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut out = Vec::new();
    for blob in blobs {
        put_string(&mut out, blob)?;
    }
    Ok(out)
}

/// Canonical SSH wire encoding of one key or signature.
pub fn encode_item(item: &impl Encode) -> SshextResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(item.encoded_len()?);
    item.encode(&mut buf)?;
    Ok(buf)
}

/// Split a packed payload into its string fields.
///
/// Fails if the payload ends inside a length prefix or inside a field.
pub fn unpack_blobs(mut data: &[u8]) -> SshextResult<Vec<&[u8]>> {
    let mut blobs = Vec::new();

    while !data.is_empty() {
        if data.len() < 4 {
            return Err(SshextError::Codec(format!(
                "truncated length prefix: {} trailing bytes",
                data.len()
            )));
        }
        let len = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;

        if data.len() - 4 < len {
            return Err(SshextError::Codec(format!(
                "string field claims {len} bytes, {} available",
                data.len() - 4
            )));
        }

        blobs.push(&data[4..4 + len]);
        data = &data[4 + len..];
    }

    Ok(blobs)
}

/// Parse one wire-encoded item, rejecting trailing garbage inside the blob.
fn decode_exact<T>(mut blob: &[u8]) -> SshextResult<T>
where
    T: Decode<Error = ssh_key::Error>,
{
    let item = T::decode(&mut blob)?;
    if !blob.is_empty() {
        return Err(SshextError::Codec(format!(
            "{} unexpected bytes after encoded item",
            blob.len()
        )));
    }
    Ok(item)
}

/// A public key of a type this crate can use; opaque key types are rejected.
fn decode_key(blob: &[u8]) -> SshextResult<KeyData> {
    let key = decode_exact::<KeyData>(blob)?;
    if let KeyData::Other(_) = &key {
        return Err(SshextError::Codec(format!(
            "unsupported public key type {}",
            key.algorithm()
        )));
    }
    Ok(key)
}

/// Encode public keys as a packed payload (`hostkeys-00` / `hostkeys-prove-00`).
pub fn encode_public_keys(keys: &[KeyData]) -> SshextResult<Vec<u8>> {
    let blobs = keys.iter().map(encode_item).collect::<SshextResult<Vec<_>>>()?;
    pack_blobs(blobs.iter().map(Vec::as_slice))
}

/// Decode a packed payload into public keys, preserving wire order.
pub fn decode_public_keys(payload: &[u8]) -> SshextResult<Vec<KeyData>> {
    unpack_blobs(payload)?.into_iter().map(decode_key).collect()
}

/// Encode signatures as a packed payload (proof reply).
pub fn encode_signatures(signatures: &[Signature]) -> SshextResult<Vec<u8>> {
    let blobs = signatures
        .iter()
        .map(encode_item)
        .collect::<SshextResult<Vec<_>>>()?;
    pack_blobs(blobs.iter().map(Vec::as_slice))
}

/// Decode a packed proof reply into signatures, preserving wire order.
pub fn decode_signatures(payload: &[u8]) -> SshextResult<Vec<Signature>> {
    unpack_blobs(payload)?
        .into_iter()
        .map(decode_exact::<Signature>)
        .collect()
}
