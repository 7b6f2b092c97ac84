//! Checking that a message was really published by its author.
//!
//! Messages are normally checked by verifying the ed25519 `signature` against the [unsigned
//! bytes](crate::utils::unsigned_bytes) of the message. When an HMAC key is given, the signature
//! is instead verified against `crypto_auth(unsigned_bytes, hmac_key)`, which is how networks that
//! use a cap-style HMAC key sign their messages.
use ed25519_dalek::{Signature, VerifyingKey};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use snafu::ensure;
use ssb_legacy_msg_data::value::{RidiculousStringMap, Value};
use tracing::trace;

use crate::error::{
    InvalidAuthorKeyLength, InvalidHmacKeyLength, InvalidHmacKeyType, InvalidSignature, Result,
};
use crate::utils;

/// Length of an ed25519 public key (`crypto_sign_PUBLICKEYBYTES`).
pub const PUBLIC_KEY_BYTES: usize = 32;
/// Length of an ed25519 detached signature (`crypto_sign_BYTES`).
pub const SIGNATURE_BYTES: usize = 64;
/// Length of an HMAC key (`crypto_auth_KEYBYTES`).
pub const HMAC_KEY_BYTES: usize = 32;
/// Length of an authentication tag (`crypto_auth_BYTES`).
pub const MAC_BYTES: usize = 32;

type HmacSha512 = Hmac<Sha512>;

/// The key used to authenticate messages in HMAC mode.
#[derive(Clone, PartialEq, Eq)]
pub struct HmacKey([u8; HMAC_KEY_BYTES]);

impl HmacKey {
    pub fn from_bytes(bytes: [u8; HMAC_KEY_BYTES]) -> HmacKey {
        HmacKey(bytes)
    }

    /// Decode a base64 key. The key must decode to exactly [`HMAC_KEY_BYTES`] bytes.
    pub fn from_base64(key: &str) -> Result<HmacKey> {
        let bytes = utils::node_base64_decode(key);
        ensure!(
            bytes.len() == HMAC_KEY_BYTES,
            InvalidHmacKeyLength {
                expected: HMAC_KEY_BYTES,
                actual: bytes.len()
            }
        );
        let mut key = [0u8; HMAC_KEY_BYTES];
        key.copy_from_slice(&bytes);
        Ok(HmacKey(key))
    }

    /// Read a key from an untyped value: `null` means there is no key, a string is decoded with
    /// [`HmacKey::from_base64`] and anything else is an error.
    pub fn from_value(value: &Value) -> Result<Option<HmacKey>> {
        match value {
            Value::Null => Ok(None),
            Value::String(key) => HmacKey::from_base64(key).map(Some),
            _ => InvalidHmacKeyType.fail(),
        }
    }

    pub fn as_bytes(&self) -> &[u8; HMAC_KEY_BYTES] {
        &self.0
    }
}

impl std::fmt::Debug for HmacKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HmacKey(..)")
    }
}

/// The cryptographic primitives the validator depends on.
pub trait Crypto {
    /// Verify a detached ed25519 signature of `message`.
    fn verify_signature(
        &self,
        public_key: &[u8; PUBLIC_KEY_BYTES],
        signature: &[u8; SIGNATURE_BYTES],
        message: &[u8],
    ) -> bool;

    /// Compute the authentication tag of `message`.
    fn compute_mac(&self, key: &HmacKey, message: &[u8]) -> [u8; MAC_BYTES];
}

/// [`Crypto`] with the semantics of libsodium's `crypto_sign_verify_detached` and `crypto_auth`
/// (HMAC-SHA-512 truncated to 32 bytes).
#[derive(Debug, Default, Clone, Copy)]
pub struct Sodium;

impl Crypto for Sodium {
    fn verify_signature(
        &self,
        public_key: &[u8; PUBLIC_KEY_BYTES],
        signature: &[u8; SIGNATURE_BYTES],
        message: &[u8],
    ) -> bool {
        // libsodium rejects small order keys and non-canonical points, as does `verify_strict`.
        let public_key = match VerifyingKey::from_bytes(public_key) {
            Ok(key) => key,
            Err(_) => return false,
        };
        let signature = Signature::from_bytes(signature);
        public_key.verify_strict(message, &signature).is_ok()
    }

    fn compute_mac(&self, key: &HmacKey, message: &[u8]) -> [u8; MAC_BYTES] {
        let mut mac =
            HmacSha512::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
        mac.update(message);
        let digest = mac.finalize().into_bytes();
        let mut tag = [0u8; MAC_BYTES];
        tag.copy_from_slice(&digest[..MAC_BYTES]);
        tag
    }
}

/// Decode the public key out of the base64 part of an author id (the part before `.ed25519`).
pub fn author_public_key(author_key: &str) -> Result<[u8; PUBLIC_KEY_BYTES]> {
    let bytes = utils::node_base64_decode(author_key);
    ensure!(
        bytes.len() == PUBLIC_KEY_BYTES,
        InvalidAuthorKeyLength {
            expected: PUBLIC_KEY_BYTES,
            actual: bytes.len()
        }
    );
    let mut key = [0u8; PUBLIC_KEY_BYTES];
    key.copy_from_slice(&bytes);
    Ok(key)
}

/// Check the signature of a message.
///
/// `author_key` is the author with its `.ed25519` suffix removed and `signature` is the decoded
/// signature. Without an `hmac_key` the signature must verify the unsigned bytes of the message,
/// with one it must verify the authentication tag of the unsigned bytes.
pub fn verify_authenticity<C: Crypto + ?Sized>(
    crypto: &C,
    message: &RidiculousStringMap<Value>,
    author_key: &str,
    signature: &[u8; SIGNATURE_BYTES],
    hmac_key: Option<&HmacKey>,
) -> Result<()> {
    let unsigned_bytes = utils::unsigned_bytes(message)?;
    let public_key = author_public_key(author_key)?;

    let is_valid = match hmac_key {
        None => {
            trace!("verifying signature of unsigned message bytes");
            crypto.verify_signature(&public_key, signature, &unsigned_bytes)
        }
        Some(hmac_key) => {
            trace!("verifying signature of hmac of unsigned message bytes");
            let tag = crypto.compute_mac(hmac_key, &unsigned_bytes);
            crypto.verify_signature(&public_key, signature, &tag)
        }
    };
    ensure!(is_valid, InvalidSignature);

    Ok(())
}
