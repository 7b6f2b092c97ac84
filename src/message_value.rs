//! Functions for validating message values (ie. just the `value` without `key` and `timestamp`).
use rayon::prelude::*;
use snafu::ensure;
use ssb_legacy_msg_data::value::{RidiculousStringMap, Value};
use tracing::{debug, trace};

use crate::error::{
    AuthorNotString, ContentArray, ContentMissingBox, ContentNull, ContentTypeNotString,
    ContentTypeTooLong, ContentTypeTooShort, InvalidAuthorSuffix, InvalidBoxBase64,
    InvalidContent, InvalidHashFunction, InvalidMessageValueOrder, InvalidSequenceNumber,
    InvalidSignatureBase64, InvalidSignatureLength, InvalidSignatureSuffix, MessageNotObject,
    MessageNull, MessageTooLarge, Result, SequenceNotNumber, TimestampNotNumber,
};
use crate::state::FeedState;
use crate::utils;
use crate::verify::{self, Crypto, HmacKey, Sodium, SIGNATURE_BYTES};

pub const AUTHOR_SUFFIX: &str = ".ed25519";
pub const SIGNATURE_SUFFIX: &str = ".sig.ed25519";
pub const BOX_SUFFIX: &str = ".box";
/// Messages longer than this, in latin1 bytes, are rejected.
pub const MAX_MESSAGE_LATIN1_LENGTH: usize = 8192;
pub const MIN_CONTENT_TYPE_LENGTH: usize = 3;
pub const MAX_CONTENT_TYPE_LENGTH: usize = 52;

/// The `content` of a message.
#[derive(Debug, Clone, Copy)]
pub enum Content<'a> {
    /// Encrypted content. `box_base64` is the part of the content string before `.box`.
    Boxed { box_base64: &'a str },
    /// Public content, an object with a `type`.
    Plain {
        content_type: &'a str,
        fields: &'a RidiculousStringMap<Value>,
    },
}

impl<'a> Content<'a> {
    /// Check the shape of a `content` value.
    ///
    /// A string must contain `.box` and the base64 before it must be canonical. An object must
    /// have a `type` string of 3 to 52 UTF-16 code units. Anything else is invalid.
    pub fn from_value(value: &'a Value) -> Result<Content<'a>> {
        match value {
            Value::String(content) => {
                let box_base64 = match content.find(BOX_SUFFIX) {
                    Some(idx) => &content[..idx],
                    None => return ContentMissingBox.fail(),
                };
                ensure!(utils::is_canonical_base64(box_base64), InvalidBoxBase64);
                Ok(Content::Boxed { box_base64 })
            }
            Value::Object(fields) => {
                let content_type = match fields.get("type") {
                    Some(Value::String(content_type)) => content_type,
                    _ => return ContentTypeNotString.fail(),
                };
                let length = content_type.encode_utf16().count();
                ensure!(
                    length <= MAX_CONTENT_TYPE_LENGTH,
                    ContentTypeTooLong {
                        max: MAX_CONTENT_TYPE_LENGTH,
                        length
                    }
                );
                ensure!(
                    length >= MIN_CONTENT_TYPE_LENGTH,
                    ContentTypeTooShort {
                        min: MIN_CONTENT_TYPE_LENGTH,
                        length
                    }
                );
                Ok(Content::Plain {
                    content_type,
                    fields,
                })
            }
            Value::Null => ContentNull.fail(),
            Value::Array(_) => ContentArray.fail(),
            _ => InvalidContent.fail(),
        }
    }

    pub fn is_boxed(&self) -> bool {
        matches!(self, Content::Boxed { .. })
    }
}

/// Check that a message is valid as the next message of a feed.
///
/// `message` is expected to be a message value of shape: `{
/// previous: "",
/// author: "",
/// sequence: ...,
/// timestamp: ...,
/// hash: "sha256",
/// content: {},
/// signature: ""
/// }`
///
/// This checks that:
/// - the `hmac_key`, if there is one, decodes to 32 bytes
/// - the message is an object that is at most 8192 bytes long when encoded as latin1
/// - the fields (keys) of the message are exactly the message fields, in the correct order
/// - the author is an ed25519 feed id
/// - the sequence is one larger than the sequence of `state`
/// - the hash function is `sha256` and the timestamp is a number
/// - the content is either boxed (canonical base64 ending in `.box`) or an object with a `type`
/// - the signature is a canonical base64 ed25519 signature that verifies the message, or the
///   HMAC of the message when an `hmac_key` is given
///
/// Only the first problem found is reported. This does not check `previous` against the id in
/// `state`.
///
/// # Example
///```
///use ssb_legacy_msg_data::json::from_slice;
///use ssb_legacy_msg_data::value::Value;
///use ssb_validate2::{validate_message_value, FeedState};
///let valid_message_1 = r##"{
///  "previous": null,
///  "author": "@U5GvOKP/YUza9k53DSXxT0mk3PIrnyAmessvNfZl5E0=.ed25519",
///  "sequence": 1,
///  "timestamp": 1470186877575,
///  "hash": "sha256",
///  "content": {
///    "type": "about",
///    "about": "@U5GvOKP/YUza9k53DSXxT0mk3PIrnyAmessvNfZl5E0=.ed25519",
///    "name": "Piet"
///  },
///  "signature": "QJKWui3oyK6r5dH13xHkEVFhfMZDTXfK2tW21nyfheFClSf69yYK77Itj1BGcOimZ16pj9u3tMArLUCGSscqCQ==.sig.ed25519"
///}"##;
/// let message: Value = from_slice(valid_message_1.as_bytes()).unwrap();
/// let result = validate_message_value(&message, &FeedState::initial(), None);
/// assert!(result.is_ok());
///```
pub fn validate_message_value(
    message: &Value,
    state: &FeedState,
    hmac_key: Option<&str>,
) -> Result<()> {
    validate_message_value_with(&Sodium, message, state, hmac_key)
}

/// [`validate_message_value`] with the given [`Crypto`] implementation.
pub fn validate_message_value_with<C: Crypto + ?Sized>(
    crypto: &C,
    message: &Value,
    state: &FeedState,
    hmac_key: Option<&str>,
) -> Result<()> {
    // The key is checked before the message so a bad key is never reported as a bad message.
    let hmac_key = hmac_key.map(HmacKey::from_base64).transpose()?;
    check_message_value(crypto, message, state, hmac_key.as_ref())
}

/// Like [`validate_message_value`], but only tells you whether the message is valid.
pub fn is_valid_message_value(message: &Value, state: &FeedState, hmac_key: Option<&str>) -> bool {
    validate_message_value(message, state, hmac_key).is_ok()
}

/// Batch validates a collection of messages, each paired with the state of its feed.
///
/// The pairs are independent of each other: no state is carried from one message to the next, so
/// messages of different feeds can be mixed freely. All messages use the same `hmac_key`.
pub fn par_validate_message_values(
    entries: &[(Value, FeedState)],
    hmac_key: Option<&str>,
) -> Result<()> {
    let hmac_key = hmac_key.map(HmacKey::from_base64).transpose()?;
    entries
        .par_iter()
        .try_fold(
            || (),
            |_, (message, state)| check_message_value(&Sodium, message, state, hmac_key.as_ref()),
        )
        .try_reduce(|| (), |_, _| Ok(()))
}

pub(crate) fn check_message_value<C: Crypto + ?Sized>(
    crypto: &C,
    message: &Value,
    state: &FeedState,
    hmac_key: Option<&HmacKey>,
) -> Result<()> {
    let result = message_value_checks(crypto, message, state, hmac_key);
    if let Err(err) = &result {
        debug!(error = %err, expected_sequence = state.expected_sequence(), "message rejected");
    }
    result
}

/// All the checks, in the order they are reported.
fn message_value_checks<C: Crypto + ?Sized>(
    crypto: &C,
    message: &Value,
    state: &FeedState,
    hmac_key: Option<&HmacKey>,
) -> Result<()> {
    match message {
        Value::Object(_) | Value::Array(_) => {}
        Value::Null => return MessageNull.fail(),
        _ => return MessageNotObject.fail(),
    }

    let length = utils::latin1_length(message)?;
    ensure!(
        length <= MAX_MESSAGE_LATIN1_LENGTH,
        MessageTooLarge {
            max: MAX_MESSAGE_LATIN1_LENGTH,
            length
        }
    );

    let message = match message {
        Value::Object(message) => message,
        Value::Array(items) => {
            // An array's keys are its indices, which is never a valid order.
            let keys: Vec<String> = (0..items.len()).map(|idx| idx.to_string()).collect();
            return InvalidMessageValueOrder { keys }.fail();
        }
        _ => return MessageNotObject.fail(),
    };

    // The message value fields are in the correct order.
    let keys = utils::message_keys(message);
    ensure!(
        utils::is_correct_order(&keys),
        InvalidMessageValueOrder { keys }
    );

    let author = match message.get("author") {
        Some(Value::String(author)) => author,
        _ => return AuthorNotString.fail(),
    };
    let author_key = match author.strip_suffix(AUTHOR_SUFFIX) {
        Some(author_key) => author_key,
        None => {
            return InvalidAuthorSuffix {
                suffix: AUTHOR_SUFFIX,
            }
            .fail()
        }
    };

    // The sequence must increase by one.
    let sequence = match message.get("sequence") {
        Some(Value::Float(sequence)) => f64::from(*sequence),
        _ => return SequenceNotNumber.fail(),
    };
    ensure!(
        sequence == state.sequence as f64 + 1.0,
        InvalidSequenceNumber {
            actual: sequence,
            expected: state.expected_sequence()
        }
    );

    // The hash signature must be `sha256`.
    ensure!(
        matches!(message.get("hash"), Some(Value::String(hash)) if hash == "sha256"),
        InvalidHashFunction
    );

    ensure!(
        matches!(message.get("timestamp"), Some(Value::Float(_))),
        TimestampNotNumber
    );

    let content = match message.get("content") {
        Some(content) => Content::from_value(content)?,
        None => return InvalidContent.fail(),
    };
    trace!(boxed = content.is_boxed(), "content is valid");

    let signature = signature_bytes(message.get("signature"))?;

    verify::verify_authenticity(crypto, message, author_key, &signature, hmac_key)
}

/// Decode the `signature` field of a message.
fn signature_bytes(signature: Option<&Value>) -> Result<[u8; SIGNATURE_BYTES]> {
    let signature = match signature {
        Some(Value::String(signature)) => signature.strip_suffix(SIGNATURE_SUFFIX),
        _ => None,
    };
    let signature = match signature {
        Some(signature) => signature,
        None => {
            return InvalidSignatureSuffix {
                suffix: SIGNATURE_SUFFIX,
            }
            .fail()
        }
    };
    ensure!(utils::is_canonical_base64(signature), InvalidSignatureBase64);

    let bytes = utils::node_base64_decode(signature);
    ensure!(
        bytes.len() == SIGNATURE_BYTES,
        InvalidSignatureLength {
            expected: SIGNATURE_BYTES,
            actual: bytes.len()
        }
    );
    let mut signature = [0u8; SIGNATURE_BYTES];
    signature.copy_from_slice(&bytes);
    Ok(signature)
}
