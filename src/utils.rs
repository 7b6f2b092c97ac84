//! Helper functions used during validation computations.
use base64::{
    alphabet,
    engine::{general_purpose::STANDARD, DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use serde::ser::{Serialize, SerializeMap, Serializer};
use sha2::{Digest, Sha256};
use snafu::ResultExt;
use ssb_legacy_msg_data::json;
use ssb_legacy_msg_data::value::{RidiculousStringMap, Value};
use ssb_multiformats::multihash::Multihash;

use crate::error::{InvalidMessageCouldNotSerializeValue, Result};

/// The two orders in which the top-level fields of a message may appear. Only `author` and
/// `sequence` may swap places.
pub const VALID_ORDERS: [[&str; 7]; 2] = [
    [
        "previous",
        "author",
        "sequence",
        "timestamp",
        "hash",
        "content",
        "signature",
    ],
    [
        "previous",
        "sequence",
        "author",
        "timestamp",
        "hash",
        "content",
        "signature",
    ],
];

/// Decodes without padding and without rejecting non-zero trailing bits; the input is cleaned up
/// by `node_base64_decode` before it gets here.
const NODE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// Check that the given string represents canonical base64.
///
/// A string is canonical when decoding it and encoding the result again reproduces it exactly.
/// This mirrors the [`is-canonical-base64` JS module](https://www.npmjs.com/package/is-canonical-base64)
/// by Dominic Tarr: padding is mandatory, the alphabet is the standard one and unused trailing
/// bits must be zero.
pub fn is_canonical_base64(text: &str) -> bool {
    STANDARD
        .decode(text)
        .map(|bytes| STANDARD.encode(bytes) == text)
        .unwrap_or(false)
}

/// Decode base64 the way node's `Buffer.from(text, 'base64')` does.
///
/// Node never fails here. It stops at the first `=`, accepts the url-safe alphabet, silently
/// skips anything else it doesn't recognise and drops a trailing sextet that can't form a byte.
/// This is why the `@` sigil in front of an author's key has no effect on the decoded key.
pub fn node_base64_decode(text: &str) -> Vec<u8> {
    let mut sextets: String = text
        .chars()
        .take_while(|&ch| ch != '=')
        .filter_map(|ch| match ch {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '+' | '/' => Some(ch),
            '-' => Some('+'),
            '_' => Some('/'),
            _ => None,
        })
        .collect();
    if sextets.len() % 4 == 1 {
        sextets.pop();
    }
    NODE_LENIENT.decode(sextets).unwrap_or_default()
}

/// Get the length of the given message value, when serialized as JSON, in latin1 bytes.
///
/// Latin1 stores one byte per UTF-16 code unit, so this is the UTF-16 length of the string.
pub fn latin1_length(value: &Value) -> Result<usize> {
    // the second arg is used to set `compact` to `false` (preserves whitespace)
    let value_str = json::to_string(value, false).context(InvalidMessageCouldNotSerializeValue)?;
    Ok(value_str.chars().map(|ch| ch.len_utf16()).sum())
}

/// The top-level keys of a message, in the order they appear.
pub fn message_keys(message: &RidiculousStringMap<Value>) -> Vec<String> {
    message
        .iter()
        .map(|(key, _)| {
            let key: &str = key.as_ref();
            key.to_owned()
        })
        .collect()
}

/// Check that the top-level fields (keys) comprising the given message are exactly the seven
/// message fields, in one of the [`VALID_ORDERS`].
///
/// This is a comparison of the whole key list, so missing fields, extra fields and shuffled fields
/// are all rejected. For more information on this and other quirks, you may wish to peruse the
/// issues and code for the JavaScript [ssb-validate library](https://github.com/ssb-js/ssb-validate).
pub fn is_correct_order(keys: &[String]) -> bool {
    VALID_ORDERS
        .iter()
        .any(|order| keys.iter().map(String::as_str).eq(order.iter().copied()))
}

/// Serializes a message object while leaving out its `signature` field.
struct Unsigned<'a>(&'a RidiculousStringMap<Value>);

impl<'a> Unsigned<'a> {
    fn entries(&self) -> impl Iterator<Item = (&'a str, &'a Value)> {
        self.0
            .iter()
            .map(|(key, value)| -> (&'a str, &'a Value) { (key.as_ref(), value) })
            .filter(|(key, _)| *key != "signature")
    }
}

impl<'a> Serialize for Unsigned<'a> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries().count()))?;
        for (key, value) in self.entries() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// The bytes that were signed by the author of a message.
///
/// This is the message without its `signature`, serialized as JSON with two space indentation and
/// encoded as UTF-8. Note that this is _not_ the encoding used for the size limit or for message
/// ids, see [`node_buffer_binary_serializer`].
pub fn unsigned_bytes(message: &RidiculousStringMap<Value>) -> Result<Vec<u8>> {
    json::to_vec(&Unsigned(message), false).context(InvalidMessageCouldNotSerializeValue)
}

/// Generate the id of a message.
///
/// The message is serialized as JSON with two space indentation and encoded as latin1 before the
/// hash is computed. The id is sometimes referred to as a `key` (as in, `KVT` - key, value,
/// timestamp) or as a `Multihash`. More information can be found in the
/// [`Multihash` documentation](https://spec.scuttlebutt.nz/feed/datatypes.html#multihash).
pub fn message_id(message: &Value) -> Result<Multihash> {
    let message_str = json::to_string(message, false).context(InvalidMessageCouldNotSerializeValue)?;
    let message_bytes_latin = node_buffer_binary_serializer(&message_str);
    let message_hash = Sha256::digest(message_bytes_latin.as_slice());
    Ok(Multihash::Message(message_hash.into()))
}

/// FML, scuttlebutt is miserable.
///
/// This is what node's `Buffer.from(messageString, 'binary')` does. Who knew?
/// So, surprise, but the way ssb encodes messages for signing vs the way it encodes them for
/// hashing is different.
pub fn node_buffer_binary_serializer(text: &str) -> Vec<u8> {
    text.encode_utf16()
        .map(|word| (word & 0xFF) as u8)
        .collect()
}
