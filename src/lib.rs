//! Validate messages of scuttlebutt feeds, one at a time.
//!
//! A message is checked against the state of its feed (the id and sequence number of the last
//! accepted message). The checks are run in a fixed order and the first one that fails is
//! reported:
//!
//! - the HMAC key, if there is one, must decode to 32 bytes
//! - the message must be an object of at most 8192 latin1 bytes when serialized
//! - the fields must be `previous`, `author`, `sequence`, `timestamp`, `hash`, `content` and
//!   `signature`, in that order (`author` and `sequence` may swap)
//! - each field must have the right type and format, and the sequence must follow the state
//! - the signature must verify the message, or its HMAC when an HMAC key is given
//!
//! Validation is a pure function of its inputs, so it can be run from as many threads as you
//! like. Keeping the feed state up to date between messages is up to the caller.
//!
//! # Example
//!```
//!use ssb_legacy_msg_data::json::from_slice;
//!use ssb_legacy_msg_data::value::Value;
//!use ssb_validate2::{utils, validate_message_value, FeedState};
//!let valid_message_1 = r##"{
//!  "previous": null,
//!  "author": "@U5GvOKP/YUza9k53DSXxT0mk3PIrnyAmessvNfZl5E0=.ed25519",
//!  "sequence": 1,
//!  "timestamp": 1470186877575,
//!  "hash": "sha256",
//!  "content": {
//!    "type": "about",
//!    "about": "@U5GvOKP/YUza9k53DSXxT0mk3PIrnyAmessvNfZl5E0=.ed25519",
//!    "name": "Piet"
//!  },
//!  "signature": "QJKWui3oyK6r5dH13xHkEVFhfMZDTXfK2tW21nyfheFClSf69yYK77Itj1BGcOimZ16pj9u3tMArLUCGSscqCQ==.sig.ed25519"
//!}"##;
//! let message: Value = from_slice(valid_message_1.as_bytes()).unwrap();
//! let state = FeedState::initial();
//! assert!(validate_message_value(&message, &state, None).is_ok());
//!
//! // The same message can't be the second message of the feed.
//! let state = state.next(utils::message_id(&message).unwrap());
//! assert!(validate_message_value(&message, &state, None).is_err());
//!```
pub mod error;
pub mod fixtures;
pub mod input;
pub mod message_value;
pub mod state;
pub mod utils;
pub mod verify;

#[cfg(test)]
mod test_data;

pub use error::{Error, Result};
pub use input::{validate_input, ValidationInput};
pub use message_value::{
    is_valid_message_value, par_validate_message_values, validate_message_value,
    validate_message_value_with, Content,
};
pub use state::FeedState;
pub use verify::{Crypto, HmacKey, Sodium};
