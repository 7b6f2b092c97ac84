//! Validating the JSON objects fed to the command line validator.
//!
//! The input is a single object of shape: `{
//! message: {...},
//! state: { id: "", sequence: ... },
//! hmacKey: ""
//! }` where `state` and `hmacKey` may be `null` or left out.
use serde::{Deserialize, Deserializer};
use snafu::ResultExt;
use ssb_legacy_msg_data::json::from_slice;
use ssb_legacy_msg_data::value::Value;

use crate::error::{InvalidInput, MessageNotObject, Result};
use crate::message_value::check_message_value;
use crate::state::FeedState;
use crate::verify::{Crypto, HmacKey, Sodium};

/// Everything needed to validate one message.
#[derive(Deserialize, Debug, Clone)]
pub struct ValidationInput {
    /// `None` when the field is missing, `Some(Value::Null)` when it is `null`.
    #[serde(default, deserialize_with = "present")]
    pub message: Option<Value>,
    #[serde(default)]
    pub state: Option<FeedState>,
    #[serde(default, rename = "hmacKey")]
    pub hmac_key: Option<Value>,
}

/// Deserializes a field that is present, even when it is `null`.
pub(crate) fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl ValidationInput {
    pub fn validate(&self) -> Result<()> {
        self.validate_with(&Sodium)
    }

    pub fn validate_with<C: Crypto + ?Sized>(&self, crypto: &C) -> Result<()> {
        validate_parts(
            crypto,
            self.message.as_ref(),
            self.state.as_ref(),
            self.hmac_key.as_ref(),
        )
    }
}

/// Validate a message given in untyped parts. A missing `state` is the state of an empty feed.
pub(crate) fn validate_parts<C: Crypto + ?Sized>(
    crypto: &C,
    message: Option<&Value>,
    state: Option<&FeedState>,
    hmac_key: Option<&Value>,
) -> Result<()> {
    let hmac_key = match hmac_key {
        Some(hmac_key) => HmacKey::from_value(hmac_key)?,
        None => None,
    };
    let initial = FeedState::initial();
    let state = state.unwrap_or(&initial);
    match message {
        Some(message) => check_message_value(crypto, message, state, hmac_key.as_ref()),
        None => MessageNotObject.fail(),
    }
}

/// Decode a JSON encoded [`ValidationInput`] and validate it.
pub fn validate_input<T: AsRef<[u8]>>(input_bytes: T) -> Result<()> {
    let input_bytes = input_bytes.as_ref();
    let input = from_slice::<ValidationInput>(input_bytes).context(InvalidInput {
        input: input_bytes.to_owned(),
    })?;
    input.validate()
}
