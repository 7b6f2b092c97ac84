use snafu::Snafu;
use ssb_legacy_msg_data::json::{DecodeJsonError, EncodeJsonError};
use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility = "pub(crate)")]
pub enum Error {
    #[snafu(display("HMAC key must be a string"))]
    InvalidHmacKeyType,
    #[snafu(display("HMAC key must decode to a value with {} bytes", expected))]
    InvalidHmacKeyLength { expected: usize, actual: usize },
    #[snafu(display("Message must be an object"))]
    MessageNotObject,
    #[snafu(display("Message must not be null"))]
    MessageNull,
    #[snafu(display("Message must decode a value with fewer than {} bytes (latin1)", max))]
    MessageTooLarge { max: usize, length: usize },
    #[snafu(display("Message must have a valid order"))]
    InvalidMessageValueOrder { keys: Vec<String> },
    #[snafu(display("Message author must be a string"))]
    AuthorNotString,
    #[snafu(display("Message author must end with '{}'", suffix))]
    InvalidAuthorSuffix { suffix: &'static str },
    #[snafu(display("Message sequence must be a number"))]
    SequenceNotNumber,
    #[snafu(display("Message sequence must be the previous sequence number plus one"))]
    InvalidSequenceNumber { actual: f64, expected: u64 },
    #[snafu(display("Message hash must be 'sha256'"))]
    InvalidHashFunction,
    #[snafu(display("Message timestamp must be a number"))]
    TimestampNotNumber,
    #[snafu(display("Message content string must contain '.box'"))]
    ContentMissingBox,
    #[snafu(display("Message content string base64 must be canonical"))]
    InvalidBoxBase64,
    #[snafu(display("Message content must not be null"))]
    ContentNull,
    #[snafu(display("Message content must not be an array"))]
    ContentArray,
    #[snafu(display("Message content type must be a string"))]
    ContentTypeNotString,
    #[snafu(display("Message content type length must not be greater than {}", max))]
    ContentTypeTooLong { max: usize, length: usize },
    #[snafu(display("Message content type length must not be less than {}", min))]
    ContentTypeTooShort { min: usize, length: usize },
    #[snafu(display("Message content must be a string or an object"))]
    InvalidContent,
    #[snafu(display("Message signature must end with '{}'", suffix))]
    InvalidSignatureSuffix { suffix: &'static str },
    #[snafu(display("Signature base64 must be canonical"))]
    InvalidSignatureBase64,
    #[snafu(display("Signature must decode to a value with {} bytes", expected))]
    InvalidSignatureLength { expected: usize, actual: usize },
    #[snafu(display("Author must decode to a value with {} bytes", expected))]
    InvalidAuthorKeyLength { expected: usize, actual: usize },
    #[snafu(display("Signature value must verify the unsigned message bytes"))]
    InvalidSignature,
    #[snafu(display("Could not serialize message to bytes. Failed with: {}", source))]
    InvalidMessageCouldNotSerializeValue { source: EncodeJsonError },
    #[snafu(display("Validation input was invalid. Decoding failed with: {}", source))]
    InvalidInput {
        source: DecodeJsonError,
        input: Vec<u8>,
    },
    #[snafu(display("Could not read fixtures from {}: {}", path.display(), source))]
    ReadFixtures {
        source: std::io::Error,
        path: PathBuf,
    },
    #[snafu(display("Could not write fixtures to {}: {}", path.display(), source))]
    WriteFixtures {
        source: std::io::Error,
        path: PathBuf,
    },
    #[snafu(display("Fixtures were invalid. Decoding failed with: {}", source))]
    InvalidFixtures { source: DecodeJsonError },
}

impl Error {
    /// Whether this error is a verdict on the message (as opposed to an I/O or decoding failure
    /// surrounding the validation call).
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            Error::InvalidMessageCouldNotSerializeValue { .. }
                | Error::InvalidInput { .. }
                | Error::ReadFixtures { .. }
                | Error::WriteFixtures { .. }
                | Error::InvalidFixtures { .. }
        )
    }
}
