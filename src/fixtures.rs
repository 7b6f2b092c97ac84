//! Maintaining and running files of test fixtures.
//!
//! A fixture file is a JSON array of objects of shape: `{
//! message: {...},
//! state: { id: "", sequence: ... },
//! hmacKey: "",
//! valid: true,
//! id: ""
//! }`. `id` is the id of `message` and is filled in by [`hash_fixtures`].
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use ssb_legacy_msg_data::json::{self, from_slice};
use ssb_legacy_msg_data::value::Value;
use ssb_multiformats::multihash::Multihash;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{
    InvalidFixtures, InvalidMessageCouldNotSerializeValue, ReadFixtures, Result, WriteFixtures,
};
use crate::input::validate_parts;
use crate::state::FeedState;
use crate::utils;
use crate::verify::Sodium;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Fixture {
    pub message: Value,
    #[serde(default)]
    pub state: Option<FeedState>,
    #[serde(default, rename = "hmacKey")]
    pub hmac_key: Option<Value>,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Multihash>,
}

impl Fixture {
    pub fn validate(&self) -> Result<()> {
        validate_parts(
            &Sodium,
            Some(&self.message),
            self.state.as_ref(),
            self.hmac_key.as_ref(),
        )
    }

    pub fn has_hmac_key(&self) -> bool {
        match &self.hmac_key {
            None | Some(Value::Null) => false,
            Some(_) => true,
        }
    }
}

/// A fixture whose validation result disagrees with its `valid` flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    /// Position of the fixture in its file.
    pub index: usize,
    pub expected_valid: bool,
    /// Why the message was rejected, if it was.
    pub error: Option<String>,
}

pub fn read_fixtures<P: AsRef<Path>>(path: P) -> Result<Vec<Fixture>> {
    let path = path.as_ref();
    let bytes = fs::read(path).context(ReadFixtures {
        path: path.to_path_buf(),
    })?;
    from_slice(&bytes).context(InvalidFixtures)
}

/// Write fixtures as JSON with two space indentation.
pub fn write_fixtures<P: AsRef<Path>>(path: P, fixtures: &[Fixture]) -> Result<()> {
    let path = path.as_ref();
    let text = json::to_string(&fixtures, false).context(InvalidMessageCouldNotSerializeValue)?;
    fs::write(path, text).context(WriteFixtures {
        path: path.to_path_buf(),
    })
}

/// Set the `id` of every fixture to the id of its message.
pub fn hash_fixtures(fixtures: &mut [Fixture]) -> Result<()> {
    for fixture in fixtures.iter_mut() {
        fixture.id = Some(utils::message_id(&fixture.message)?);
    }
    Ok(())
}

/// Order fixtures from easiest to hardest to get right: valid without an HMAC key, invalid
/// without an HMAC key, valid with an HMAC key and finally invalid with an HMAC key.
///
/// Fixtures keep their relative order within each group.
pub fn sort_fixtures(fixtures: &mut [Fixture]) {
    fixtures.sort_by_key(|fixture| (fixture.has_hmac_key(), !fixture.valid));
}

/// Validate every fixture and collect the ones that don't get the expected result, in file order.
pub fn check_fixtures(fixtures: &[Fixture]) -> Vec<Mismatch> {
    let mismatches: Vec<Mismatch> = fixtures
        .par_iter()
        .enumerate()
        .filter_map(|(index, fixture)| {
            let result = fixture.validate();
            if result.is_ok() == fixture.valid {
                None
            } else {
                Some(Mismatch {
                    index,
                    expected_valid: fixture.valid,
                    error: result.err().map(|err| err.to_string()),
                })
            }
        })
        .collect();
    info!(
        total = fixtures.len(),
        mismatches = mismatches.len(),
        "checked fixtures"
    );
    mismatches
}
