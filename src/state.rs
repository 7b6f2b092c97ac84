//! The state of a feed as seen by the validator.
use serde::{Deserialize, Serialize};
use ssb_multiformats::multihash::Multihash;

/// The id and sequence number of the last message accepted into a feed.
///
/// The validator only reads this; keeping it up to date between messages of a feed is up to the
/// caller. Use [`FeedState::initial`] when validating the first message of a feed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FeedState {
    pub id: Option<Multihash>,
    pub sequence: u64,
}

impl FeedState {
    /// The state of a feed that has no messages yet.
    pub fn initial() -> FeedState {
        FeedState {
            id: None,
            sequence: 0,
        }
    }

    pub fn new(id: Multihash, sequence: u64) -> FeedState {
        FeedState {
            id: Some(id),
            sequence,
        }
    }

    /// The state after the successor of this state, with the given id, has been accepted.
    pub fn next(&self, id: Multihash) -> FeedState {
        FeedState::new(id, self.expected_sequence())
    }

    /// The sequence number the next message of this feed must have.
    pub fn expected_sequence(&self) -> u64 {
        self.sequence.saturating_add(1)
    }
}
