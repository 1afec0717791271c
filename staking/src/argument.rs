//! Argument records.

use serde::{Deserialize, Serialize};
use tru_types::{AccountAddress, Amount, ArgumentId, ClaimId, Timestamp};

use crate::stake::StakeType;

/// A user-authored position backing or challenging a claim.
///
/// Everything except `upvoted_count`, `upvoted_stake` and `updated_time` is
/// fixed at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub id: ArgumentId,
    pub creator: AccountAddress,
    pub claim_id: ClaimId,
    pub summary: String,
    pub body: String,
    /// `Backing` or `Challenge`; never `Upvote`.
    pub stake_type: StakeType,
    pub created_time: Timestamp,
    pub updated_time: Timestamp,
    /// Initial stake plus every accepted upvote.
    pub upvoted_count: u64,
    /// Sum of the amounts counted in `upvoted_count`.
    pub upvoted_stake: Amount,
}
