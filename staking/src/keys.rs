//! Key layout of the staking key space.
//!
//! Every key starts with a one-byte prefix. Integers are big-endian so that
//! byte order equals numeric order, and addresses are length-prefixed so a
//! user's entries form one contiguous range.
//!
//! | Prefix | Key                                   | Value          |
//! |--------|---------------------------------------|----------------|
//! | `0x00` | next argument id                      | `u64` BE       |
//! | `0x01` | next stake id                         | `u64` BE       |
//! | `0x02` | params                                | bincode        |
//! | `0x10` | argument id                           | bincode        |
//! | `0x11` | stake id                              | bincode        |
//! | `0x20` | claim id ++ argument id               | empty          |
//! | `0x21` | argument id ++ stake id               | empty          |
//! | `0x22` | address ++ argument id                | empty          |
//! | `0x23` | address ++ stake id                   | empty          |
//! | `0x24` | argument id ++ address                | stake id BE    |
//! | `0x30` | end time ++ stake id                  | empty          |

use tru_types::{AccountAddress, ArgumentId, ClaimId, StakeId, Timestamp};

use crate::StakingError;

pub const NEXT_ARGUMENT_ID: &[u8] = &[0x00];
pub const NEXT_STAKE_ID: &[u8] = &[0x01];
pub const PARAMS: &[u8] = &[0x02];

pub const ARGUMENT_PREFIX: u8 = 0x10;
pub const STAKE_PREFIX: u8 = 0x11;
pub const CLAIM_ARGUMENTS_PREFIX: u8 = 0x20;
pub const ARGUMENT_STAKES_PREFIX: u8 = 0x21;
pub const USER_ARGUMENTS_PREFIX: u8 = 0x22;
pub const USER_STAKES_PREFIX: u8 = 0x23;
pub const ARGUMENT_STAKER_PREFIX: u8 = 0x24;
pub const ACTIVE_QUEUE_PREFIX: u8 = 0x30;

fn with_prefix(prefix: u8, capacity: usize) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + capacity);
    key.push(prefix);
    key
}

fn push_address(key: &mut Vec<u8>, address: &AccountAddress) {
    let bytes = address.as_str().as_bytes();
    // AccountAddress caps its length at 64 bytes.
    key.push(bytes.len() as u8);
    key.extend_from_slice(bytes);
}

pub fn argument(id: ArgumentId) -> Vec<u8> {
    let mut key = with_prefix(ARGUMENT_PREFIX, 8);
    key.extend_from_slice(&id.to_be_bytes());
    key
}

pub fn stake(id: StakeId) -> Vec<u8> {
    let mut key = with_prefix(STAKE_PREFIX, 8);
    key.extend_from_slice(&id.to_be_bytes());
    key
}

pub fn claim_arguments_prefix(claim_id: ClaimId) -> Vec<u8> {
    let mut key = with_prefix(CLAIM_ARGUMENTS_PREFIX, 16);
    key.extend_from_slice(&claim_id.to_be_bytes());
    key
}

pub fn claim_argument(claim_id: ClaimId, argument_id: ArgumentId) -> Vec<u8> {
    let mut key = claim_arguments_prefix(claim_id);
    key.extend_from_slice(&argument_id.to_be_bytes());
    key
}

pub fn argument_stakes_prefix(argument_id: ArgumentId) -> Vec<u8> {
    let mut key = with_prefix(ARGUMENT_STAKES_PREFIX, 16);
    key.extend_from_slice(&argument_id.to_be_bytes());
    key
}

pub fn argument_stake(argument_id: ArgumentId, stake_id: StakeId) -> Vec<u8> {
    let mut key = argument_stakes_prefix(argument_id);
    key.extend_from_slice(&stake_id.to_be_bytes());
    key
}

pub fn user_arguments_prefix(address: &AccountAddress) -> Vec<u8> {
    let mut key = with_prefix(USER_ARGUMENTS_PREFIX, 1 + address.as_str().len() + 8);
    push_address(&mut key, address);
    key
}

pub fn user_argument(address: &AccountAddress, argument_id: ArgumentId) -> Vec<u8> {
    let mut key = user_arguments_prefix(address);
    key.extend_from_slice(&argument_id.to_be_bytes());
    key
}

pub fn user_stakes_prefix(address: &AccountAddress) -> Vec<u8> {
    let mut key = with_prefix(USER_STAKES_PREFIX, 1 + address.as_str().len() + 8);
    push_address(&mut key, address);
    key
}

pub fn user_stake(address: &AccountAddress, stake_id: StakeId) -> Vec<u8> {
    let mut key = user_stakes_prefix(address);
    key.extend_from_slice(&stake_id.to_be_bytes());
    key
}

pub fn argument_staker(argument_id: ArgumentId, address: &AccountAddress) -> Vec<u8> {
    let mut key = with_prefix(ARGUMENT_STAKER_PREFIX, 8 + 1 + address.as_str().len());
    key.extend_from_slice(&argument_id.to_be_bytes());
    push_address(&mut key, address);
    key
}

pub fn active_queue_prefix() -> Vec<u8> {
    vec![ACTIVE_QUEUE_PREFIX]
}

pub fn active_queue(end_time: Timestamp, stake_id: StakeId) -> Vec<u8> {
    let mut key = with_prefix(ACTIVE_QUEUE_PREFIX, 16);
    key.extend_from_slice(&end_time.to_be_bytes());
    key.extend_from_slice(&stake_id.to_be_bytes());
    key
}

/// Read a big-endian `u64` value.
pub fn decode_u64(bytes: &[u8]) -> Result<u64, StakingError> {
    let arr: [u8; 8] = bytes
        .try_into()
        .map_err(|_| StakingError::Codec(format!("expected 8 bytes, got {}", bytes.len())))?;
    Ok(u64::from_be_bytes(arr))
}

/// The id stored in the trailing eight bytes of an index key.
pub fn trailing_id(key: &[u8]) -> Result<u64, StakingError> {
    if key.len() < 9 {
        return Err(StakingError::Codec(format!(
            "index key too short: {} bytes",
            key.len()
        )));
    }
    decode_u64(&key[key.len() - 8..])
}

/// Split an active-queue key back into `(end_time, stake_id)`.
pub fn decode_active_queue(key: &[u8]) -> Result<(Timestamp, StakeId), StakingError> {
    if key.len() != 17 || key[0] != ACTIVE_QUEUE_PREFIX {
        return Err(StakingError::Codec("malformed active queue key".to_string()));
    }
    Ok((Timestamp::new(decode_u64(&key[1..9])?), decode_u64(&key[9..])?))
}
