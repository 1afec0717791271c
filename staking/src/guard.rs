//! Account authorization guard.
//!
//! The staking engine does not own account state. Whether an account is
//! jailed is answered by an external authority, reached through the
//! [`AuthGuard`] trait so nodes and tests can plug in their own.

use thiserror::Error;
use tru_types::AccountAddress;

/// Failure reported by the authorization authority itself, as opposed to a
/// negative answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GuardError {
    pub message: String,
}

impl GuardError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Answers whether an account may act.
pub trait AuthGuard {
    /// `Ok(true)` if the account is currently jailed.
    fn is_jailed(&self, address: &AccountAddress) -> Result<bool, GuardError>;

    /// Lift a jail. Unjailing an account that is not jailed is a no-op.
    fn unjail(&self, address: &AccountAddress) -> Result<(), GuardError>;
}

impl<T: AuthGuard + ?Sized> AuthGuard for &T {
    fn is_jailed(&self, address: &AccountAddress) -> Result<bool, GuardError> {
        (**self).is_jailed(address)
    }

    fn unjail(&self, address: &AccountAddress) -> Result<(), GuardError> {
        (**self).unjail(address)
    }
}
