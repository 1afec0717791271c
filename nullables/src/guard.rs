//! Nullable jail authority.

use std::collections::HashSet;
use std::sync::Mutex;

use tru_staking::{AuthGuard, GuardError};
use tru_types::AccountAddress;

/// An in-memory jail list with a one-shot failure switch.
///
/// After [`NullAuthGuard::fail`], the next guard call (either `is_jailed` or
/// `unjail`) returns an error and the switch resets.
pub struct NullAuthGuard {
    jailed: Mutex<HashSet<AccountAddress>>,
    force_failure: Mutex<bool>,
}

impl NullAuthGuard {
    pub fn new() -> Self {
        Self {
            jailed: Mutex::new(HashSet::new()),
            force_failure: Mutex::new(false),
        }
    }

    pub fn jail(&self, address: &AccountAddress) {
        self.jailed.lock().unwrap().insert(address.clone());
    }

    /// Make the next guard call fail.
    pub fn fail(&self) {
        *self.force_failure.lock().unwrap() = true;
    }

    fn take_failure(&self) -> Result<(), GuardError> {
        let mut force = self.force_failure.lock().unwrap();
        if *force {
            *force = false;
            return Err(GuardError::new("forced guard failure"));
        }
        Ok(())
    }
}

impl Default for NullAuthGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthGuard for NullAuthGuard {
    fn is_jailed(&self, address: &AccountAddress) -> Result<bool, GuardError> {
        self.take_failure()?;
        Ok(self.jailed.lock().unwrap().contains(address))
    }

    fn unjail(&self, address: &AccountAddress) -> Result<(), GuardError> {
        self.take_failure()?;
        self.jailed.lock().unwrap().remove(address);
        Ok(())
    }
}
