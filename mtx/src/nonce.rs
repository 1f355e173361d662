//! Keyed per-address nonce counters for replay protection.
//!
//! Each signer address owns a counter that starts at 0 and only ever moves
//! forward. A request is valid for exactly one counter value; committing it
//! advances the counter, so a replayed request can never match again. The
//! store contract is single-writer-at-a-time per address: the
//! check-and-advance on commit is atomic, with no partial writes.

use alloy_primitives::Address;
use dashmap::DashMap;
#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::error::ForwardError;

/// A keyed monotonic counter store with atomic check-and-advance.
pub trait NonceStore: Send + Sync {
    /// Returns the current counter for `address` (0 if never used).
    fn current(&self, address: Address) -> u64;

    /// Atomically advances the counter for `address`, but only if it
    /// currently equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::StaleNonce`] when the counter has moved,
    /// leaving it untouched.
    fn consume(&self, address: Address, expected: u64) -> Result<(), ForwardError>;
}

impl<T: NonceStore> NonceStore for std::sync::Arc<T> {
    fn current(&self, address: Address) -> u64 {
        (**self).current(address)
    }

    fn consume(&self, address: Address, expected: u64) -> Result<(), ForwardError> {
        (**self).consume(address, expected)
    }
}

/// In-memory nonce store backed by a concurrent map.
///
/// The [`DashMap`] entry guard serializes writers per address, which is the
/// whole single-writer contract: `consume` holds the guard across the
/// compare and the increment.
#[derive(Debug, Default)]
pub struct InMemoryNonceStore {
    nonces: DashMap<Address, u64>,
}

impl InMemoryNonceStore {
    /// Creates an empty store; every address starts at nonce 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl NonceStore for InMemoryNonceStore {
    fn current(&self, address: Address) -> u64 {
        self.nonces.get(&address).map_or(0, |entry| *entry)
    }

    #[cfg_attr(feature = "telemetry", instrument(skip_all, err, fields(address = %address, expected)))]
    fn consume(&self, address: Address, expected: u64) -> Result<(), ForwardError> {
        let mut entry = self.nonces.entry(address).or_insert(0);
        if *entry != expected {
            return Err(ForwardError::StaleNonce {
                expected: *entry,
                got: expected,
            });
        }
        *entry += 1;
        Ok(())
    }
}
