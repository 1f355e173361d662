//! Completes partial requests with defaults and a fresh nonce.
//!
//! The builder mirrors the client-side construction step: given `{from, to,
//! data, deadline}`, it fills in `value` and `gas` defaults and fetches the
//! signer's current nonce from the forwarder. The nonce read and the
//! eventual submission are not atomic; a competing request landing first
//! makes the built request stale, which the forwarder reports as
//! `StaleNonce` and the caller remediates by rebuilding.

use std::future::Future;

use alloy_primitives::{Address, U256};
use mtx::request::DEFAULT_GAS_LIMIT;
use mtx::{ForwardError, ForwardRequest, ForwardRequestInput};

/// Read-only access to a forwarder's per-address nonce counter.
///
/// Implemented by the in-process [`Forwarder`](crate::forwarder::Forwarder);
/// a remote deployment would implement this over an RPC read.
pub trait NonceLookup: Send + Sync {
    /// Returns the current nonce for `from`.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::NonceLookup`] when the forwarder is
    /// unreachable or rejects the query.
    fn nonces(&self, from: Address) -> impl Future<Output = Result<u64, ForwardError>> + Send;
}

impl<T: NonceLookup + Sync> NonceLookup for std::sync::Arc<T> {
    fn nonces(&self, from: Address) -> impl Future<Output = Result<u64, ForwardError>> + Send {
        (**self).nonces(from)
    }
}

/// Builds complete forward requests from caller-supplied partial input.
///
/// Carries the `value`/`gas` defaults (0 and 1,000,000 respectively);
/// both can be changed per-builder via `with_*` or per-request on the
/// [`ForwardRequestInput`].
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder {
    value: U256,
    gas: u64,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    /// Creates a builder with the standard defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: U256::ZERO,
            gas: DEFAULT_GAS_LIMIT,
        }
    }

    /// Sets the default native-currency value for built requests.
    #[must_use]
    pub const fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Sets the default gas budget for built requests.
    #[must_use]
    pub const fn with_gas(mut self, gas: u64) -> Self {
        self.gas = gas;
        self
    }

    /// Completes `input` into a [`ForwardRequest`], fetching the signer's
    /// current nonce from `forwarder`.
    ///
    /// Read-only: the forwarder's state is not touched beyond the nonce
    /// query.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::NonceLookup`] if the nonce query fails.
    pub async fn build<L: NonceLookup>(
        &self,
        forwarder: &L,
        input: ForwardRequestInput,
    ) -> Result<ForwardRequest, ForwardError> {
        let nonce = forwarder.nonces(input.from).await?;
        Ok(ForwardRequest {
            from: input.from,
            to: input.to,
            value: input.value.unwrap_or(self.value),
            gas: input.gas.unwrap_or(self.gas),
            nonce,
            deadline: input.deadline,
            data: input.data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Bytes, address};
    use mtx::UnixTimestamp;

    struct FixedNonce(u64);

    impl NonceLookup for FixedNonce {
        async fn nonces(&self, _from: Address) -> Result<u64, ForwardError> {
            Ok(self.0)
        }
    }

    struct Unreachable;

    impl NonceLookup for Unreachable {
        async fn nonces(&self, _from: Address) -> Result<u64, ForwardError> {
            Err(ForwardError::NonceLookup("connection refused".into()))
        }
    }

    fn input() -> ForwardRequestInput {
        ForwardRequestInput::new(
            address!("0x0000000000000000000000000000000000000001"),
            address!("0x0000000000000000000000000000000000000002"),
            Bytes::from_static(&[0xab]),
            UnixTimestamp::from_secs(2_000_000_000),
        )
    }

    #[tokio::test]
    async fn test_build_applies_defaults_and_nonce() {
        let request = RequestBuilder::new()
            .build(&FixedNonce(7), input())
            .await
            .unwrap();
        assert_eq!(request.value, U256::ZERO);
        assert_eq!(request.gas, DEFAULT_GAS_LIMIT);
        assert_eq!(request.nonce, 7);
    }

    #[tokio::test]
    async fn test_per_request_overrides_beat_builder_defaults() {
        let builder = RequestBuilder::new().with_gas(30_000);
        let request = builder
            .build(&FixedNonce(0), input().with_gas(90_000).with_value(U256::from(5)))
            .await
            .unwrap();
        assert_eq!(request.gas, 90_000);
        assert_eq!(request.value, U256::from(5));
    }

    #[tokio::test]
    async fn test_build_surfaces_lookup_failure() {
        let err = RequestBuilder::new()
            .build(&Unreachable, input())
            .await
            .unwrap_err();
        assert!(matches!(err, ForwardError::NonceLookup(_)));
    }
}
