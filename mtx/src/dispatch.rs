//! Capability-typed target dispatch.
//!
//! The forwarder is agnostic to what it calls: a target is an opaque
//! handler identified by address, invoked with opaque bytes, answering with
//! a success flag and return data. [`TargetHandler`] is that capability;
//! [`TargetRegistry`] routes a request's `to` address to the handler.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256};
use dashmap::DashMap;
#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::error::ForwardError;

/// Caller context for a forwarded call.
///
/// `from` is the verified signer, not the relayer: the whole point of the
/// forwarding protocol is that the handler attributes the call to the
/// original requester.
#[derive(Debug, Clone)]
pub struct CallContext {
    /// The verified signer the call is attributed to.
    pub from: Address,
    /// Native-currency amount forwarded with the call.
    pub value: U256,
    /// Gas budget for the call.
    pub gas: u64,
    /// Encoded call payload (function selector + arguments).
    pub data: Bytes,
}

/// Result of a forwarded call: the `(bool success, bytes returnData)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    /// Whether the call completed without reverting.
    pub success: bool,
    /// Return data on success, revert data on failure.
    pub return_data: Bytes,
}

impl CallOutcome {
    /// A successful call with the given return data.
    #[must_use]
    pub const fn succeeded(return_data: Bytes) -> Self {
        Self {
            success: true,
            return_data,
        }
    }

    /// A reverted call with the given revert data.
    #[must_use]
    pub const fn reverted(revert_data: Bytes) -> Self {
        Self {
            success: false,
            return_data: revert_data,
        }
    }

    /// Lifts a failed outcome into [`ForwardError::TargetCall`].
    ///
    /// Note the nonce is already spent by the time an outcome exists: a
    /// failed target call does not undo verification.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::TargetCall`] when the call reverted.
    pub fn into_result(self) -> Result<Bytes, ForwardError> {
        if self.success {
            Ok(self.return_data)
        } else {
            Err(ForwardError::TargetCall(self.return_data))
        }
    }
}

/// An opaque call handler reachable at an address.
///
/// Handlers own their state and mutate it through `&self`; a handler that
/// reports failure must leave its state as it was before the call, matching
/// the revert semantics of the execution environments this models.
pub trait TargetHandler: Send + Sync {
    /// Executes the call described by `ctx`.
    fn call(&self, ctx: CallContext) -> CallOutcome;
}

/// Registry of call handlers keyed by target address.
#[derive(Default)]
pub struct TargetRegistry {
    handlers: DashMap<Address, Arc<dyn TargetHandler>>,
}

impl std::fmt::Debug for TargetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetRegistry")
            .field("handler_count", &self.handlers.len())
            .finish()
    }
}

impl TargetRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` at `address`, replacing any previous handler.
    pub fn register(&self, address: Address, handler: Arc<dyn TargetHandler>) {
        self.handlers.insert(address, handler);
    }

    /// Looks up the handler registered at `to`.
    ///
    /// Resolving before committing any state lets a caller treat a missing
    /// target as a verification-stage failure.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::UnknownTarget`] if no handler is registered.
    pub fn resolve(&self, to: Address) -> Result<Arc<dyn TargetHandler>, ForwardError> {
        self.handlers
            .get(&to)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(ForwardError::UnknownTarget(to))
    }

    /// Dispatches `ctx` to the handler registered at `to`.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::UnknownTarget`] if no handler is registered.
    #[cfg_attr(feature = "telemetry", instrument(skip_all, err, fields(to = %to, from = %ctx.from)))]
    pub fn dispatch(&self, to: Address, ctx: CallContext) -> Result<CallOutcome, ForwardError> {
        let handler = self.resolve(to)?;
        Ok(handler.call(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    struct Echo;

    impl TargetHandler for Echo {
        fn call(&self, ctx: CallContext) -> CallOutcome {
            CallOutcome::succeeded(ctx.data)
        }
    }

    const TARGET: Address = address!("0x00000000000000000000000000000000000000e0");

    fn ctx(data: &'static [u8]) -> CallContext {
        CallContext {
            from: Address::ZERO,
            value: U256::ZERO,
            gas: 1_000_000,
            data: Bytes::from_static(data),
        }
    }

    #[test]
    fn test_dispatch_routes_by_address() {
        let registry = TargetRegistry::new();
        registry.register(TARGET, Arc::new(Echo));
        let outcome = registry.dispatch(TARGET, ctx(&[0x01, 0x02])).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.return_data.as_ref(), &[0x01, 0x02]);
    }

    #[test]
    fn test_dispatch_unknown_target() {
        let registry = TargetRegistry::new();
        let err = registry.dispatch(TARGET, ctx(&[])).unwrap_err();
        assert!(matches!(err, ForwardError::UnknownTarget(addr) if addr == TARGET));
    }

    #[test]
    fn test_outcome_into_result() {
        let revert = CallOutcome::reverted(Bytes::from_static(&[0xff]));
        assert!(matches!(
            revert.into_result(),
            Err(ForwardError::TargetCall(_))
        ));
        let ok = CallOutcome::succeeded(Bytes::new());
        assert!(ok.into_result().is_ok());
    }
}
