//! The forward-request data model.
//!
//! A [`ForwardRequest`] is the unit of delegated intent: signer `from` wants
//! `to` to receive `data` with `value`, bounded by `gas` and `deadline`, at
//! the signer's current `nonce`. Requests are created fresh for every
//! relayed call, consumed exactly once by the forwarder (or rejected), and
//! never persisted client-side beyond the single relay attempt.

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::timestamp::UnixTimestamp;

/// Default gas budget for a forwarded call.
pub const DEFAULT_GAS_LIMIT: u64 = 1_000_000;

/// The caller-supplied portion of a forward request.
///
/// The request builder completes this into a [`ForwardRequest`] by applying
/// value/gas defaults and fetching the signer's current nonce from the
/// forwarder. `value` and `gas` may be set here to override the builder's
/// defaults for a single request.
#[derive(Debug, Clone)]
pub struct ForwardRequestInput {
    /// Address of the true requester (signer).
    pub from: Address,
    /// Address of the contract to be called on the requester's behalf.
    pub to: Address,
    /// Encoded call payload (function selector + arguments) for the target.
    pub data: Bytes,
    /// Expiry timestamp after which the request is invalid.
    pub deadline: UnixTimestamp,
    /// Native-currency amount to forward; `None` uses the builder default.
    pub value: Option<U256>,
    /// Gas budget for the forwarded call; `None` uses the builder default.
    pub gas: Option<u64>,
}

impl ForwardRequestInput {
    /// Creates a new input with no value/gas overrides.
    #[must_use]
    pub const fn new(from: Address, to: Address, data: Bytes, deadline: UnixTimestamp) -> Self {
        Self {
            from,
            to,
            data,
            deadline,
            value: None,
            gas: None,
        }
    }

    /// Overrides the builder's value default for this request.
    #[must_use]
    pub const fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    /// Overrides the builder's gas default for this request.
    #[must_use]
    pub const fn with_gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }
}

/// A completed, unsigned forward request.
///
/// Field names, types, and order match the fixed `ForwardRequest` EIP-712
/// schema (`from:address, to:address, value:uint256, gas:uint256,
/// nonce:uint256, deadline:uint48, data:bytes`). Once signed, any mutation
/// invalidates the signature: it binds the exact encoded contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardRequest {
    /// Address of the true requester (signer).
    pub from: Address,

    /// Address of the contract to be called on the requester's behalf.
    pub to: Address,

    /// Amount of native currency to forward with the call.
    pub value: U256,

    /// Gas budget for the forwarded call.
    pub gas: u64,

    /// The signer's nonce at the forwarder, fetched fresh before signing.
    ///
    /// Must still equal the forwarder's counter for `from` at verification
    /// time; a competing request landing first makes this stale.
    pub nonce: u64,

    /// Expiry timestamp (seconds); `uint48` on the wire.
    pub deadline: UnixTimestamp,

    /// Opaque encoded call payload for the target contract.
    pub data: Bytes,
}

impl ForwardRequest {
    /// Attaches a signature, producing the relayable request.
    #[must_use]
    pub fn into_signed(self, signature: Bytes) -> SignedForwardRequest {
        SignedForwardRequest {
            request: self,
            signature,
        }
    }
}

/// A forward request with its signature attached, ready to relay.
///
/// This is the envelope a relayer submits to the forwarder. The signature
/// covers only the seven request fields under the signing domain; it is
/// carried alongside, never inside, the signed payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedForwardRequest {
    /// The signed request contents.
    #[serde(flatten)]
    pub request: ForwardRequest,

    /// Signature over the EIP-712 hash of `request` (65 bytes for an EOA).
    pub signature: Bytes,
}
