//! Error taxonomy for meta-transaction forwarding.
//!
//! Every verification failure is fatal to that specific request: the
//! forwarder applies nothing partially, so the only question for the caller
//! is how to remediate. [`Remediation`] encodes that policy; [`ErrorReason`]
//! gives each failure a machine-readable code for relayers that surface
//! errors over a wire.

use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

use crate::domain::ForwardDomain;
use crate::timestamp::UnixTimestamp;

/// Errors that can occur while building, signing, or executing a forward
/// request.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ForwardError {
    /// The request's nonce no longer matches the forwarder's counter for
    /// `from`. A competing request was consumed first; rebuild and re-sign.
    #[error("Stale nonce: request carries {got}, forwarder expects {expected}")]
    StaleNonce {
        /// The forwarder's current counter for the signer.
        expected: u64,
        /// The nonce carried by the rejected request.
        got: u64,
    },

    /// The request's deadline has passed.
    #[error("Request expired: deadline {deadline}, current time {now}")]
    Expired {
        /// The deadline the request was signed with.
        deadline: UnixTimestamp,
        /// The forwarder's clock at verification time.
        now: UnixTimestamp,
    },

    /// The recovered signer does not match the request's `from` address.
    ///
    /// Indicates a forged, corrupted, or mis-encoded request; never retried
    /// with the same payload. A signature produced under a foreign domain
    /// also lands here, since the domain is embedded in the signed hash.
    #[error("Bad signature: {0}")]
    BadSignature(String),

    /// The domain the request was signed under does not identify the target
    /// forwarder. Caught by the relayer pre-flight before submission.
    #[error("Domain mismatch: signed for {signed}, target is {target}")]
    DomainMismatch {
        /// The domain embedded in the typed-data descriptor.
        signed: Box<ForwardDomain>,
        /// The domain of the forwarder the relayer is about to submit to.
        target: Box<ForwardDomain>,
    },

    /// The forwarded call itself reverted or failed.
    ///
    /// Verification succeeded, so the nonce was consumed and the request is
    /// spent; only the payload effect did not happen. Rebuilding with a
    /// fresh nonce is required to try again.
    #[error("Target call failed ({} bytes of revert data)", .0.len())]
    TargetCall(Bytes),

    /// No handler is registered for the request's target address.
    #[error("No target registered at {0}")]
    UnknownTarget(Address),

    /// The forwarder's nonce lookup failed while building a request.
    #[error("Nonce lookup failed: {0}")]
    NonceLookup(String),

    /// The signer adapter failed to produce a signature.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// The request is malformed (e.g., a deadline that does not fit the
    /// `uint48` wire encoding).
    #[error("Invalid request: {0}")]
    InvalidFormat(String),
}

impl ForwardError {
    /// Machine-readable reason code for this error.
    #[must_use]
    pub const fn reason(&self) -> ErrorReason {
        match self {
            Self::StaleNonce { .. } => ErrorReason::StaleNonce,
            Self::Expired { .. } => ErrorReason::Expired,
            Self::BadSignature(_) => ErrorReason::BadSignature,
            Self::DomainMismatch { .. } => ErrorReason::DomainMismatch,
            Self::TargetCall(_) => ErrorReason::TargetCallFailed,
            Self::UnknownTarget(_) => ErrorReason::UnknownTarget,
            Self::NonceLookup(_) => ErrorReason::NonceLookupFailed,
            Self::Signing(_) => ErrorReason::SigningFailed,
            Self::InvalidFormat(_) => ErrorReason::InvalidFormat,
        }
    }

    /// How a caller should respond to this error.
    #[must_use]
    pub const fn remediation(&self) -> Remediation {
        match self {
            Self::StaleNonce { .. } | Self::Expired { .. } => Remediation::RebuildAndResign,
            Self::TargetCall(_) => Remediation::Spent,
            Self::NonceLookup(_) => Remediation::Retry,
            Self::BadSignature(_)
            | Self::DomainMismatch { .. }
            | Self::UnknownTarget(_)
            | Self::Signing(_)
            | Self::InvalidFormat(_) => Remediation::Fatal,
        }
    }
}

/// Machine-readable error reason codes for forwarding failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorReason {
    /// The request's nonce was already consumed or skipped.
    StaleNonce,
    /// The request's deadline has passed.
    Expired,
    /// Signature recovery did not yield the request's `from` address.
    BadSignature,
    /// The signed domain does not identify the target forwarder.
    DomainMismatch,
    /// The forwarded call reverted; the nonce is spent.
    TargetCallFailed,
    /// No handler registered at the target address.
    UnknownTarget,
    /// The nonce read failed while building the request.
    NonceLookupFailed,
    /// The signer adapter failed.
    SigningFailed,
    /// The request is malformed.
    InvalidFormat,
}

/// What a caller can do about a failed relay attempt.
///
/// The nonce read and the eventual submission are not atomic, so stale
/// nonces are an accepted race, not a client-side bug: the only correct
/// response is a fresh build-and-sign cycle. Transient read failures may be
/// retried as-is; everything else signals a bug or tampering and must not
/// be resubmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remediation {
    /// Fetch a fresh nonce, rebuild, and re-sign the request.
    RebuildAndResign,
    /// Transient failure; the same operation may be retried unchanged.
    Retry,
    /// The nonce was consumed even though the payload effect did not
    /// happen; the request is spent and a retry needs a fresh nonce.
    Spent,
    /// Non-retryable: indicates mis-encoding, tampering, or misrouting.
    Fatal,
}
