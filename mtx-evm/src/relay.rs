//! Relayer-side composition and pre-flight checks.
//!
//! [`sign_meta_tx_request`] is the full client-side pipeline: fetch the
//! nonce, complete the request, encode it as typed data, sign, and attach
//! the signature. [`submit`] is the relayer's single blocking round-trip to
//! the forwarder, preceded by a domain pre-flight so a request signed for a
//! different deployment or chain is refused before it can burn a submission.
//!
//! # Retry policy
//!
//! Errors classify via [`ForwardError::remediation`]:
//! - `StaleNonce` / `Expired` are terminal for the payload; rebuild and
//!   re-sign with a fresh nonce.
//! - Transient submission failures may reuse the same signed payload, but
//!   only while the deadline holds and no competing request consumed the
//!   nonce.
//! - `BadSignature` / `DomainMismatch` are never retried; they indicate
//!   mis-encoding, tampering, or misrouting.
//! - A failed target call spends the nonce; retrying requires a full
//!   rebuild.

use mtx::dispatch::CallOutcome;
use mtx::nonce::NonceStore;
use mtx::{ForwardError, ForwardRequestInput, SignedForwardRequest};
use serde::{Deserialize, Serialize};

use crate::builder::RequestBuilder;
use crate::forwarder::Forwarder;
use crate::signer::{SignerLike, sign_forward_request};
use crate::typed::TypedData;

/// A fully prepared meta-transaction: the descriptor that was signed and the
/// relayable signed request.
///
/// The descriptor is kept alongside the request so the relayer can check,
/// before submission, that the domain the user signed under actually
/// identifies the forwarder it is about to call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaTxRequest {
    /// The typed-data descriptor the signature was produced over.
    pub typed: TypedData,
    /// The signed request to relay.
    pub signed: SignedForwardRequest,
}

/// Builds, encodes, and signs a complete meta-transaction against the given
/// forwarder in one call.
///
/// The nonce is read from `forwarder` immediately before signing. The read
/// and the eventual submission are not atomic: another signed request for
/// the same `from` can land first, in which case execution reports
/// `StaleNonce` and the caller runs this pipeline again.
///
/// # Errors
///
/// Returns [`ForwardError::NonceLookup`], [`ForwardError::InvalidFormat`],
/// or [`ForwardError::Signing`] from the respective pipeline stage.
pub async fn sign_meta_tx_request<S: SignerLike, N: NonceStore>(
    signer: &S,
    forwarder: &Forwarder<N>,
    builder: &RequestBuilder,
    input: ForwardRequestInput,
) -> Result<MetaTxRequest, ForwardError> {
    let request = builder.build(forwarder, input).await?;
    let typed = TypedData::new(forwarder.domain().clone(), request);
    let signed = sign_forward_request(signer, &typed).await?;
    Ok(MetaTxRequest { typed, signed })
}

/// Checks that the descriptor's domain identifies `forwarder`.
///
/// This is the relayer-side guard against cross-deployment and cross-chain
/// replay: a mismatched `chainId` or `verifyingContract` is refused here,
/// with a precise error, instead of surfacing downstream as a bare
/// signature failure.
///
/// # Errors
///
/// Returns [`ForwardError::DomainMismatch`] when any domain field differs.
pub fn preflight<N: NonceStore>(
    typed: &TypedData,
    forwarder: &Forwarder<N>,
) -> Result<(), ForwardError> {
    if &typed.domain != forwarder.domain() {
        return Err(ForwardError::DomainMismatch {
            signed: Box::new(typed.domain.clone()),
            target: Box::new(forwarder.domain().clone()),
        });
    }
    Ok(())
}

/// Relays a prepared meta-transaction to the forwarder.
///
/// Runs the domain [`preflight`] and then the forwarder's verify-and-execute;
/// the returned [`CallOutcome`] is the target call's `(success, returnData)`
/// pair. The relayer surfaces failures upward without local recovery.
///
/// # Errors
///
/// Returns [`ForwardError::DomainMismatch`] from the pre-flight or any
/// verification error from [`Forwarder::execute`].
pub fn submit<N: NonceStore>(
    forwarder: &Forwarder<N>,
    meta_tx: &MetaTxRequest,
) -> Result<CallOutcome, ForwardError> {
    preflight(&meta_tx.typed, forwarder)?;
    forwarder.execute(&meta_tx.signed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Bytes, address};
    use alloy_signer_local::PrivateKeySigner;
    use mtx::{ForwardDomain, Remediation, UnixTimestamp};

    fn domain(chain_id: u64) -> ForwardDomain {
        ForwardDomain::new(
            "StableForwarder",
            "1",
            chain_id,
            address!("0x00000000000000000000000000000000000000f0"),
        )
    }

    #[tokio::test]
    async fn test_preflight_rejects_foreign_chain() {
        let home = Forwarder::new(domain(31_337));
        let away = Forwarder::new(domain(1));
        let signer = PrivateKeySigner::random();
        let input = ForwardRequestInput::new(
            SignerLike::address(&signer),
            address!("0x00000000000000000000000000000000000000e0"),
            Bytes::new(),
            UnixTimestamp::from_secs(4_000_000_000),
        );
        let meta_tx = sign_meta_tx_request(&signer, &home, &RequestBuilder::new(), input)
            .await
            .unwrap();

        let err = submit(&away, &meta_tx).unwrap_err();
        assert!(matches!(err, ForwardError::DomainMismatch { .. }));
        assert_eq!(err.remediation(), Remediation::Fatal);
    }
}
