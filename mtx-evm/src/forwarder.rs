//! The in-process forwarder: verifier and executor of signed requests.
//!
//! Requests are applied against a single serialized ledger: the nonce store
//! guarantees one writer at a time per address, so verification and the
//! nonce advance commit atomically. A verification failure changes nothing;
//! a target-call failure happens after the nonce is consumed, so the
//! request is spent either way once verification passes.

use std::sync::Arc;

use alloy_primitives::{Address, B256, Signature};
use alloy_sol_types::{Eip712Domain, SolStruct};
use mtx::dispatch::{CallContext, CallOutcome, TargetHandler, TargetRegistry};
use mtx::nonce::{InMemoryNonceStore, NonceStore};
use mtx::{ForwardDomain, ForwardError, ForwardRequest, SignedForwardRequest, UnixTimestamp};
#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::builder::NonceLookup;
use crate::types::{to_eip712_domain, to_sol_request};

/// Verifies signed forward requests and executes them against registered
/// targets, attributing each call to the recovered signer.
pub struct Forwarder<N = InMemoryNonceStore> {
    domain: ForwardDomain,
    eip712: Eip712Domain,
    nonces: N,
    targets: TargetRegistry,
}

impl<N> std::fmt::Debug for Forwarder<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forwarder")
            .field("domain", &self.domain)
            .field("targets", &self.targets)
            .finish_non_exhaustive()
    }
}

impl Forwarder<InMemoryNonceStore> {
    /// Creates a forwarder for `domain` with a fresh in-memory nonce ledger.
    #[must_use]
    pub fn new(domain: ForwardDomain) -> Self {
        Self::with_nonce_store(domain, InMemoryNonceStore::new())
    }
}

impl<N: NonceStore> Forwarder<N> {
    /// Creates a forwarder backed by the given nonce store.
    #[must_use]
    pub fn with_nonce_store(domain: ForwardDomain, nonces: N) -> Self {
        let eip712 = to_eip712_domain(&domain);
        Self {
            domain,
            eip712,
            nonces,
            targets: TargetRegistry::new(),
        }
    }

    /// The signing domain this forwarder verifies against.
    #[must_use]
    pub const fn domain(&self) -> &ForwardDomain {
        &self.domain
    }

    /// Registers a call handler at `address`.
    pub fn register_target(
        &self,
        address: Address,
        handler: Arc<dyn TargetHandler>,
    ) {
        self.targets.register(address, handler);
    }

    /// Returns the current nonce for `from` (0 if never used).
    #[must_use]
    pub fn current_nonce(&self, from: Address) -> u64 {
        self.nonces.current(from)
    }

    /// The EIP-712 digest this forwarder expects a signature over, for the
    /// given request under its own domain.
    fn signing_hash(&self, request: &ForwardRequest) -> Result<B256, ForwardError> {
        Ok(to_sol_request(request)?.eip712_signing_hash(&self.eip712))
    }

    /// Checks a signed request without touching any state.
    ///
    /// Succeeds only if the deadline has not passed, the nonce matches the
    /// current counter for `from`, and the signature recovers to `from`
    /// under this forwarder's domain.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::Expired`], [`ForwardError::StaleNonce`], or
    /// [`ForwardError::BadSignature`] for the respective check; a signature
    /// produced under a foreign domain recovers to a different address and
    /// therefore reports [`ForwardError::BadSignature`].
    #[cfg_attr(feature = "telemetry", instrument(skip_all, err, fields(
        from = %signed.request.from,
        nonce = signed.request.nonce
    )))]
    pub fn verify(&self, signed: &SignedForwardRequest) -> Result<(), ForwardError> {
        self.verify_at(signed, UnixTimestamp::now())
    }

    fn verify_at(
        &self,
        signed: &SignedForwardRequest,
        now: UnixTimestamp,
    ) -> Result<(), ForwardError> {
        let request = &signed.request;
        if request.deadline < now {
            return Err(ForwardError::Expired {
                deadline: request.deadline,
                now,
            });
        }
        let expected = self.nonces.current(request.from);
        if request.nonce != expected {
            return Err(ForwardError::StaleNonce {
                expected,
                got: request.nonce,
            });
        }
        let hash = self.signing_hash(request)?;
        let signature = Signature::from_raw(&signed.signature)
            .map_err(|e| ForwardError::BadSignature(e.to_string()))?;
        let recovered = signature
            .recover_address_from_prehash(&hash)
            .map_err(|e| ForwardError::BadSignature(e.to_string()))?;
        if recovered != request.from {
            return Err(ForwardError::BadSignature(format!(
                "recovered {recovered}, request is from {}",
                request.from
            )));
        }
        Ok(())
    }

    /// Verifies `signed` and, only if valid, executes the call with caller
    /// context attributed to `from`, advancing the nonce.
    ///
    /// Atomicity: any verification failure (including an unresolvable
    /// target) leaves the ledger untouched. Once the nonce is consumed the
    /// request is spent, even when the target call itself fails; that
    /// failure is reported in the returned [`CallOutcome`], not by undoing
    /// the nonce.
    ///
    /// # Errors
    ///
    /// Returns the verification errors of [`verify`](Self::verify), plus
    /// [`ForwardError::UnknownTarget`] when nothing is registered at
    /// `request.to`, and [`ForwardError::StaleNonce`] when a competing
    /// request consumed the nonce between verification and commit.
    #[cfg_attr(feature = "telemetry", instrument(skip_all, err, fields(
        from = %signed.request.from,
        to = %signed.request.to,
        nonce = signed.request.nonce
    )))]
    pub fn execute(&self, signed: &SignedForwardRequest) -> Result<CallOutcome, ForwardError> {
        let request = &signed.request;
        let handler = self.targets.resolve(request.to)?;
        self.verify_at(signed, UnixTimestamp::now())?;
        // Atomic check-and-advance; loses cleanly to a racing request.
        self.nonces.consume(request.from, request.nonce)?;
        let ctx = CallContext {
            from: request.from,
            value: request.value,
            gas: request.gas,
            data: request.data.clone(),
        };
        Ok(handler.call(ctx))
    }
}

impl<N: NonceStore> NonceLookup for Forwarder<N> {
    async fn nonces(&self, from: Address) -> Result<u64, ForwardError> {
        Ok(self.nonces.current(from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::{SignerLike, sign_forward_request};
    use crate::typed::TypedData;
    use alloy_primitives::{Bytes, U256, address};
    use alloy_signer_local::PrivateKeySigner;

    const TARGET: Address = address!("0x00000000000000000000000000000000000000e0");

    struct Accept;

    impl TargetHandler for Accept {
        fn call(&self, _ctx: CallContext) -> CallOutcome {
            CallOutcome::succeeded(Bytes::new())
        }
    }

    fn forwarder() -> Forwarder {
        let fwd = Forwarder::new(ForwardDomain::new(
            "StableForwarder",
            "1",
            31_337,
            address!("0x00000000000000000000000000000000000000f0"),
        ));
        fwd.register_target(TARGET, Arc::new(Accept));
        fwd
    }

    async fn signed_request(
        fwd: &Forwarder,
        signer: &PrivateKeySigner,
        deadline: u64,
    ) -> SignedForwardRequest {
        let request = ForwardRequest {
            from: SignerLike::address(signer),
            to: TARGET,
            value: U256::ZERO,
            gas: 1_000_000,
            nonce: fwd.current_nonce(SignerLike::address(signer)),
            deadline: UnixTimestamp::from_secs(deadline),
            data: Bytes::new(),
        };
        let typed = TypedData::new(fwd.domain().clone(), request);
        sign_forward_request(signer, &typed).await.unwrap()
    }

    #[tokio::test]
    async fn test_execute_advances_nonce() {
        let fwd = forwarder();
        let signer = PrivateKeySigner::random();
        let signed = signed_request(&fwd, &signer, 4_000_000_000).await;
        let outcome = fwd.execute(&signed).unwrap();
        assert!(outcome.success);
        assert_eq!(fwd.current_nonce(SignerLike::address(&signer)), 1);
    }

    #[tokio::test]
    async fn test_expired_request_rejected_without_state_change() {
        let fwd = forwarder();
        let signer = PrivateKeySigner::random();
        let signed = signed_request(&fwd, &signer, 1).await;
        let err = fwd.execute(&signed).unwrap_err();
        assert!(matches!(err, ForwardError::Expired { .. }));
        assert_eq!(fwd.current_nonce(SignerLike::address(&signer)), 0);
    }

    #[tokio::test]
    async fn test_tampered_request_rejected() {
        let fwd = forwarder();
        let signer = PrivateKeySigner::random();
        let mut signed = signed_request(&fwd, &signer, 4_000_000_000).await;
        // Mutation after signing invalidates the signature.
        signed.request.value = U256::from(1);
        let err = fwd.execute(&signed).unwrap_err();
        assert!(matches!(err, ForwardError::BadSignature(_)));
        assert_eq!(fwd.current_nonce(SignerLike::address(&signer)), 0);
    }

    #[tokio::test]
    async fn test_unknown_target_rejected_before_nonce_commit() {
        let fwd = forwarder();
        let signer = PrivateKeySigner::random();
        let mut signed = signed_request(&fwd, &signer, 4_000_000_000).await;
        signed.request.to = address!("0x00000000000000000000000000000000000000ee");
        let err = fwd.execute(&signed).unwrap_err();
        assert!(matches!(err, ForwardError::UnknownTarget(_)));
        assert_eq!(fwd.current_nonce(SignerLike::address(&signer)), 0);
    }
}
