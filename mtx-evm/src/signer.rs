//! Signer adapter over alloy signers.
//!
//! [`SignerLike`] abstracts the signing identity so both owned signers and
//! `Arc`-wrapped signers work: alloy's `Signer` trait is not implemented for
//! `Arc<T>`, but callers routinely share signers across tasks.
//!
//! Signing is a local, non-blocking cryptographic operation over exactly the
//! descriptor's hash; nothing here normalizes or re-encodes the message.

use std::future::Future;
use std::sync::Arc;

use alloy_primitives::{Address, FixedBytes, Signature};
use alloy_signer_local::PrivateKeySigner;
use mtx::{ForwardError, SignedForwardRequest};

use crate::typed::TypedData;

/// A trait that abstracts signing operations, allowing both owned signers
/// and Arc-wrapped signers.
pub trait SignerLike: Send + Sync {
    /// Returns the address of the signer.
    fn address(&self) -> Address;

    /// Signs the given hash.
    fn sign_hash(
        &self,
        hash: &FixedBytes<32>,
    ) -> impl Future<Output = Result<Signature, alloy_signer::Error>> + Send;
}

impl SignerLike for PrivateKeySigner {
    fn address(&self) -> Address {
        Self::address(self)
    }

    async fn sign_hash(&self, hash: &FixedBytes<32>) -> Result<Signature, alloy_signer::Error> {
        alloy_signer::Signer::sign_hash(self, hash).await
    }
}

impl<T: SignerLike + Send + Sync> SignerLike for Arc<T> {
    fn address(&self) -> Address {
        (**self).address()
    }

    async fn sign_hash(&self, hash: &FixedBytes<32>) -> Result<Signature, alloy_signer::Error> {
        (**self).sign_hash(hash).await
    }
}

/// Signs the typed-data descriptor and attaches the signature to its message.
///
/// Pure with respect to shared state: the only effect is producing the
/// 65-byte signature over `typed.signing_hash()`. The signed request is
/// immutable from here on; any mutation invalidates the signature.
///
/// # Errors
///
/// Returns [`ForwardError::InvalidFormat`] if the message cannot be encoded,
/// or [`ForwardError::Signing`] if the signer fails.
pub async fn sign_forward_request<S: SignerLike>(
    signer: &S,
    typed: &TypedData,
) -> Result<SignedForwardRequest, ForwardError> {
    let hash = typed.signing_hash()?;
    let signature = signer
        .sign_hash(&hash)
        .await
        .map_err(|e| ForwardError::Signing(format!("{e:?}")))?;
    Ok(typed.message.clone().into_signed(signature.as_bytes().into()))
}
