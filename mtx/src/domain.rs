//! Signing-domain identity for a forwarder deployment.
//!
//! A signature over a forward request is only meaningful relative to one
//! specific forwarder on one specific chain. [`ForwardDomain`] carries that
//! identity; it is hashed into every signature via the EIP-712 domain
//! separator, so a request signed for one deployment can never be replayed
//! against another.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Identity of the signing domain: which forwarder, on which chain.
///
/// Field names, types, and order match the fixed `EIP712Domain` schema
/// (`name:string, version:string, chainId:uint256, verifyingContract:address`).
/// Changing any field without bumping `version` silently invalidates every
/// outstanding signature, so deployments treat this as append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardDomain {
    /// Human-readable name of the signing domain (e.g., `"StableForwarder"`).
    pub name: String,

    /// Version of the signing domain (e.g., `"1"`).
    pub version: String,

    /// EIP-155 chain ID of the network the forwarder is deployed on.
    pub chain_id: u64,

    /// Address of the forwarder expected to verify the signature.
    pub verifying_contract: Address,
}

impl std::fmt::Display for ForwardDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} v{} at {} on chain {}",
            self.name, self.version, self.verifying_contract, self.chain_id
        )
    }
}

impl ForwardDomain {
    /// Creates a new domain descriptor.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id,
            verifying_contract,
        }
    }
}
