//! EIP-712 typed-data descriptor and deterministic signing hash.
//!
//! A [`TypedData`] bundles everything a signer needs: the domain and request
//! schemas, the domain values, the message values, and the primary type.
//! Hashing is a pure function of those inputs, so an independently written
//! encoder and verifier agree on the digest byte-for-byte.

use std::collections::BTreeMap;

use alloy_primitives::B256;
use alloy_sol_types::SolStruct;
use mtx::{ForwardDomain, ForwardError, ForwardRequest};
use serde::{Deserialize, Serialize};

use crate::types::{to_eip712_domain, to_sol_request};

/// Primary type identifier for the request schema.
pub const PRIMARY_TYPE: &str = "ForwardRequest";

/// One `{ name, type }` entry of an EIP-712 type schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedDataField {
    /// Field name.
    pub name: String,
    /// Solidity type of the field.
    #[serde(rename = "type")]
    pub kind: String,
}

impl TypedDataField {
    fn new(name: &str, kind: &str) -> Self {
        Self {
            name: name.to_owned(),
            kind: kind.to_owned(),
        }
    }
}

/// The fixed `EIP712Domain` schema (field order is part of the contract).
fn domain_schema() -> Vec<TypedDataField> {
    vec![
        TypedDataField::new("name", "string"),
        TypedDataField::new("version", "string"),
        TypedDataField::new("chainId", "uint256"),
        TypedDataField::new("verifyingContract", "address"),
    ]
}

/// The fixed `ForwardRequest` schema (field order is part of the contract).
fn request_schema() -> Vec<TypedDataField> {
    vec![
        TypedDataField::new("from", "address"),
        TypedDataField::new("to", "address"),
        TypedDataField::new("value", "uint256"),
        TypedDataField::new("gas", "uint256"),
        TypedDataField::new("nonce", "uint256"),
        TypedDataField::new("deadline", "uint48"),
        TypedDataField::new("data", "bytes"),
    ]
}

/// A canonical structured-data descriptor for one forward request.
///
/// Only the seven declared request fields are part of the message: the
/// descriptor is built from an unsigned [`ForwardRequest`], so an attached
/// signature can never leak into the signing payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedData {
    /// Type schemas keyed by type name (`EIP712Domain` and `ForwardRequest`).
    pub types: BTreeMap<String, Vec<TypedDataField>>,

    /// The type the signature is over; always [`PRIMARY_TYPE`].
    pub primary_type: String,

    /// Domain values binding the signature to one forwarder deployment.
    pub domain: ForwardDomain,

    /// The unsigned request values.
    pub message: ForwardRequest,
}

impl TypedData {
    /// Builds the descriptor for `request` under `domain`.
    #[must_use]
    pub fn new(domain: ForwardDomain, request: ForwardRequest) -> Self {
        let mut types = BTreeMap::new();
        types.insert("EIP712Domain".to_owned(), domain_schema());
        types.insert(PRIMARY_TYPE.to_owned(), request_schema());
        Self {
            types,
            primary_type: PRIMARY_TYPE.to_owned(),
            domain,
            message: request,
        }
    }

    /// Computes the EIP-712 signing hash:
    /// `keccak256("\x19\x01" || domainSeparator || hashStruct(message))`.
    ///
    /// Deterministic: the same domain and message always produce the same
    /// digest.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::InvalidFormat`] if the message cannot be
    /// encoded (deadline out of `uint48` range).
    pub fn signing_hash(&self) -> Result<B256, ForwardError> {
        let sol_request = to_sol_request(&self.message)?;
        let domain = to_eip712_domain(&self.domain);
        Ok(sol_request.eip712_signing_hash(&domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Bytes, U256, address};
    use mtx::UnixTimestamp;

    fn domain() -> ForwardDomain {
        ForwardDomain::new(
            "StableForwarder",
            "1",
            31_337,
            address!("0x00000000000000000000000000000000000000f0"),
        )
    }

    fn request(nonce: u64) -> ForwardRequest {
        ForwardRequest {
            from: address!("0x0000000000000000000000000000000000000001"),
            to: address!("0x0000000000000000000000000000000000000002"),
            value: U256::ZERO,
            gas: 1_000_000,
            nonce,
            deadline: UnixTimestamp::from_secs(2_000_000_000),
            data: Bytes::from_static(&[0x12, 0x34]),
        }
    }

    #[test]
    fn test_hash_is_deterministic() {
        let a = TypedData::new(domain(), request(0)).signing_hash().unwrap();
        let b = TypedData::new(domain(), request(0)).signing_hash().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_binds_every_message_field() {
        let base = TypedData::new(domain(), request(0)).signing_hash().unwrap();
        let bumped_nonce = TypedData::new(domain(), request(1)).signing_hash().unwrap();
        assert_ne!(base, bumped_nonce);

        let mut altered = request(0);
        altered.data = Bytes::from_static(&[0x12, 0x35]);
        let altered = TypedData::new(domain(), altered).signing_hash().unwrap();
        assert_ne!(base, altered);
    }

    #[test]
    fn test_hash_binds_the_domain() {
        let base = TypedData::new(domain(), request(0)).signing_hash().unwrap();

        let mut other_chain = domain();
        other_chain.chain_id = 1;
        let other_chain = TypedData::new(other_chain, request(0))
            .signing_hash()
            .unwrap();
        assert_ne!(base, other_chain);

        let mut other_contract = domain();
        other_contract.verifying_contract =
            address!("0x00000000000000000000000000000000000000f1");
        let other_contract = TypedData::new(other_contract, request(0))
            .signing_hash()
            .unwrap();
        assert_ne!(base, other_contract);
    }

    #[test]
    fn test_descriptor_wire_shape() {
        let typed = TypedData::new(domain(), request(0));
        let value = serde_json::to_value(&typed).unwrap();
        assert_eq!(value["primaryType"], "ForwardRequest");
        assert_eq!(value["types"]["EIP712Domain"][0]["name"], "name");
        assert_eq!(value["types"]["ForwardRequest"][5]["type"], "uint48");
        // The message never carries a signature field.
        assert!(value["message"].get("signature").is_none());
    }
}
