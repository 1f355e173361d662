//! `sol!`-generated EIP-712 structs and conversions from the core model.
//!
//! The struct name and field order here are the wire contract: the EIP-712
//! type hash is derived from them, so they must never change without
//! bumping the domain version.

use alloy_primitives::U256;
use alloy_primitives::aliases::U48;
use alloy_sol_types::{Eip712Domain, eip712_domain, sol};
use mtx::{ForwardDomain, ForwardError};
use serde::{Deserialize, Serialize};

sol!(
    /// EIP-712 primary type signed by the requester and reconstructed by the
    /// forwarder to verify the signature.
    ///
    /// Matches the schema
    /// `ForwardRequest(address from,address to,uint256 value,uint256 gas,uint256 nonce,uint48 deadline,bytes data)`.
    /// The attached signature is deliberately not a field: only these seven
    /// values enter the signing hash.
    #[derive(Debug, Serialize, Deserialize)]
    struct ForwardRequest {
        address from;
        address to;
        uint256 value;
        uint256 gas;
        uint256 nonce;
        uint48 deadline;
        bytes data;
    }
);

/// Converts the core request model into the `sol!` struct used for hashing.
///
/// # Errors
///
/// Returns [`ForwardError::InvalidFormat`] if the deadline does not fit the
/// `uint48` wire encoding.
pub fn to_sol_request(request: &mtx::ForwardRequest) -> Result<ForwardRequest, ForwardError> {
    let deadline = U48::try_from(request.deadline.as_secs()).map_err(|_| {
        ForwardError::InvalidFormat(format!(
            "deadline {} does not fit uint48",
            request.deadline
        ))
    })?;
    Ok(ForwardRequest {
        from: request.from,
        to: request.to,
        value: request.value,
        gas: U256::from(request.gas),
        nonce: U256::from(request.nonce),
        deadline,
        data: request.data.clone(),
    })
}

/// Builds the alloy EIP-712 domain separator from a [`ForwardDomain`].
#[must_use]
pub fn to_eip712_domain(domain: &ForwardDomain) -> Eip712Domain {
    eip712_domain! {
        name: domain.name.clone(),
        version: domain.version.clone(),
        chain_id: domain.chain_id,
        verifying_contract: domain.verifying_contract,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Bytes, address};
    use alloy_sol_types::SolStruct;
    use mtx::UnixTimestamp;

    fn request(deadline: u64) -> mtx::ForwardRequest {
        mtx::ForwardRequest {
            from: address!("0x0000000000000000000000000000000000000001"),
            to: address!("0x0000000000000000000000000000000000000002"),
            value: U256::ZERO,
            gas: 1_000_000,
            nonce: 0,
            deadline: UnixTimestamp::from_secs(deadline),
            data: Bytes::new(),
        }
    }

    #[test]
    fn test_type_string_is_stable() {
        // The verifier derives its type hash from this exact string.
        assert_eq!(
            ForwardRequest::eip712_root_type(),
            "ForwardRequest(address from,address to,uint256 value,uint256 gas,uint256 nonce,uint48 deadline,bytes data)"
        );
    }

    #[test]
    fn test_oversized_deadline_rejected() {
        let err = to_sol_request(&request(UnixTimestamp::MAX_UINT48 + 1)).unwrap_err();
        assert!(matches!(err, ForwardError::InvalidFormat(_)));
    }

    #[test]
    fn test_conversion_preserves_fields() {
        let sol = to_sol_request(&request(1_700_000_000)).unwrap();
        assert_eq!(sol.gas, U256::from(1_000_000u64));
        assert_eq!(sol.deadline, U48::from(1_700_000_000u64));
    }
}
