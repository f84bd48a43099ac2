use alloy_primitives::{Address, B256};
use alloy_rlp::RlpEncodable;
use delegation_types::AuthorizationRequest;

use crate::eip712::keccak;

/// EIP-7702 authorization magic.
pub const MAGIC: u8 = 0x05;

#[derive(RlpEncodable)]
struct AuthorizationTuple {
    chain_id: u64,
    address: Address,
    nonce: u64,
}

/// `keccak256(MAGIC || rlp([chain_id, address, nonce]))`.
pub fn authorization_digest(request: &AuthorizationRequest) -> B256 {
    let tuple = AuthorizationTuple {
        chain_id: request.chain_id,
        address: request.contract_address,
        nonce: request.nonce,
    };
    let mut buf = vec![MAGIC];
    buf.extend_from_slice(&alloy_rlp::encode(&tuple));
    keccak(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_rlp_payload() {
        let tuple = AuthorizationTuple {
            chain_id: 1,
            address: address!("cccccccccccccccccccccccccccccccccccccccc"),
            nonce: 0,
        };
        let encoded = alloy_rlp::encode(&tuple);
        // list header, chain id 1, 20-byte string header, address, nonce 0 (empty string)
        let mut expected = vec![0xd7, 0x01, 0x94];
        expected.extend_from_slice(&[0xcc; 20]);
        expected.push(0x80);
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_digest_ignores_sender() {
        let request = AuthorizationRequest {
            chain_id: 1,
            contract_address: address!("cccccccccccccccccccccccccccccccccccccccc"),
            from: address!("1111111111111111111111111111111111111111"),
            nonce: 3,
        };
        let mut other_sender = request.clone();
        other_sender.from = address!("2222222222222222222222222222222222222222");
        assert_eq!(authorization_digest(&request), authorization_digest(&other_sender));

        let mut next_nonce = request.clone();
        next_nonce.nonce = 4;
        assert_ne!(authorization_digest(&request), authorization_digest(&next_nonce));
    }
}
