use alloy_primitives::{Address, ChainId, B256, U256};
use delegation_types::{Caveat, UnsignedDelegation};
use sha3::{Digest, Keccak256};

pub const DOMAIN_NAME: &str = "DelegationManager";
pub const DOMAIN_VERSION: &str = "1";

pub const EIP712_DOMAIN_TYPE: &[u8] =
    b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";
pub const DELEGATION_TYPE: &[u8] = b"Delegation(address delegate,address delegator,\
    bytes32 authority,Caveat[] caveats,uint256 salt)Caveat(address enforcer,bytes terms)";
pub const CAVEAT_TYPE: &[u8] = b"Caveat(address enforcer,bytes terms)";

pub(crate) fn keccak(bytes: &[u8]) -> B256 {
    let mut h = Keccak256::new();
    h.update(bytes);
    B256::from_slice(h.finalize().as_slice())
}

fn push_address(buf: &mut Vec<u8>, address: Address) {
    let mut padded = [0u8; 32];
    padded[12..32].copy_from_slice(address.as_slice());
    buf.extend_from_slice(&padded);
}

/// Domain separator of the delegation manager deployed at `verifying_contract`.
pub fn domain_separator(chain_id: ChainId, verifying_contract: Address) -> B256 {
    let mut buf = Vec::with_capacity(32 * 5);
    buf.extend_from_slice(keccak(EIP712_DOMAIN_TYPE).as_slice());
    buf.extend_from_slice(keccak(DOMAIN_NAME.as_bytes()).as_slice());
    buf.extend_from_slice(keccak(DOMAIN_VERSION.as_bytes()).as_slice());
    buf.extend_from_slice(&U256::from(chain_id).to_be_bytes::<32>());
    push_address(&mut buf, verifying_contract);
    keccak(&buf)
}

fn caveat_hash(caveat: &Caveat) -> B256 {
    // `args` is supplied at redemption and is not signed.
    let mut buf = Vec::with_capacity(32 * 3);
    buf.extend_from_slice(keccak(CAVEAT_TYPE).as_slice());
    push_address(&mut buf, caveat.enforcer);
    buf.extend_from_slice(keccak(&caveat.terms).as_slice());
    keccak(&buf)
}

/// `hashStruct(Delegation)`.
pub fn delegation_hash(delegation: &UnsignedDelegation) -> B256 {
    let caveat_hashes: Vec<u8> = delegation
        .caveats
        .iter()
        .flat_map(|caveat| caveat_hash(caveat).0)
        .collect();

    let mut buf = Vec::with_capacity(32 * 6);
    buf.extend_from_slice(keccak(DELEGATION_TYPE).as_slice());
    push_address(&mut buf, delegation.delegate);
    push_address(&mut buf, delegation.delegator);
    buf.extend_from_slice(delegation.authority.as_slice());
    buf.extend_from_slice(keccak(&caveat_hashes).as_slice());
    buf.extend_from_slice(&delegation.salt.to_be_bytes::<32>());
    keccak(&buf)
}

/// Digest the delegator signs:
/// `keccak256("\x19\x01" || domainSeparator || hashStruct(delegation))`.
pub fn delegation_digest(
    chain_id: ChainId,
    delegation_manager: Address,
    delegation: &UnsignedDelegation,
) -> B256 {
    let mut buf = Vec::with_capacity(2 + 32 + 32);
    buf.extend_from_slice(b"\x19\x01");
    buf.extend_from_slice(domain_separator(chain_id, delegation_manager).as_slice());
    buf.extend_from_slice(delegation_hash(delegation).as_slice());
    keccak(&buf)
}
