//! EIP-712 transaction hash of the vault.
//!
//! The gateway always submits with zero gas/refund parameters, so only `to`, `value`, `data`,
//! `operation` and `nonce` vary.

use alloy_primitives::{b256, keccak256, Address, B256, U256};

use crate::vault::VaultCall;

/// keccak256("EIP712Domain(uint256 chainId,address verifyingContract)")
pub const DOMAIN_SEPARATOR_TYPEHASH: B256 =
    b256!("47e79534a245952e8b16893a336b85a3d9ea9fa8c573f3d803afb92a79469218");

/// keccak256("SafeTx(address to,uint256 value,bytes data,uint8 operation,uint256 safeTxGas,uint256 baseGas,uint256 gasPrice,address gasToken,address refundReceiver,uint256 nonce)")
pub const SAFE_TX_TYPEHASH: B256 =
    b256!("bb8310d486368db6bd6f849402fdd73ad53d316b5a4b2644ad6efe0f941286d8");

fn address_word(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..32].copy_from_slice(address.as_slice());
    word
}

pub fn domain_separator(chain_id: u64, vault: Address) -> B256 {
    let mut buf = Vec::with_capacity(32 * 3);
    buf.extend_from_slice(DOMAIN_SEPARATOR_TYPEHASH.as_slice());
    buf.extend_from_slice(&U256::from(chain_id).to_be_bytes::<32>());
    buf.extend_from_slice(&address_word(vault));
    keccak256(buf)
}

pub fn safe_transaction_hash(chain_id: u64, vault: Address, call: &VaultCall, nonce: U256) -> B256 {
    let mut struct_buf = Vec::with_capacity(32 * 11);
    struct_buf.extend_from_slice(SAFE_TX_TYPEHASH.as_slice());
    struct_buf.extend_from_slice(&address_word(call.to));
    struct_buf.extend_from_slice(&call.value.to_be_bytes::<32>());
    struct_buf.extend_from_slice(keccak256(&call.data).as_slice());
    struct_buf.extend_from_slice(&U256::from(call.operation as u8).to_be_bytes::<32>());
    // safeTxGas, baseGas, gasPrice
    for _ in 0..3 {
        struct_buf.extend_from_slice(&[0u8; 32]);
    }
    // gasToken, refundReceiver
    struct_buf.extend_from_slice(&address_word(Address::ZERO));
    struct_buf.extend_from_slice(&address_word(Address::ZERO));
    struct_buf.extend_from_slice(&nonce.to_be_bytes::<32>());
    let struct_hash = keccak256(struct_buf);

    let mut final_buf = Vec::with_capacity(2 + 32 + 32);
    final_buf.extend_from_slice(b"\x19\x01");
    final_buf.extend_from_slice(domain_separator(chain_id, vault).as_slice());
    final_buf.extend_from_slice(struct_hash.as_slice());
    keccak256(final_buf)
}
