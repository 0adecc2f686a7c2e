//! Read-only view of the guarded vault (Safe v1.3/v1.4 ABI).

use alloc::vec::Vec;

use alloy_sol_types::{sol, SolCall};
use stylus_sdk::{
    alloy_primitives::{keccak256, Address, U256},
    call::RawCall,
};
use timelock_gateway_types::SignatureVerifier;

sol! {
    interface ISafe {
        function nonce() external view returns (uint256);

        function encodeTransactionData(
            address to,
            uint256 value,
            bytes data,
            uint8 operation,
            uint256 safeTxGas,
            uint256 baseGas,
            uint256 gasPrice,
            address gasToken,
            address refundReceiver,
            uint256 _nonce
        ) external view returns (bytes);

        function checkNSignatures(
            bytes32 dataHash,
            bytes data,
            bytes signatures,
            uint256 requiredSignatures
        ) external view;
    }
}

/// Gas forwarded to each vault view call.
pub const VAULT_CALL_GAS: u64 = 500_000;

/// The transaction the vault is about to execute, as passed to `checkTransaction`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafeTransaction {
    pub to: Address,
    pub value: U256,
    pub data: Vec<u8>,
    pub operation: u8,
    pub safe_tx_gas: U256,
    pub base_gas: U256,
    pub gas_price: U256,
    pub gas_token: Address,
    pub refund_receiver: Address,
}

/// Has the vault itself check the emergency signatures with `checkNSignatures`.
pub struct VaultSignatureVerifier<'a> {
    vault: Address,
    transaction: &'a SafeTransaction,
}

impl<'a> VaultSignatureVerifier<'a> {
    pub fn new(vault: Address, transaction: &'a SafeTransaction) -> Self {
        Self { vault, transaction }
    }

    fn static_call(&self, calldata: &[u8]) -> Option<Vec<u8>> {
        unsafe { RawCall::new_static().gas(VAULT_CALL_GAS).call(self.vault, calldata) }.ok()
    }

    /// Pre-image of the vault transaction hash being executed.
    fn transaction_data(&self) -> Option<Vec<u8>> {
        let out = self.static_call(&ISafe::nonceCall {}.abi_encode())?;
        let nonce = ISafe::nonceCall::abi_decode_returns(&out, true).ok()?._0;
        // The vault consumes its nonce before consulting the guard.
        let nonce = nonce.checked_sub(U256::from(1u64))?;

        let tx = self.transaction;
        let call = ISafe::encodeTransactionDataCall {
            to: tx.to,
            value: tx.value,
            data: tx.data.clone().into(),
            operation: tx.operation,
            safeTxGas: tx.safe_tx_gas,
            baseGas: tx.base_gas,
            gasPrice: tx.gas_price,
            gasToken: tx.gas_token,
            refundReceiver: tx.refund_receiver,
            _nonce: nonce,
        };
        let out = self.static_call(&call.abi_encode())?;
        let encoded = ISafe::encodeTransactionDataCall::abi_decode_returns(&out, true).ok()?._0;
        Some(encoded.to_vec())
    }
}

impl SignatureVerifier for VaultSignatureVerifier<'_> {
    fn verify_signatures(&self, signatures: &[u8], required: u64) -> bool {
        let Some(data) = self.transaction_data() else {
            return false;
        };
        let call = ISafe::checkNSignaturesCall {
            dataHash: keccak256(&data),
            data: data.into(),
            signatures: signatures.to_vec().into(),
            requiredSignatures: U256::from(required),
        };
        // `checkNSignatures` reverts unless the quorum holds.
        self.static_call(&call.abi_encode()).is_some()
    }
}
