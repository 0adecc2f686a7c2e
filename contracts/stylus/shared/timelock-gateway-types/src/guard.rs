//! Vault-side guard policy.
//!
//! The vault consults its guard before every execution. A transaction passes if it is executed
//! by the gateway, or if it carries an emergency quorum of owner signatures. Counting records is
//! only a precheck: the vault checks its own threshold, not the whole blob, so the quorum itself
//! must be confirmed through a [`SignatureVerifier`].

use alloy_primitives::Address;
use alloy_sol_types::{sol, SolCall};

use crate::{errors::GuardError, signatures::signature_count};

sol! {
    /// Transaction guard interface of the vault.
    interface IGuard {
        function checkTransaction(
            address to,
            uint256 value,
            bytes data,
            uint8 operation,
            uint256 safeTxGas,
            uint256 baseGas,
            uint256 gasPrice,
            address gasToken,
            address refundReceiver,
            bytes signatures,
            address msgSender
        ) external;

        function checkAfterExecution(bytes32 txHash, bool success) external;
    }

    interface IERC165 {
        function supportsInterface(bytes4 interfaceId) external view returns (bool);
    }
}

const fn xor4(a: [u8; 4], b: [u8; 4]) -> [u8; 4] {
    [a[0] ^ b[0], a[1] ^ b[1], a[2] ^ b[2], a[3] ^ b[3]]
}

/// ERC-165 id of the guard interface (XOR of its selectors).
pub const GUARD_INTERFACE_ID: [u8; 4] = xor4(
    IGuard::checkTransactionCall::SELECTOR,
    IGuard::checkAfterExecutionCall::SELECTOR,
);

pub const ERC165_INTERFACE_ID: [u8; 4] = IERC165::supportsInterfaceCall::SELECTOR;

pub fn supports_interface(interface_id: [u8; 4]) -> bool {
    interface_id == GUARD_INTERFACE_ID || interface_id == ERC165_INTERFACE_ID
}

/// Confirms that the first `required` signatures of a blob are valid, distinct owner signatures
/// over the transaction being guarded. Implemented on-chain by asking the vault itself.
pub trait SignatureVerifier {
    fn verify_signatures(&self, signatures: &[u8], required: u64) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuardPolicy {
    pub gateway: Address,
    /// Minimum owner signatures for the emergency path; `0` disables it.
    pub emergency_threshold: u64,
}

impl GuardPolicy {
    pub const fn new(gateway: Address, emergency_threshold: u64) -> Self {
        Self {
            gateway,
            emergency_threshold,
        }
    }

    pub fn is_gateway(&self, executor: Address) -> bool {
        self.gateway != Address::ZERO && executor == self.gateway
    }

    pub fn check(
        &self,
        executor: Address,
        signatures: &[u8],
        verifier: &impl SignatureVerifier,
    ) -> Result<(), GuardError> {
        if self.is_gateway(executor) {
            return Ok(());
        }
        let provided = u64::try_from(signature_count(signatures)).unwrap_or(u64::MAX);
        if self.emergency_threshold == 0 || provided < self.emergency_threshold {
            return Err(GuardError::Rejected {
                executor,
                signatures: provided,
                required: self.emergency_threshold,
            });
        }
        if !verifier.verify_signatures(signatures, self.emergency_threshold) {
            return Err(GuardError::QuorumNotVerified {
                executor,
                required: self.emergency_threshold,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::signatures::{build_approval_signatures, ApprovalSignature, SIGNATURE_LEN};

    const GATEWAY: Address = Address::repeat_byte(0x6a);
    const STRANGER: Address = Address::repeat_byte(0x5e);
    const OWNER_1: Address = Address::repeat_byte(0x01);
    const OWNER_2: Address = Address::repeat_byte(0x02);
    const OWNER_3: Address = Address::repeat_byte(0x03);

    /// Approved-hash verifier with the vault's rules: the first `required` records must be
    /// approvals by owners, in strictly ascending signer order.
    struct Owners(Vec<Address>);

    impl SignatureVerifier for Owners {
        fn verify_signatures(&self, signatures: &[u8], required: u64) -> bool {
            let Ok(required) = usize::try_from(required) else {
                return false;
            };
            let Some(head) = signatures.get(..required.saturating_mul(SIGNATURE_LEN)) else {
                return false;
            };
            let Ok(records) = ApprovalSignature::decode_all(head) else {
                return false;
            };
            records.windows(2).all(|pair| pair[0].signer < pair[1].signer)
                && records.iter().all(|record| self.0.contains(&record.signer))
        }
    }

    fn owners() -> Owners {
        Owners(vec![OWNER_1, OWNER_2, OWNER_3])
    }

    #[test]
    fn interface_ids() {
        assert_eq!(GUARD_INTERFACE_ID, [0xe6, 0xd7, 0xa8, 0x3a]);
        assert_eq!(ERC165_INTERFACE_ID, [0x01, 0xff, 0xc9, 0xa7]);
        assert!(supports_interface(GUARD_INTERFACE_ID));
        assert!(!supports_interface([0xff; 4]));
    }

    #[test]
    fn gateway_executor_passes_without_signatures() {
        let policy = GuardPolicy::new(GATEWAY, 3);
        assert_eq!(policy.check(GATEWAY, &[], &Owners(Vec::new())), Ok(()));
    }

    #[test]
    fn emergency_path_needs_quorum() {
        let policy = GuardPolicy::new(GATEWAY, 2);
        let one = build_approval_signatures(&[OWNER_1]);
        let two = build_approval_signatures(&[OWNER_1, OWNER_2]);

        assert_eq!(
            policy.check(STRANGER, &one, &owners()),
            Err(GuardError::Rejected {
                executor: STRANGER,
                signatures: 1,
                required: 2,
            })
        );
        assert_eq!(policy.check(STRANGER, &two, &owners()), Ok(()));
    }

    #[test]
    fn padded_blob_does_not_reach_quorum() {
        let policy = GuardPolicy::new(GATEWAY, 3);
        let mut padded = build_approval_signatures(&[OWNER_1, OWNER_2]).to_vec();
        padded.extend_from_slice(&[0u8; SIGNATURE_LEN]);
        assert_eq!(
            policy.check(STRANGER, &padded, &owners()),
            Err(GuardError::QuorumNotVerified {
                executor: STRANGER,
                required: 3,
            })
        );

        // A repeated signer is not a third owner either.
        let mut repeated = build_approval_signatures(&[OWNER_1, OWNER_2]).to_vec();
        repeated.extend_from_slice(&ApprovalSignature::new(OWNER_2).to_bytes());
        assert!(policy.check(STRANGER, &repeated, &owners()).is_err());

        let full = build_approval_signatures(&[OWNER_1, OWNER_2, OWNER_3]);
        assert_eq!(policy.check(STRANGER, &full, &owners()), Ok(()));
    }

    #[test]
    fn zero_threshold_disables_emergency_path() {
        let full = build_approval_signatures(&[OWNER_1, OWNER_2, OWNER_3]);
        let policy = GuardPolicy::new(GATEWAY, 0);
        assert!(policy.check(STRANGER, &full, &owners()).is_err());

        let unset = GuardPolicy::new(Address::ZERO, 0);
        assert!(!unset.is_gateway(Address::ZERO));
        assert!(unset.check(Address::ZERO, &[], &owners()).is_err());
    }
}
