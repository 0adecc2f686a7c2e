//! Stylus guard contract for Safe-like vaults.
//!
//! The vault calls `checkTransaction` before and `checkAfterExecution` after every transaction.
//! Policy, configured per vault (`msg.sender`) through `initialize`:
//! - the vault's gateway may always execute (its own timelock and approval checks already ran),
//! - anyone else needs an emergency quorum of `emergency_threshold` owner signatures, confirmed
//!   by the vault's own `checkNSignatures`,
//! - `emergency_threshold = 0` disables the emergency path entirely.
//!
//! A vault must initialize before (or in the same batch as) installing the guard, otherwise every
//! transaction is rejected with `NotInitialized`.

use stylus_sdk::{
    abi::Bytes,
    alloy_primitives::{Address, FixedBytes, U256},
    prelude::*,
};

use timelock_gateway_types::{guard::supports_interface, GuardPolicy};

use crate::{
    errors::{AlreadyInitialized, GatewayGuardError, InvalidGateway, NotInitialized},
    vault::{SafeTransaction, VaultSignatureVerifier},
};

sol_storage! {
    #[entrypoint]
    pub struct GatewayGuard {
        /// Gateway allowed to execute for each vault; zero until the vault initializes.
        mapping(address => address) gateway_of;
        mapping(address => uint256) emergency_threshold_of;
    }
}

#[public]
impl GatewayGuard {
    /// One-shot setup of the caller's own policy.
    pub fn initialize(&mut self, gateway: Address, emergency_threshold: U256) -> Result<(), GatewayGuardError> {
        let vault = self.vm().msg_sender();
        if self.is_initialized(vault) {
            return Err(GatewayGuardError::AlreadyInitialized(AlreadyInitialized { vault }));
        }
        if gateway == Address::ZERO {
            return Err(GatewayGuardError::InvalidGateway(InvalidGateway {}));
        }
        self.gateway_of.insert(vault, gateway);
        self.emergency_threshold_of.insert(vault, emergency_threshold);
        Ok(())
    }

    /// Vault guard hook, run before execution. Reverts to block the transaction.
    #[allow(clippy::too_many_arguments)]
    pub fn check_transaction(
        &self,
        to: Address,
        value: U256,
        data: Bytes,
        operation: u8,
        safe_tx_gas: U256,
        base_gas: U256,
        gas_price: U256,
        gas_token: Address,
        refund_receiver: Address,
        signatures: Bytes,
        msg_sender: Address,
    ) -> Result<(), GatewayGuardError> {
        let vault = self.vm().msg_sender();
        if !self.is_initialized(vault) {
            return Err(GatewayGuardError::NotInitialized(NotInitialized { vault }));
        }
        let transaction = SafeTransaction {
            to,
            value,
            data: data.to_vec(),
            operation,
            safe_tx_gas,
            base_gas,
            gas_price,
            gas_token,
            refund_receiver,
        };
        let verifier = VaultSignatureVerifier::new(vault, &transaction);
        self.policy_of(vault).check(msg_sender, &signatures, &verifier)?;
        Ok(())
    }

    pub fn check_after_execution(&self, _tx_hash: FixedBytes<32>, _success: bool) {}

    pub fn supports_interface(&self, interface_id: FixedBytes<4>) -> bool {
        supports_interface(interface_id.0)
    }

    pub fn is_initialized(&self, vault: Address) -> bool {
        self.gateway_of.get(vault) != Address::ZERO
    }

    pub fn gateway(&self, vault: Address) -> Address {
        self.gateway_of.get(vault)
    }

    pub fn emergency_threshold(&self, vault: Address) -> U256 {
        self.emergency_threshold_of.get(vault)
    }
}

impl GatewayGuard {
    fn policy_of(&self, vault: Address) -> GuardPolicy {
        let threshold = u64::try_from(self.emergency_threshold_of.get(vault)).unwrap_or(u64::MAX);
        GuardPolicy::new(self.gateway_of.get(vault), threshold)
    }
}

#[cfg(test)]
mod tests {
    use stylus_sdk::testing::*;

    use super::*;
    use timelock_gateway_types::build_approval_signatures;

    const VAULT: Address = Address::repeat_byte(0x5a);
    const GATEWAY: Address = Address::repeat_byte(0x6a);
    const ATTACKER: Address = Address::repeat_byte(0xee);
    const STRANGER: Address = Address::repeat_byte(0x5e);

    fn check(guard: &GatewayGuard, executor: Address, signatures: Vec<u8>) -> Result<(), GatewayGuardError> {
        guard.check_transaction(
            Address::repeat_byte(0xaa),
            U256::ZERO,
            Bytes::from(vec![0x8d, 0x80, 0xff, 0x0a]),
            1,
            U256::ZERO,
            U256::ZERO,
            U256::ZERO,
            Address::ZERO,
            Address::ZERO,
            Bytes::from(signatures),
            executor,
        )
    }

    #[test]
    fn policies_are_keyed_by_caller() -> eyre::Result<()> {
        let vm = TestVM::default();
        let mut guard = GatewayGuard::from(&vm);

        // Someone else initializing first only configures their own entry.
        vm.set_sender(ATTACKER);
        eyre::ensure!(guard.initialize(ATTACKER, U256::from(1u64)).is_ok(), "attacker setup failed");
        eyre::ensure!(!guard.is_initialized(VAULT), "vault entry was claimed by another caller");

        vm.set_sender(VAULT);
        eyre::ensure!(guard.initialize(GATEWAY, U256::from(2u64)).is_ok(), "vault setup failed");
        assert_eq!(guard.gateway(VAULT), GATEWAY);
        assert_eq!(guard.emergency_threshold(VAULT), U256::from(2u64));
        assert_eq!(guard.gateway(ATTACKER), ATTACKER);

        eyre::ensure!(
            matches!(
                guard.initialize(ATTACKER, U256::ZERO),
                Err(GatewayGuardError::AlreadyInitialized(_))
            ),
            "second initialize must fail"
        );
        assert_eq!(guard.gateway(VAULT), GATEWAY);
        Ok(())
    }

    #[test]
    fn rejects_zero_gateway() -> eyre::Result<()> {
        let vm = TestVM::default();
        let mut guard = GatewayGuard::from(&vm);
        vm.set_sender(VAULT);
        eyre::ensure!(
            matches!(
                guard.initialize(Address::ZERO, U256::from(1u64)),
                Err(GatewayGuardError::InvalidGateway(_))
            ),
            "zero gateway accepted"
        );
        eyre::ensure!(!guard.is_initialized(VAULT), "vault initialized with zero gateway");
        Ok(())
    }

    #[test]
    fn check_transaction_routes_through_policy() -> eyre::Result<()> {
        let vm = TestVM::default();
        let mut guard = GatewayGuard::from(&vm);
        vm.set_sender(VAULT);

        eyre::ensure!(
            matches!(
                check(&guard, GATEWAY, Vec::new()),
                Err(GatewayGuardError::NotInitialized(_))
            ),
            "uninitialized vault must fail closed"
        );

        eyre::ensure!(guard.initialize(GATEWAY, U256::from(2u64)).is_ok(), "vault setup failed");
        eyre::ensure!(check(&guard, GATEWAY, Vec::new()).is_ok(), "gateway was blocked");

        let one = build_approval_signatures(&[Address::repeat_byte(0x01)]).to_vec();
        let Err(GatewayGuardError::TransactionRejected(rejected)) = check(&guard, STRANGER, one) else {
            eyre::bail!("stranger passed below the emergency threshold");
        };
        assert_eq!(rejected.executor, STRANGER);
        assert_eq!(rejected.signatures, U256::from(1u64));
        assert_eq!(rejected.required, U256::from(2u64));
        Ok(())
    }

    #[test]
    fn advertises_guard_interface() {
        let vm = TestVM::default();
        let guard = GatewayGuard::from(&vm);
        assert!(guard.supports_interface(FixedBytes::from([0xe6, 0xd7, 0xa8, 0x3a])));
        assert!(guard.supports_interface(FixedBytes::from([0x01, 0xff, 0xc9, 0xa7])));
        assert!(!guard.supports_interface(FixedBytes::from([0xff; 4])));
    }
}
