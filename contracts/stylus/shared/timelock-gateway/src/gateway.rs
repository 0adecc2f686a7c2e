//! Transaction lifecycle manager.
//!
//! State machine per transaction: `Queued -> Executed` or `Queued -> removed` (unqueue). Every
//! public operation runs its checks and external calls before touching gateway state, so a
//! failure never leaves a half-applied transition behind.

use std::collections::{BTreeMap, BTreeSet};

use alloy_primitives::{Address, Bytes, B256, U256};
use timelock_gateway_types::{build_approval_signatures, encode_batch, sort_signers, Action, Operation};
use tracing::{debug, info, warn};

use crate::{
    builder::ActionBuilder,
    collect::{collect_actions, BuilderDirectory},
    config::{DelayClass, GatewayConfig},
    context::{CallContext, PlanContext},
    error::{GatewayError, Role},
    registry::{BuilderInfo, BuilderRegistry},
    transaction::{QueuedBuilder, TransactionId, TransactionInfo, TransactionStatus},
    vault::{Vault, VaultCall},
};

/// Outcome of a successful [`TimelockGateway::execute`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionReceipt {
    pub id: TransactionId,
    /// Vault transaction hash the signers stood behind.
    pub vault_hash: B256,
    /// Vault nonce the transaction executed at.
    pub nonce: U256,
    /// Approvers, in the order their signatures were submitted.
    pub signers: Vec<Address>,
}

pub struct TimelockGateway<V> {
    config: GatewayConfig,
    vault: V,
    registry: BuilderRegistry,
    directory: BuilderDirectory,
    transactions: BTreeMap<TransactionId, TransactionInfo>,
    disapprovals: BTreeSet<(Address, B256)>,
    last_id: u64,
}

impl<V: Vault> TimelockGateway<V> {
    pub fn new(config: GatewayConfig, vault: V) -> Result<Self, GatewayError> {
        config.validate()?;
        Ok(Self {
            config,
            vault,
            registry: BuilderRegistry::default(),
            directory: BTreeMap::new(),
            transactions: BTreeMap::new(),
            disapprovals: BTreeSet::new(),
            last_id: 0,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    pub fn vault_mut(&mut self) -> &mut V {
        &mut self.vault
    }

    /// Make a builder implementation reachable at `address`.
    ///
    /// Installing confers no trust; only [`Self::approve_builder`] does. An occupied address
    /// cannot be reassigned.
    pub fn install_builder(
        &mut self,
        address: Address,
        builder: Box<dyn ActionBuilder>,
    ) -> Result<(), GatewayError> {
        if self.directory.contains_key(&address) {
            return Err(GatewayError::BuilderAddressTaken(address));
        }
        self.directory.insert(address, builder);
        debug!(builder = %address, "installed builder");
        Ok(())
    }

    /// Approve `builder` for `duration` seconds. Vault only; `duration == 0` revokes.
    pub fn approve_builder(
        &mut self,
        ctx: &CallContext,
        builder: Address,
        duration: u64,
    ) -> Result<u64, GatewayError> {
        self.require_vault(ctx)?;
        let expiry = ctx
            .timestamp
            .checked_add(duration)
            .ok_or(GatewayError::TimestampOverflow)?;
        self.registry.approve(builder, expiry);
        info!(builder = %builder, expiry, "approved builder");
        Ok(expiry)
    }

    /// Revoke a builder's approval immediately. Any owner.
    pub fn disapprove_builder(&mut self, ctx: &CallContext, builder: Address) -> Result<(), GatewayError> {
        self.require_owner(ctx)?;
        self.registry.revoke(builder);
        info!(builder = %builder, owner = %ctx.sender, "revoked builder approval");
        Ok(())
    }

    pub fn builder_info(&self, builder: Address) -> Option<&BuilderInfo> {
        self.registry.get(builder)
    }

    pub fn is_builder_approved(&self, builder: Address, now: u64) -> bool {
        self.registry.is_approved(builder, now)
    }

    /// Queue the combined plan of approved builders under the short delay.
    pub fn queue_approved(
        &mut self,
        ctx: &CallContext,
        builders: &[Address],
        expiry_delay: u64,
    ) -> Result<TransactionId, GatewayError> {
        self.require_owner(ctx)?;
        if builders.is_empty() {
            return Err(GatewayError::EmptyBatch);
        }
        let pending_id = TransactionId::new(self.last_id + 1);
        let mut seen = BTreeSet::new();
        for &builder in builders {
            if !self.registry.is_approved(builder, ctx.timestamp) {
                return Err(GatewayError::BuilderNotApproved(builder));
            }
            if let Some(transaction) = self.registry.queued_in(builder) {
                return Err(GatewayError::BuilderAlreadyQueued { builder, transaction });
            }
            if !seen.insert(builder) {
                return Err(GatewayError::BuilderAlreadyQueued {
                    builder,
                    transaction: pending_id,
                });
            }
        }

        let (actions, shares) =
            collect_actions(&self.directory, builders, &self.plan_context(ctx.timestamp))?;
        let id = self.enqueue(ctx.timestamp, DelayClass::PreApproved, shares, actions, expiry_delay)?;
        self.registry.mark_queued(builders.iter().copied(), id);
        Ok(id)
    }

    /// Queue caller-supplied actions under the long delay.
    pub fn queue_arbitrary(
        &mut self,
        ctx: &CallContext,
        actions: Vec<Action>,
        expiry_delay: u64,
    ) -> Result<TransactionId, GatewayError> {
        self.require_owner(ctx)?;
        if actions.is_empty() {
            return Err(GatewayError::EmptyBatch);
        }
        self.enqueue(ctx.timestamp, DelayClass::Arbitrary, Vec::new(), actions, expiry_delay)
    }

    pub fn queue_action(
        &mut self,
        ctx: &CallContext,
        action: Action,
        expiry_delay: u64,
    ) -> Result<TransactionId, GatewayError> {
        self.queue_arbitrary(ctx, vec![action], expiry_delay)
    }

    /// Execute a matured transaction through the vault. Open to anyone.
    ///
    /// Without `signers`, every owner that approved the current vault hash and has not
    /// disapproved it signs. Explicit `signers` are each re-validated against the registry and
    /// the disapprovals; the vault's own threshold decides whether they suffice.
    pub fn execute(
        &mut self,
        ctx: &CallContext,
        id: TransactionId,
        signers: Option<&[Address]>,
    ) -> Result<ExecutionReceipt, GatewayError> {
        let tx = self.transactions.get(&id).ok_or(GatewayError::NotQueued(id))?;
        tx.ensure_executable(id, ctx.timestamp)?;

        // The vault nonce may have moved since queueing, so the hash is always fresh.
        let call = self.vault_call(&tx.encoded_actions);
        let nonce = self.vault.nonce();
        let vault_hash = self.vault.transaction_hash(&call, nonce);
        let signers = match signers {
            Some(explicit) => self.validate_signers(explicit, vault_hash)?,
            None => self.derive_approvers(vault_hash),
        };
        debug!(transaction = %id, hash = %vault_hash, signers = signers.len(), "submitting to vault");

        let signatures = build_approval_signatures(&signers);
        if let Err(err) = self.vault.exec_transaction(&call, &signatures) {
            warn!(transaction = %id, hash = %vault_hash, error = %err, "vault rejected execution");
            return Err(err.into());
        }

        let plan_ctx = self.plan_context(ctx.timestamp);
        let tx = self
            .transactions
            .get_mut(&id)
            .ok_or(GatewayError::NotQueued(id))?;
        tx.is_executed = true;
        self.registry.release(tx.builder_addresses(), id);
        for (builder, actions) in tx.builder_actions() {
            if let Some(implementation) = self.directory.get_mut(&builder) {
                implementation.commit_actions(&plan_ctx, actions);
            }
        }

        info!(transaction = %id, hash = %vault_hash, %nonce, executor = %ctx.sender, "executed transaction");
        Ok(ExecutionReceipt {
            id,
            vault_hash,
            nonce,
            signers,
        })
    }

    /// Drop a transaction that has not executed and release its builders. Any owner.
    pub fn unqueue(&mut self, ctx: &CallContext, id: TransactionId) -> Result<(), GatewayError> {
        self.require_owner(ctx)?;
        match self.transactions.get(&id) {
            None => return Err(GatewayError::NotQueued(id)),
            Some(tx) if tx.is_executed => return Err(GatewayError::AlreadyExecuted(id)),
            Some(_) => {}
        }
        if let Some(tx) = self.transactions.remove(&id) {
            self.registry.release(tx.builder_addresses(), id);
        }
        info!(transaction = %id, owner = %ctx.sender, "unqueued transaction");
        Ok(())
    }

    /// Permanently withdraw the caller's support for a vault hash it approved.
    pub fn disapprove_hash(&mut self, ctx: &CallContext, hash: B256) -> Result<(), GatewayError> {
        self.require_owner(ctx)?;
        if !self.vault.is_hash_approved(ctx.sender, hash) {
            return Err(GatewayError::HashNotApproved {
                signer: ctx.sender,
                hash,
            });
        }
        if self.disapprovals.insert((ctx.sender, hash)) {
            info!(owner = %ctx.sender, %hash, "disapproved vault hash");
        }
        Ok(())
    }

    pub fn is_disapproved(&self, signer: Address, hash: B256) -> bool {
        self.disapprovals.contains(&(signer, hash))
    }

    pub fn transaction(&self, id: TransactionId) -> Option<&TransactionInfo> {
        self.transactions.get(&id)
    }

    pub fn transaction_status(&self, id: TransactionId, now: u64) -> Option<TransactionStatus> {
        self.transactions.get(&id).map(|tx| tx.status(now))
    }

    /// Vault hash of a queued transaction at the vault's current nonce.
    pub fn vault_transaction_hash(&self, id: TransactionId) -> Result<B256, GatewayError> {
        let tx = self.transactions.get(&id).ok_or(GatewayError::NotQueued(id))?;
        Ok(self.current_hash(&tx.encoded_actions))
    }

    /// Vault hash the given builders would produce if queued and executed now.
    pub fn preview_vault_hash(&self, builders: &[Address], now: u64) -> Result<B256, GatewayError> {
        if builders.is_empty() {
            return Err(GatewayError::EmptyBatch);
        }
        let (actions, _) = collect_actions(&self.directory, builders, &self.plan_context(now))?;
        let hash = self.current_hash(&encode_batch(&actions));
        debug!(builders = builders.len(), actions = actions.len(), %hash, "previewed vault hash");
        Ok(hash)
    }

    /// Owners currently standing behind a queued transaction, in signature order.
    pub fn approvers(&self, id: TransactionId) -> Result<Vec<Address>, GatewayError> {
        let hash = self.vault_transaction_hash(id)?;
        Ok(self.derive_approvers(hash))
    }

    fn require_vault(&self, ctx: &CallContext) -> Result<(), GatewayError> {
        if ctx.sender != self.vault.address() {
            return Err(GatewayError::Unauthorized {
                caller: ctx.sender,
                role: Role::Vault,
            });
        }
        Ok(())
    }

    fn require_owner(&self, ctx: &CallContext) -> Result<(), GatewayError> {
        if !self.vault.is_owner(ctx.sender) {
            return Err(GatewayError::Unauthorized {
                caller: ctx.sender,
                role: Role::Owner,
            });
        }
        Ok(())
    }

    fn plan_context(&self, timestamp: u64) -> PlanContext {
        PlanContext {
            vault: self.vault.address(),
            timestamp,
        }
    }

    fn vault_call(&self, encoded_actions: &Bytes) -> VaultCall {
        VaultCall {
            to: self.config.relay,
            value: U256::ZERO,
            data: encoded_actions.clone(),
            operation: Operation::DelegateCall,
        }
    }

    fn current_hash(&self, encoded_actions: &Bytes) -> B256 {
        self.vault
            .transaction_hash(&self.vault_call(encoded_actions), self.vault.nonce())
    }

    fn stands_behind(&self, signer: Address, hash: B256) -> bool {
        self.vault.is_hash_approved(signer, hash) && !self.is_disapproved(signer, hash)
    }

    fn derive_approvers(&self, hash: B256) -> Vec<Address> {
        let approvers: Vec<Address> = self
            .vault
            .owners()
            .into_iter()
            .filter(|owner| self.stands_behind(*owner, hash))
            .collect();
        sort_signers(&approvers)
    }

    fn validate_signers(&self, signers: &[Address], hash: B256) -> Result<Vec<Address>, GatewayError> {
        let sorted = sort_signers(signers);
        if let Some(pair) = sorted.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(GatewayError::InvalidSigner { signer: pair[0], hash });
        }
        if let Some(&signer) = sorted.iter().find(|signer| !self.stands_behind(**signer, hash)) {
            return Err(GatewayError::InvalidSigner { signer, hash });
        }
        Ok(sorted)
    }

    fn enqueue(
        &mut self,
        now: u64,
        class: DelayClass,
        builders: Vec<QueuedBuilder>,
        actions: Vec<Action>,
        expiry_delay: u64,
    ) -> Result<TransactionId, GatewayError> {
        let executable_at = now
            .checked_add(self.config.delay_for(class))
            .ok_or(GatewayError::TimestampOverflow)?;
        let expires_at = match self.config.expiry_window(expiry_delay) {
            Some(window) => Some(
                executable_at
                    .checked_add(window)
                    .ok_or(GatewayError::TimestampOverflow)?,
            ),
            None => None,
        };
        let encoded_actions = encode_batch(&actions);

        self.last_id += 1;
        let id = TransactionId::new(self.last_id);
        info!(
            transaction = %id,
            ?class,
            executable_at,
            ?expires_at,
            actions = actions.len(),
            builders = builders.len(),
            "queued transaction"
        );
        self.transactions.insert(
            id,
            TransactionInfo {
                builders,
                actions,
                encoded_actions,
                executable_at,
                expires_at,
                is_executed: false,
            },
        );
        Ok(id)
    }
}
