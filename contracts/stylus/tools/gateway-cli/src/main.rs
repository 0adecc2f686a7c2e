use alloy_primitives::{Address, U256};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use timelock_gateway::{hash::safe_transaction_hash, VaultCall};
use timelock_gateway_types::{
    build_approval_signatures, decode_batch, encode_batch, signatures::FORMAT_VERSION, sort_signers,
    Operation,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod actions;

use actions::{load_actions, ActionSpec};

/// Offline helpers for operating a timelock gateway and its vault.
///
/// Actions are given as JSON, inline or as `@path`:
/// `[{"target": "0x..", "value": "0x..", "data": "0x.."}]`.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode actions into the relay `multiSend(bytes)` payload.
    EncodeBatch {
        #[arg(long)]
        actions: String,
    },

    /// Decode a relay payload back into actions.
    DecodeBatch {
        /// Hex payload (0x-prefixed or bare).
        #[arg(long)]
        payload: String,
    },

    /// Build the approved-hash signature blob for a set of vault owners.
    Signatures {
        #[arg(long = "signer", required = true)]
        signers: Vec<Address>,
    },

    /// Compute the vault transaction hash the owners must approve for a batch.
    VaultHash {
        #[arg(long)]
        actions: String,

        /// Vault nonce the transaction will execute at.
        #[arg(long)]
        nonce: U256,

        /// Multi-call relay the vault delegate-calls into.
        #[arg(long, env = "GATEWAY_RELAY")]
        relay: Address,

        #[arg(long, env = "VAULT_ADDRESS")]
        vault: Address,

        #[arg(long, env = "CHAIN_ID")]
        chain_id: u64,
    },
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let output = run(Cli::parse().command)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("failed serialising output")?
    );
    Ok(())
}

fn run(command: Command) -> Result<serde_json::Value> {
    match command {
        Command::EncodeBatch { actions } => {
            let actions = load_actions(&actions)?;
            let payload = encode_batch(&actions);
            info!(actions = actions.len(), bytes = payload.len(), "encoded relay payload");
            Ok(json!({ "payload": payload }))
        }
        Command::DecodeBatch { payload } => {
            let raw = hex::decode(payload.trim_start_matches("0x")).context("payload is not hex")?;
            let actions = decode_batch(&raw).map_err(|err| anyhow!("invalid relay payload: {err:?}"))?;
            debug!(actions = actions.len(), "decoded relay payload");
            let specs: Vec<ActionSpec> = actions.into_iter().map(ActionSpec::from).collect();
            Ok(json!({ "actions": specs }))
        }
        Command::Signatures { signers } => {
            let sorted = sort_signers(&signers);
            if sorted.windows(2).any(|pair| pair[0] == pair[1]) {
                return Err(anyhow!("duplicate signer"));
            }
            let signatures = build_approval_signatures(&sorted);
            Ok(json!({
                "format_version": FORMAT_VERSION,
                "signers": sorted,
                "signatures": signatures,
            }))
        }
        Command::VaultHash {
            actions,
            nonce,
            relay,
            vault,
            chain_id,
        } => {
            let actions = load_actions(&actions)?;
            let call = VaultCall {
                to: relay,
                value: U256::ZERO,
                data: encode_batch(&actions),
                operation: Operation::DelegateCall,
            };
            let hash = safe_transaction_hash(chain_id, vault, &call, nonce);
            info!(%vault, chain_id, %nonce, %hash, "computed vault transaction hash");
            Ok(json!({
                "safe_tx_hash": hash,
                "nonce": nonce,
                "to": call.to,
                "operation": call.operation as u8,
                "data": call.data,
            }))
        }
    }
}
