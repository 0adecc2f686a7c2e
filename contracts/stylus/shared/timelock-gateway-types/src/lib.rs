//! Shared wire formats for the timelock gateway.
//!
//! Everything in this crate is pure and deterministic so it can run inside the Stylus guard
//! contract as well as in the off-chain gateway core and tooling.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod action;
pub mod bytes;
pub mod errors;
pub mod guard;
pub mod multisend;
pub mod signatures;

pub use action::{Action, Operation};
pub use errors::{DecodeError, GuardError};
pub use guard::{GuardPolicy, SignatureVerifier};
pub use multisend::{decode_batch, encode_batch, pack_actions, unpack_actions};
pub use signatures::{build_approval_signatures, sort_signers, ApprovalSignature};
