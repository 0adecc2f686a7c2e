//! Synthetic "pre-approved hash" signatures.
//!
//! Format version [`FORMAT_VERSION`], one 65-byte record per signer:
//! - `r` (32 bytes): signer address, left-padded to a 256-bit word
//! - `s` (32 bytes): zero
//! - `v` (1 byte): [`APPROVED_HASH_MARKER`]
//!
//! A record is a pointer into the vault's own approved-hash registry, not an ECDSA signature.
//! The vault requires records in strictly increasing signer order.

use alloc::vec::Vec;

use alloy_primitives::{Address, Bytes};

use crate::errors::DecodeError;

/// Layout version of the records built here, reported alongside signature blobs.
pub const FORMAT_VERSION: u8 = 1;

/// `v` value the vault reads as "look up the approved-hash registry for `r`".
pub const APPROVED_HASH_MARKER: u8 = 1;

pub const SIGNATURE_LEN: usize = 65;

/// Ascending numeric order of signer addresses.
pub fn sort_signers(signers: &[Address]) -> Vec<Address> {
    let mut sorted = signers.to_vec();
    sorted.sort_unstable();
    sorted
}

/// Number of 65-byte records in a signature blob (dynamic tails are not counted).
pub fn signature_count(signatures: &[u8]) -> usize {
    signatures.len() / SIGNATURE_LEN
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ApprovalSignature {
    pub signer: Address,
}

impl ApprovalSignature {
    pub const fn new(signer: Address) -> Self {
        Self { signer }
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        let mut out = [0u8; SIGNATURE_LEN];
        out[12..32].copy_from_slice(self.signer.as_slice());
        out[64] = APPROVED_HASH_MARKER;
        out
    }

    pub fn from_bytes(record: &[u8]) -> Result<Self, DecodeError> {
        if record.len() != SIGNATURE_LEN {
            return Err(DecodeError::BadSignatureLength(record.len()));
        }
        if record[64] != APPROVED_HASH_MARKER {
            return Err(DecodeError::UnsupportedSignatureMarker(record[64]));
        }
        if record[..12].iter().chain(&record[32..64]).any(|b| *b != 0) {
            return Err(DecodeError::MalformedSignature);
        }
        Ok(Self::new(Address::from_slice(&record[12..32])))
    }

    /// Parse a whole blob; any record that is not an approved-hash record is rejected.
    pub fn decode_all(signatures: &[u8]) -> Result<Vec<Self>, DecodeError> {
        if signatures.len() % SIGNATURE_LEN != 0 {
            return Err(DecodeError::BadSignatureLength(signatures.len()));
        }
        signatures
            .chunks_exact(SIGNATURE_LEN)
            .map(Self::from_bytes)
            .collect()
    }
}

/// Concatenate approval records for signers that are already in canonical order.
pub fn build_approval_signatures(sorted_signers: &[Address]) -> Bytes {
    let mut buf = Vec::with_capacity(sorted_signers.len() * SIGNATURE_LEN);
    for signer in sorted_signers {
        buf.extend_from_slice(&ApprovalSignature::new(*signer).to_bytes());
    }
    buf.into()
}
