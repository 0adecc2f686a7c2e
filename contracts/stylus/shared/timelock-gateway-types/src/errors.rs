use alloy_primitives::Address;

/// Errors while decoding relay payloads or signature blobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeError {
    Truncated,
    TrailingBytes,
    UnknownSelector([u8; 4]),
    MalformedCall,
    UnknownOperation(u8),
    DelegateCallNotAllowed,
    BadSignatureLength(usize),
    UnsupportedSignatureMarker(u8),
    MalformedSignature,
}

/// Errors raised by the vault guard policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardError {
    /// The executor is not the gateway and too few signature records were provided.
    Rejected {
        executor: Address,
        signatures: u64,
        required: u64,
    },
    /// Enough records were present, but the vault did not confirm them as a quorum.
    QuorumNotVerified { executor: Address, required: u64 },
}
