//! Multi-call relay payload encoding.
//!
//! The relay receives one `multiSend(bytes transactions)` call whose argument is a packed stream
//! of records, each laid out as (no padding between fields):
//! - `uint8 operation` (always [`Operation::Call`])
//! - `address to` (20 bytes)
//! - `uint256 value` (32 bytes, big-endian)
//! - `uint256 dataLength` (32 bytes, big-endian)
//! - `bytes data` (`dataLength` bytes)
//!
//! The vault hashes the exact payload bytes, so encoding must stay byte-for-byte stable.

use alloc::vec::Vec;

use alloy_primitives::{Bytes, U256};
use alloy_sol_types::{sol, SolCall};

use crate::{
    action::{Action, Operation},
    bytes::{read_address, read_len_be, read_slice, read_u256_be, read_u8},
    errors::DecodeError,
};

sol! {
    /// Multi-call relay entrypoint (call-only variant).
    interface IMultiSend {
        function multiSend(bytes transactions) external payable;
    }
}

/// `multiSend(bytes)` selector.
pub const MULTISEND_SELECTOR: [u8; 4] = IMultiSend::multiSendCall::SELECTOR;

/// operation (1) + to (20) + value (32) + dataLength (32).
pub const RECORD_HEADER_LEN: usize = 1 + 20 + 32 + 32;

/// Pack actions into the relay's record stream, preserving order.
pub fn pack_actions(actions: &[Action]) -> Vec<u8> {
    let len = actions
        .iter()
        .map(|action| RECORD_HEADER_LEN + action.data.len())
        .sum();
    let mut buf = Vec::with_capacity(len);
    for action in actions {
        buf.push(Operation::Call as u8);
        buf.extend_from_slice(action.target.as_slice());
        buf.extend_from_slice(&action.value.to_be_bytes::<32>());
        buf.extend_from_slice(&U256::from(action.data.len()).to_be_bytes::<32>());
        buf.extend_from_slice(&action.data);
    }
    buf
}

/// Encode a batch as the relay calldata the vault forwards.
pub fn encode_batch(actions: &[Action]) -> Bytes {
    IMultiSend::multiSendCall {
        transactions: pack_actions(actions).into(),
    }
    .abi_encode()
    .into()
}

/// Parse a packed record stream back into actions.
///
/// Fails closed on truncation and on any record that is not a plain call.
pub fn unpack_actions(packed: &[u8]) -> Result<Vec<Action>, DecodeError> {
    let mut actions = Vec::new();
    let mut i = 0usize;
    while i < packed.len() {
        let operation = Operation::try_from(read_u8(packed, &mut i)?)?;
        if operation != Operation::Call {
            return Err(DecodeError::DelegateCallNotAllowed);
        }
        let target = read_address(packed, &mut i)?;
        let value = read_u256_be(packed, &mut i)?;
        let data_len = read_len_be(packed, &mut i)?;
        let data = read_slice(packed, &mut i, data_len)?;
        actions.push(Action::new(target, value, Bytes::copy_from_slice(data)));
    }
    Ok(actions)
}

/// Inverse of [`encode_batch`].
pub fn decode_batch(payload: &[u8]) -> Result<Vec<Action>, DecodeError> {
    if payload.len() < 4 {
        return Err(DecodeError::Truncated);
    }
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&payload[..4]);
    if selector != MULTISEND_SELECTOR {
        return Err(DecodeError::UnknownSelector(selector));
    }
    let call = IMultiSend::multiSendCall::abi_decode(payload, false)
        .map_err(|_| DecodeError::MalformedCall)?;
    // Only the canonical encoding is accepted.
    let canonical = call.abi_encode();
    if payload != canonical.as_slice() {
        return Err(if payload.starts_with(&canonical) {
            DecodeError::TrailingBytes
        } else {
            DecodeError::MalformedCall
        });
    }
    unpack_actions(&call.transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;

    const PACKED_GOLDEN: &str = concat!(
        "00",
        "1111111111111111111111111111111111111111",
        "0000000000000000000000000000000000000000000000000000000000000001",
        "0000000000000000000000000000000000000000000000000000000000000000",
        "00",
        "2222222222222222222222222222222222222222",
        "0000000000000000000000000000000000000000000000000000000000000000",
        "0000000000000000000000000000000000000000000000000000000000000004",
        "a9059cbb",
    );

    fn sample() -> Vec<Action> {
        vec![
            Action::transfer(Address::repeat_byte(0x11), U256::from(1u64)),
            Action::new(
                Address::repeat_byte(0x22),
                U256::ZERO,
                vec![0xa9, 0x05, 0x9c, 0xbb],
            ),
        ]
    }

    #[test]
    fn packs_records_without_padding() {
        let packed = pack_actions(&sample());
        assert_eq!(packed.len(), 174);
        assert_eq!(hex::encode(&packed), PACKED_GOLDEN);
    }

    #[test]
    fn batch_is_a_multisend_call() {
        let payload = encode_batch(&sample());
        assert_eq!(hex::encode(&payload[..4]), "8d80ff0a");
        // Single dynamic argument: offset word, then length word, then padded bytes.
        assert_eq!(U256::from_be_slice(&payload[4..36]), U256::from(32u64));
        assert_eq!(U256::from_be_slice(&payload[36..68]), U256::from(174u64));
        assert_eq!(hex::encode(&payload[68..68 + 174]), PACKED_GOLDEN);
        assert_eq!(payload.len(), 4 + 32 + 32 + 192);
        assert!(payload[68 + 174..].iter().all(|b| *b == 0));
    }

    #[test]
    fn encoding_is_deterministic_and_order_sensitive() {
        let actions = sample();
        assert_eq!(encode_batch(&actions), encode_batch(&actions));

        let mut swapped = actions.clone();
        swapped.swap(0, 1);
        assert_ne!(encode_batch(&swapped), encode_batch(&actions));

        let mut tweaked = actions.clone();
        tweaked[0].value = U256::from(2u64);
        assert_ne!(encode_batch(&tweaked), encode_batch(&actions));
    }

    #[test]
    fn decode_inverts_encode() {
        let actions = sample();
        assert_eq!(decode_batch(&encode_batch(&actions)), Ok(actions));
        assert_eq!(decode_batch(&encode_batch(&[])), Ok(vec![]));
    }

    #[test]
    fn decode_rejects_foreign_selector() {
        let mut payload = encode_batch(&sample()).to_vec();
        payload[0] ^= 0xff;
        assert_eq!(
            decode_batch(&payload),
            Err(DecodeError::UnknownSelector([0x72, 0x80, 0xff, 0x0a]))
        );
        assert_eq!(decode_batch(&[0x8d, 0x80]), Err(DecodeError::Truncated));
    }

    #[test]
    fn decode_rejects_non_canonical_payloads() {
        let payload = encode_batch(&sample()).to_vec();

        let mut extra_word = payload.clone();
        extra_word.extend_from_slice(&[0u8; 32]);
        assert_eq!(decode_batch(&extra_word), Err(DecodeError::TrailingBytes));

        let mut extra_byte = payload.clone();
        extra_byte.push(0x01);
        assert_eq!(decode_batch(&extra_byte), Err(DecodeError::TrailingBytes));

        // Non-zero padding after the packed records.
        let mut dirty = payload.clone();
        if let Some(last) = dirty.last_mut() {
            *last = 0x01;
        }
        assert_eq!(decode_batch(&dirty), Err(DecodeError::MalformedCall));

        assert_eq!(decode_batch(&payload[..payload.len() - 1]), Err(DecodeError::MalformedCall));
    }

    #[test]
    fn unpack_fails_closed() {
        let mut packed = pack_actions(&sample());
        packed.pop();
        assert_eq!(unpack_actions(&packed), Err(DecodeError::Truncated));

        let mut delegate = pack_actions(&sample());
        delegate[0] = Operation::DelegateCall as u8;
        assert_eq!(
            unpack_actions(&delegate),
            Err(DecodeError::DelegateCallNotAllowed)
        );

        let mut unknown = pack_actions(&sample());
        unknown[0] = 0x07;
        assert_eq!(
            unpack_actions(&unknown),
            Err(DecodeError::UnknownOperation(0x07))
        );
    }
}
