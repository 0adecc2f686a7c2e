//! Minimal big-endian readers for packed byte streams.
//!
//! Every reader advances the cursor only on success, so a failed read leaves `i` untouched.

use alloy_primitives::{Address, U256};

use crate::errors::DecodeError;

pub fn read_slice<'a>(bytes: &'a [u8], i: &mut usize, len: usize) -> Result<&'a [u8], DecodeError> {
    let end = i.checked_add(len).ok_or(DecodeError::Truncated)?;
    if bytes.len() < end {
        return Err(DecodeError::Truncated);
    }
    let out = &bytes[*i..end];
    *i = end;
    Ok(out)
}

pub fn read_u8(bytes: &[u8], i: &mut usize) -> Result<u8, DecodeError> {
    Ok(read_slice(bytes, i, 1)?[0])
}

pub fn read_address(bytes: &[u8], i: &mut usize) -> Result<Address, DecodeError> {
    Ok(Address::from_slice(read_slice(bytes, i, 20)?))
}

pub fn read_u256_be(bytes: &[u8], i: &mut usize) -> Result<U256, DecodeError> {
    Ok(U256::from_be_slice(read_slice(bytes, i, 32)?))
}

/// Read a 32-byte big-endian length prefix that must fit in the remaining input.
pub fn read_len_be(bytes: &[u8], i: &mut usize) -> Result<usize, DecodeError> {
    let mut j = *i;
    let len = read_u256_be(bytes, &mut j)?;
    let remaining = bytes.len() - j;
    if len > U256::from(remaining) {
        return Err(DecodeError::Truncated);
    }
    let len = usize::try_from(len).map_err(|_| DecodeError::Truncated)?;
    *i = j;
    Ok(len)
}
