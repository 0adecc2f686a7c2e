use alloy_primitives::{Address, Bytes, U256};

use crate::errors::DecodeError;

/// Dispatch mode of a call, as understood by the vault and the multi-call relay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Operation {
    Call = 0x00,
    DelegateCall = 0x01,
}

impl TryFrom<u8> for Operation {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Operation::Call),
            0x01 => Ok(Operation::DelegateCall),
            other => Err(DecodeError::UnknownOperation(other)),
        }
    }
}

/// One planned call: `target.call{value: value}(data)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Action {
    pub target: Address,
    pub value: U256,
    pub data: Bytes,
}

impl Action {
    pub fn new(target: Address, value: U256, data: impl Into<Bytes>) -> Self {
        Self {
            target,
            value,
            data: data.into(),
        }
    }

    /// Plain native-value transfer with empty calldata.
    pub fn transfer(target: Address, value: U256) -> Self {
        Self {
            target,
            value,
            data: Bytes::new(),
        }
    }
}
