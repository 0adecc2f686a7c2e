use alloy_sol_types::sol;
use stylus_sdk::{alloy_primitives::U256, stylus_proc::SolidityError};
use timelock_gateway_types::GuardError;

sol! {
    error AlreadyInitialized(address vault);
    error NotInitialized(address vault);
    error InvalidGateway();
    error TransactionRejected(address executor, uint256 signatures, uint256 required);
    error QuorumNotVerified(address executor, uint256 required);
}

#[derive(SolidityError)]
pub enum GatewayGuardError {
    AlreadyInitialized(AlreadyInitialized),
    NotInitialized(NotInitialized),
    InvalidGateway(InvalidGateway),
    TransactionRejected(TransactionRejected),
    QuorumNotVerified(QuorumNotVerified),
}

impl From<GuardError> for GatewayGuardError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::Rejected {
                executor,
                signatures,
                required,
            } => Self::TransactionRejected(TransactionRejected {
                executor,
                signatures: U256::from(signatures),
                required: U256::from(required),
            }),
            GuardError::QuorumNotVerified { executor, required } => {
                Self::QuorumNotVerified(QuorumNotVerified {
                    executor,
                    required: U256::from(required),
                })
            }
        }
    }
}
