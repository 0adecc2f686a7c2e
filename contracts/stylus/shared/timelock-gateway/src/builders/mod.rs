//! Reference builders.

mod native_transfer;
mod static_batch;
mod token_transfer;

pub use native_transfer::NativeTransferBuilder;
pub use static_batch::StaticBatch;
pub use token_transfer::{IERC20, TokenTransferBuilder};
