use thiserror::Error;

/// Failure to read pool state from the chain. No retry happens at this layer.
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("RPC transport error: {0}")]
    Transport(String),

    #[error("RPC request timed out after {0} seconds")]
    Timeout(u64),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("RPC response carried no result")]
    EmptyResult,

    #[error("Invalid hex in RPC result: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("ABI decode error: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    #[error("Invalid call result: {0}")]
    Decode(String),

    #[error("Unknown pool: {0}")]
    UnknownPool(String),
}
