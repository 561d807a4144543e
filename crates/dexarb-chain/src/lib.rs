pub mod abi;
pub mod error;
pub mod memory;
pub mod reader;

pub use error::ChainError;
pub use memory::MemoryPoolReader;
pub use reader::{JsonRpcPoolReader, PoolReader};
