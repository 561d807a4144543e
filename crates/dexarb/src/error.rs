use dexarb_chain::ChainError;
use dexarb_pricing::PricingError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Failed to read {venue} pool {address}: {source}")]
    Chain {
        venue: String,
        address: String,
        #[source]
        source: ChainError,
    },

    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    #[error("Invalid quote context: {0}")]
    InvalidContext(String),

    #[error("Setup error: {0}")]
    Setup(String),
}

impl ServiceError {
    /// Errors caused by the caller's input rather than the chain or the pools.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ServiceError::InvalidContext(_))
    }
}
