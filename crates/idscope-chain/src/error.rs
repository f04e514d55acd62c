//! Error types for identity queries.

use idscope_core::{PaginationError, PatternError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error(transparent)]
    InvalidArgument(#[from] PaginationError),

    #[error(transparent)]
    InvalidQuery(#[from] PatternError),

    #[error("Failed to connect to chain: {0}")]
    Connection(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Can not fetch Identities for a chain that does not implement the identity pallet.")]
    UnsupportedChain,

    #[error("{context}: {source}")]
    Fetch {
        context: String,
        #[source]
        source: Box<ChainError>,
    },

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Storage query failed: {0}")]
    Storage(String),

    #[error("Subxt error: {0}")]
    Subxt(#[from] subxt::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] subxt::error::DecodeError),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl ChainError {
    pub fn identity_not_found() -> Self {
        ChainError::NotFound("Unable to find an identity with the provided address.".to_string())
    }

    pub fn balance_not_found() -> Self {
        ChainError::NotFound("Unable to find the balance for the provided address.".to_string())
    }

    /// Wrap an error with a description of what was being attempted.
    pub fn context(self, context: impl Into<String>) -> Self {
        ChainError::Fetch {
            context: context.into(),
            source: Box::new(self),
        }
    }
}
