//! The node capabilities the engine relies on.
//!
//! [`ChainHandle`] is the whole surface the query code uses to reach a
//! node. The subxt-backed [`crate::client::SubxtHandle`] implements it over
//! WebSocket RPC; tests implement it in memory.

use async_trait::async_trait;
use idscope_core::{RawBalance, RawIdentityEntry, RawRegistration, RawSubIdentity};

use crate::error::ChainError;

/// Block hash as raw bytes.
pub type BlockHash = [u8; 32];

/// Chain properties as reported by `system_properties`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainProperties {
    pub token_symbol: Vec<String>,
    pub token_decimals: Vec<u32>,
    pub ss58_format: Option<u16>,
}

impl ChainProperties {
    /// Parse the loosely typed JSON returned by `system_properties`.
    ///
    /// Token fields may be a single value or a list; anything unexpected is
    /// skipped.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let token_symbol = one_or_many(value.get("tokenSymbol"))
            .filter_map(|v| v.as_str().map(String::from))
            .collect();
        let token_decimals = one_or_many(value.get("tokenDecimals"))
            .filter_map(|v| v.as_u64().and_then(|d| u32::try_from(d).ok()))
            .collect();
        let ss58_format = value
            .get("ss58Format")
            .and_then(|v| v.as_u64())
            .and_then(|v| u16::try_from(v).ok());

        Self {
            token_symbol,
            token_decimals,
            ss58_format,
        }
    }

    /// First token symbol, or empty when the chain lists none.
    pub fn primary_symbol(&self) -> String {
        self.token_symbol.first().cloned().unwrap_or_default()
    }
}

fn one_or_many(value: Option<&serde_json::Value>) -> impl Iterator<Item = &serde_json::Value> {
    let items: Vec<&serde_json::Value> = match value {
        Some(serde_json::Value::Array(items)) => items.iter().collect(),
        Some(serde_json::Value::Null) | None => Vec::new(),
        Some(single) => vec![single],
    };
    items.into_iter()
}

/// Free and reserved balance of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountBalance {
    pub free: RawBalance,
    pub reserved: RawBalance,
}

/// A live connection to one node.
#[async_trait]
pub trait ChainHandle: Send + Sync {
    /// Whether the connection can still serve requests.
    async fn is_connected(&self) -> bool;

    async fn chain_name(&self) -> Result<String, ChainError>;

    /// `None` when the node reports no properties at all.
    async fn chain_properties(&self) -> Result<Option<ChainProperties>, ChainError>;

    /// Hash of block `number`, `None` if the node does not know it.
    async fn block_hash(&self, number: u32) -> Result<Option<BlockHash>, ChainError>;

    /// Read state as of block `hash`. Fails when that state was pruned.
    async fn state_at(&self, hash: BlockHash) -> Result<(), ChainError>;

    /// Whether the runtime exposes the identity pallet. Answered from
    /// metadata already held by the handle.
    fn has_identity_feature(&self) -> bool;

    /// All identity registrations in storage order.
    async fn enumerate_identities(&self) -> Result<Vec<RawIdentityEntry>, ChainError>;

    async fn identity_of(&self, address: &str) -> Result<Option<RawRegistration>, ChainError>;

    /// Parent of a sub-account. Chains without sub-identities have none.
    async fn super_of(&self, _address: &str) -> Result<Option<RawSubIdentity>, ChainError> {
        Ok(None)
    }

    /// Account bound to a numeric index.
    async fn index_to_address(&self, index: u32) -> Result<Option<String>, ChainError>;

    /// `None` when the node exposes no balance data for the account.
    async fn balance_of(&self, address: &str) -> Result<Option<AccountBalance>, ChainError>;

    /// Token decimals of the chain's type registry.
    fn registry_decimals(&self) -> u32;
}

/// Opens connections to endpoints.
///
/// A failed `connect` must release whatever it set up before returning.
#[async_trait]
pub trait Connector: Send + Sync {
    type Handle: ChainHandle + 'static;

    async fn connect(&self, endpoint: &str) -> Result<Self::Handle, ChainError>;
}
