//! Chain client using subxt.
//!
//! Supports WebSocket RPC connections to Polkadot-SDK chains. Identity data
//! lives on the People chain for Polkadot and Kusama, but any chain with the
//! identity pallet works.

use std::time::Duration;

use async_trait::async_trait;
use idscope_core::{EngineConfig, RawIdentityEntry, RawRegistration, RawSubIdentity};
use subxt::backend::rpc::RpcClient;
use subxt::ext::subxt_rpcs::rpc_params;
use subxt::{OnlineClient, PolkadotConfig};

use crate::error::ChainError;
use crate::handle::{AccountBalance, BlockHash, ChainHandle, ChainProperties, Connector};
use crate::queries::identity::IDENTITY_PALLET;
use crate::ss58::encode_ss58;

/// Opens [`SubxtHandle`]s over WebSocket RPC.
#[derive(Debug, Clone)]
pub struct SubxtConnector {
    liveness_timeout: Duration,
    default_decimals: u32,
    fallback_ss58_prefix: u16,
}

impl SubxtConnector {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            liveness_timeout: config.liveness_timeout(),
            default_decimals: config.default_decimals,
            fallback_ss58_prefix: config.fallback_ss58_prefix,
        }
    }
}

impl Default for SubxtConnector {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

#[async_trait]
impl Connector for SubxtConnector {
    type Handle = SubxtHandle;

    async fn connect(&self, endpoint: &str) -> Result<SubxtHandle, ChainError> {
        SubxtHandle::connect(endpoint, self).await
    }
}

/// A ready connection to one node.
pub struct SubxtHandle {
    endpoint: String,
    rpc: RpcClient,
    client: OnlineClient<PolkadotConfig>,
    properties: Option<ChainProperties>,
    decimals: u32,
    ss58_prefix: u16,
    liveness_timeout: Duration,
}

impl SubxtHandle {
    /// Connect and wait until metadata and chain properties are loaded.
    ///
    /// On failure everything created so far is dropped, which closes the
    /// socket.
    pub async fn connect(endpoint: &str, connector: &SubxtConnector) -> Result<Self, ChainError> {
        tracing::info!("Connecting to {}", endpoint);

        let rpc = RpcClient::from_url(endpoint).await.map_err(|e| {
            tracing::warn!("Failed to connect to {}: {}", endpoint, e);
            ChainError::Connection(format!("{}: {}", endpoint, e))
        })?;

        let client = OnlineClient::<PolkadotConfig>::from_rpc_client(rpc.clone())
            .await
            .map_err(|e| {
                tracing::warn!("Failed to create client from {}: {}", endpoint, e);
                ChainError::Connection(format!("{}: {}", endpoint, e))
            })?;

        let properties = fetch_properties(&rpc)
            .await
            .map_err(|e| ChainError::Connection(format!("{}: {}", endpoint, e)))?;

        let decimals = properties
            .as_ref()
            .and_then(|p| p.token_decimals.first().copied())
            .unwrap_or(connector.default_decimals);
        let ss58_prefix = properties
            .as_ref()
            .and_then(|p| p.ss58_format)
            .unwrap_or(connector.fallback_ss58_prefix);

        tracing::info!(
            "Connected to {} (spec_version: {}, ss58: {}, decimals: {})",
            endpoint,
            client.runtime_version().spec_version,
            ss58_prefix,
            decimals
        );

        Ok(Self {
            endpoint: endpoint.to_string(),
            rpc,
            client,
            properties,
            decimals,
            ss58_prefix,
            liveness_timeout: connector.liveness_timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get the underlying subxt client.
    pub fn client(&self) -> &OnlineClient<PolkadotConfig> {
        &self.client
    }

    /// Chain properties as read at connect time.
    pub fn properties(&self) -> Option<&ChainProperties> {
        self.properties.as_ref()
    }

    pub fn ss58_prefix(&self) -> u16 {
        self.ss58_prefix
    }

    pub(crate) fn has_pallet(&self, name: &str) -> bool {
        self.client.metadata().pallet_by_name(name).is_some()
    }

    pub(crate) fn encode_address(&self, account: &[u8; 32]) -> String {
        encode_ss58(account, self.ss58_prefix)
    }
}

async fn fetch_properties(rpc: &RpcClient) -> Result<Option<ChainProperties>, ChainError> {
    let value: serde_json::Value = rpc
        .request("system_properties", rpc_params![])
        .await
        .map_err(|e| ChainError::Rpc(e.to_string()))?;

    Ok(value
        .is_object()
        .then(|| ChainProperties::from_json(&value)))
}

#[async_trait]
impl ChainHandle for SubxtHandle {
    async fn is_connected(&self) -> bool {
        let probe = self
            .rpc
            .request::<serde_json::Value>("system_health", rpc_params![]);
        match tokio::time::timeout(self.liveness_timeout, probe).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                tracing::debug!("Liveness probe for {} failed: {}", self.endpoint, e);
                false
            }
            Err(_) => {
                tracing::debug!("Liveness probe for {} timed out", self.endpoint);
                false
            }
        }
    }

    async fn chain_name(&self) -> Result<String, ChainError> {
        self.rpc
            .request::<String>("system_chain", rpc_params![])
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    async fn chain_properties(&self) -> Result<Option<ChainProperties>, ChainError> {
        fetch_properties(&self.rpc).await
    }

    async fn block_hash(&self, number: u32) -> Result<Option<BlockHash>, ChainError> {
        let hash: Option<String> = self
            .rpc
            .request("chain_getBlockHash", rpc_params![number])
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;

        let Some(hash) = hash else {
            return Ok(None);
        };
        let bytes = hex::decode(hash.trim_start_matches("0x"))
            .map_err(|e| ChainError::InvalidData(format!("Invalid block hash {}: {}", hash, e)))?;
        let hash: BlockHash = bytes
            .try_into()
            .map_err(|_| ChainError::InvalidData("Block hash is not 32 bytes".into()))?;
        Ok(Some(hash))
    }

    async fn state_at(&self, hash: BlockHash) -> Result<(), ChainError> {
        let hash = format!("0x{}", hex::encode(hash));
        self.rpc
            .request::<serde_json::Value>("state_getRuntimeVersion", rpc_params![hash])
            .await
            .map(|_| ())
            .map_err(|e| ChainError::Storage(e.to_string()))
    }

    fn has_identity_feature(&self) -> bool {
        self.has_pallet(IDENTITY_PALLET)
    }

    async fn enumerate_identities(&self) -> Result<Vec<RawIdentityEntry>, ChainError> {
        self.fetch_identity_entries().await
    }

    async fn identity_of(&self, address: &str) -> Result<Option<RawRegistration>, ChainError> {
        self.fetch_identity_of(address).await
    }

    async fn super_of(&self, address: &str) -> Result<Option<RawSubIdentity>, ChainError> {
        self.fetch_super_of(address).await
    }

    async fn index_to_address(&self, index: u32) -> Result<Option<String>, ChainError> {
        self.fetch_index_account(index).await
    }

    async fn balance_of(&self, address: &str) -> Result<Option<AccountBalance>, ChainError> {
        self.fetch_account_balance(address).await
    }

    fn registry_decimals(&self) -> u32 {
        self.decimals
    }
}
