//! Endpoint-level entry points.
//!
//! [`IdentityEngine`] owns the connection and token-symbol caches and runs
//! every operation against the handle cached for the requested endpoint.
//! Arguments are validated before a connection is acquired.

use std::sync::Arc;

use idscope_core::{
    Balance, ChainStatus, EngineConfig, Identity, Page, PageRequest, SearchQuery, Token,
};

use crate::cache::{ConnectionCache, TokenSymbolCache};
use crate::client::SubxtConnector;
use crate::error::ChainError;
use crate::handle::Connector;
use crate::{identities, search, status};

pub struct IdentityEngine<C: Connector> {
    connections: ConnectionCache<C>,
    symbols: TokenSymbolCache,
}

impl IdentityEngine<SubxtConnector> {
    /// Engine talking to real nodes over WebSocket RPC.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(SubxtConnector::new(config), config)
    }
}

impl<C: Connector> IdentityEngine<C> {
    pub fn new(connector: C, config: &EngineConfig) -> Self {
        Self::with_cache(ConnectionCache::from_config(connector, config))
    }

    pub fn with_cache(connections: ConnectionCache<C>) -> Self {
        Self {
            connections,
            symbols: TokenSymbolCache::new(),
        }
    }

    pub fn connections(&self) -> &ConnectionCache<C> {
        &self.connections
    }

    async fn handle(&self, endpoint: &str) -> Result<Arc<C::Handle>, ChainError> {
        self.connections.acquire(endpoint).await
    }

    /// One page of all identities on the chain.
    pub async fn get_identities(
        &self,
        endpoint: &str,
        page: i64,
        limit: i64,
    ) -> Result<Page<Identity>, ChainError> {
        let request = PageRequest::new(page, limit)?;
        let handle = self.handle(endpoint).await?;
        identities::list_identities(handle.as_ref(), request).await
    }

    /// One page of identities matching `query`.
    pub async fn search_identities(
        &self,
        endpoint: &str,
        query: &str,
        page: i64,
        limit: i64,
    ) -> Result<Page<Identity>, ChainError> {
        let request = PageRequest::new(page, limit)?;
        let query = SearchQuery::parse(query)?;
        let handle = self.handle(endpoint).await?;
        search::search_identities(handle.as_ref(), &query, request).await
    }

    /// Identity of `address` with judgements and balance.
    pub async fn get_identity(&self, endpoint: &str, address: &str) -> Result<Identity, ChainError> {
        let handle = self.handle(endpoint).await?;
        identities::get_identity(handle.as_ref(), &self.symbols, endpoint, address).await
    }

    pub async fn get_account_balance(
        &self,
        endpoint: &str,
        address: &str,
    ) -> Result<Balance, ChainError> {
        let handle = self.handle(endpoint).await?;
        identities::get_account_balance(handle.as_ref(), &self.symbols, endpoint, address).await
    }

    /// Every identity with judgements, without pagination.
    pub async fn get_complete_identities(&self, endpoint: &str) -> Result<Vec<Identity>, ChainError> {
        let handle = self.handle(endpoint).await?;
        identities::complete_identities(handle.as_ref()).await
    }

    pub async fn implements_identity_pallet(&self, endpoint: &str) -> Result<bool, ChainError> {
        let handle = self.handle(endpoint).await?;
        Ok(status::implements_identity_feature(handle.as_ref()))
    }

    /// Fails only when no connection can be made; a failing probe is `false`.
    pub async fn is_archive_node(&self, endpoint: &str) -> Result<bool, ChainError> {
        let handle = self.handle(endpoint).await?;
        Ok(status::is_archive_node(handle.as_ref()).await)
    }

    pub async fn get_chain_name(&self, endpoint: &str) -> Result<String, ChainError> {
        let handle = self.handle(endpoint).await?;
        status::chain_name(handle.as_ref()).await
    }

    pub async fn get_token_details(&self, endpoint: &str) -> Result<Token, ChainError> {
        let handle = self.handle(endpoint).await?;
        status::token_details(handle.as_ref()).await
    }

    pub async fn get_chain_status(&self, endpoint: &str) -> Result<ChainStatus, ChainError> {
        let handle = self.handle(endpoint).await?;
        status::chain_status(handle.as_ref()).await
    }

    /// Drop the cached connection of `endpoint`.
    pub async fn evict(&self, endpoint: &str) -> bool {
        self.connections.evict(endpoint).await
    }

    pub async fn cached_endpoints(&self) -> Vec<String> {
        self.connections.cached_endpoints().await
    }

    /// Empty both caches.
    pub async fn clear(&self) {
        self.connections.clear().await;
        self.symbols.clear().await;
    }
}
