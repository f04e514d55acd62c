//! Chain introspection.

use futures::future::{join, try_join};
use idscope_core::{ChainStatus, Token};

use crate::error::ChainError;
use crate::handle::ChainHandle;

/// Whether the chain exposes the identity pallet.
pub fn implements_identity_feature<H>(handle: &H) -> bool
where
    H: ChainHandle + ?Sized,
{
    handle.has_identity_feature()
}

/// Whether the node still serves state of block #1.
///
/// Never fails: any error means the node prunes history.
pub async fn is_archive_node<H>(handle: &H) -> bool
where
    H: ChainHandle + ?Sized,
{
    match probe_block_one(handle).await {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("Archive probe failed: {}", e);
            false
        }
    }
}

async fn probe_block_one<H>(handle: &H) -> Result<(), ChainError>
where
    H: ChainHandle + ?Sized,
{
    let hash = handle
        .block_hash(1)
        .await?
        .ok_or_else(|| ChainError::NotFound("Block #1 is unknown to the node".to_string()))?;
    handle.state_at(hash).await
}

pub async fn chain_name<H>(handle: &H) -> Result<String, ChainError>
where
    H: ChainHandle + ?Sized,
{
    handle.chain_name().await
}

/// Token symbol and decimals, read fresh from chain properties.
///
/// Falls back to an empty symbol and the registry decimals.
pub async fn token_details<H>(handle: &H) -> Result<Token, ChainError>
where
    H: ChainHandle + ?Sized,
{
    let properties = handle.chain_properties().await?;
    let symbol = properties
        .as_ref()
        .map(|props| props.primary_symbol())
        .unwrap_or_default();
    let decimals = properties
        .as_ref()
        .and_then(|props| props.token_decimals.first().copied())
        .unwrap_or_else(|| handle.registry_decimals());

    Ok(Token { symbol, decimals })
}

/// Everything the endpoint offers, in one snapshot.
pub async fn chain_status<H>(handle: &H) -> Result<ChainStatus, ChainError>
where
    H: ChainHandle + ?Sized,
{
    let (is_archive_node, metadata) = join(
        is_archive_node(handle),
        try_join(chain_name(handle), token_details(handle)),
    )
    .await;
    let (chain_name, token) = metadata?;

    Ok(ChainStatus {
        implements_identity_pallet: implements_identity_feature(handle),
        is_archive_node,
        chain_name,
        token,
    })
}
