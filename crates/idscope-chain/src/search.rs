//! Identity search over two concurrent strategies.
//!
//! The index strategy resolves a numeric query as an account index. The
//! field strategy matches the pattern against every identity. Both run at
//! once; an index hit goes first, followed by the ranked field matches.

use futures::future::try_join;
use idscope_core::{BasicIdentityInfo, Identity, Page, PageRequest, SearchPattern, SearchQuery};

use crate::error::ChainError;
use crate::handle::ChainHandle;
use crate::identities::{
    FETCH_IDENTITIES_FAILED, basic_identities, list_identities, resolve_identity,
};

/// Search identities and return one page of results.
///
/// A failing field strategy fails the whole search. The index strategy only
/// ever contributes a result or nothing.
pub async fn search_identities<H>(
    handle: &H,
    query: &SearchQuery,
    request: PageRequest,
) -> Result<Page<Identity>, ChainError>
where
    H: ChainHandle + ?Sized,
{
    let (index, pattern) = match query {
        SearchQuery::All => return list_identities(handle, request).await,
        SearchQuery::Filter { index, pattern } => (*index, pattern),
    };

    let chain = handle
        .chain_name()
        .await
        .map_err(|e| e.context(FETCH_IDENTITIES_FAILED))?;
    let (by_index, by_field) =
        try_join(search_by_index(handle, index), search_by_field(handle, pattern)).await?;

    let results = by_index
        .into_iter()
        .chain(by_field)
        .map(|info| Identity::listed(chain.clone(), info))
        .collect();
    Ok(request.apply(results))
}

async fn search_by_index<H>(
    handle: &H,
    index: Option<u32>,
) -> Result<Option<BasicIdentityInfo>, ChainError>
where
    H: ChainHandle + ?Sized,
{
    let Some(index) = index else {
        return Ok(None);
    };

    match lookup_index(handle, index).await {
        Ok(found) => Ok(found),
        Err(e) => {
            tracing::debug!("Index lookup of {} failed: {}", index, e);
            Ok(None)
        }
    }
}

async fn lookup_index<H>(
    handle: &H,
    index: u32,
) -> Result<Option<BasicIdentityInfo>, ChainError>
where
    H: ChainHandle + ?Sized,
{
    let Some(address) = handle.index_to_address(index).await? else {
        tracing::debug!("No account bound to index {}", index);
        return Ok(None);
    };
    Ok(resolve_identity(handle, &address)
        .await?
        .map(|(info, _)| info))
}

async fn search_by_field<H>(
    handle: &H,
    pattern: &SearchPattern,
) -> Result<Vec<BasicIdentityInfo>, ChainError>
where
    H: ChainHandle + ?Sized,
{
    let identities = basic_identities(handle).await?;
    Ok(pattern.filter_and_rank(identities))
}
