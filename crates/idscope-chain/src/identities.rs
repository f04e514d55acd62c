//! Listing, lookup and balance enrichment of identities.

use idscope_core::{
    Balance, BasicIdentityInfo, Identity, Page, PageRequest, RawIdentityEntry, decode_display,
    format_total, judgement_labels, normalize, normalize_registration, sub_identity_display,
};

use crate::cache::TokenSymbolCache;
use crate::error::ChainError;
use crate::handle::ChainHandle;

pub(crate) const FETCH_IDENTITIES_FAILED: &str = "Something went wrong while fetching identities";
const FETCH_IDENTITY_FAILED: &str = "Something went wrong while fetching the identity";
const FETCH_BALANCE_FAILED: &str = "Something went wrong while fetching the balance";

/// Enumerate raw identity entries, translating failures.
///
/// A failure on a chain without the identity pallet becomes
/// [`ChainError::UnsupportedChain`]; anything else is wrapped with context.
pub async fn enumerate_identities<H>(handle: &H) -> Result<Vec<RawIdentityEntry>, ChainError>
where
    H: ChainHandle + ?Sized,
{
    match handle.enumerate_identities().await {
        Ok(entries) => Ok(entries),
        Err(e) if !handle.has_identity_feature() => {
            tracing::debug!("Identity enumeration failed without identity pallet: {}", e);
            Err(ChainError::UnsupportedChain)
        }
        Err(e) => Err(e.context(FETCH_IDENTITIES_FAILED)),
    }
}

/// All identities, normalized, in storage order.
pub async fn basic_identities<H>(handle: &H) -> Result<Vec<BasicIdentityInfo>, ChainError>
where
    H: ChainHandle + ?Sized,
{
    let entries = enumerate_identities(handle).await?;
    Ok(entries.iter().map(normalize).collect())
}

/// One page of identities tagged with the chain name.
pub async fn list_identities<H>(
    handle: &H,
    request: PageRequest,
) -> Result<Page<Identity>, ChainError>
where
    H: ChainHandle + ?Sized,
{
    let chain = handle
        .chain_name()
        .await
        .map_err(|e| e.context(FETCH_IDENTITIES_FAILED))?;
    let identities = basic_identities(handle)
        .await?
        .into_iter()
        .map(|info| Identity::listed(chain.clone(), info))
        .collect();
    Ok(request.apply(identities))
}

/// Every identity with its judgements, without chain name or balance.
pub async fn complete_identities<H>(handle: &H) -> Result<Vec<Identity>, ChainError>
where
    H: ChainHandle + ?Sized,
{
    let entries = enumerate_identities(handle).await?;
    Ok(entries
        .iter()
        .map(|entry| Identity::judged(normalize(entry), judgement_labels(&entry.registration)))
        .collect())
}

/// Identity info and judgement labels of `address`.
///
/// A sub-account without an identity of its own takes its parent's, shown
/// as `parent/sub`. `None` when neither exists.
pub async fn resolve_identity<H>(
    handle: &H,
    address: &str,
) -> Result<Option<(BasicIdentityInfo, Vec<String>)>, ChainError>
where
    H: ChainHandle + ?Sized,
{
    if let Some(registration) = handle.identity_of(address).await? {
        return Ok(Some((
            normalize_registration(address.to_string(), &registration),
            judgement_labels(&registration),
        )));
    }

    let Some(sub) = handle.super_of(address).await? else {
        return Ok(None);
    };
    let Some(parent) = handle.identity_of(&sub.parent).await? else {
        tracing::debug!("Parent {} of {} has no identity", sub.parent, address);
        return Ok(None);
    };

    let mut info = normalize_registration(address.to_string(), &parent);
    info.display = sub_identity_display(info.display.as_deref(), decode_display(&sub.name).as_deref());
    Ok(Some((info, judgement_labels(&parent))))
}

/// Full identity of `address`: info, judgements, balance and chain name.
pub async fn get_identity<H>(
    handle: &H,
    symbols: &TokenSymbolCache,
    endpoint: &str,
    address: &str,
) -> Result<Identity, ChainError>
where
    H: ChainHandle + ?Sized,
{
    let (basic_info, judgements) = resolve_identity(handle, address)
        .await
        .map_err(|e| e.context(FETCH_IDENTITY_FAILED))?
        .ok_or_else(ChainError::identity_not_found)?;

    let balance = get_account_balance(handle, symbols, endpoint, address).await?;
    let chain = handle
        .chain_name()
        .await
        .map_err(|e| e.context(FETCH_IDENTITY_FAILED))?;

    Ok(Identity {
        chain: Some(chain),
        basic_info,
        judgements: Some(judgements),
        balance: Some(balance),
    })
}

/// Free plus reserved balance of `address` in human units.
pub async fn get_account_balance<H>(
    handle: &H,
    symbols: &TokenSymbolCache,
    endpoint: &str,
    address: &str,
) -> Result<Balance, ChainError>
where
    H: ChainHandle + ?Sized,
{
    let balance = handle
        .balance_of(address)
        .await
        .map_err(|e| e.context(FETCH_BALANCE_FAILED))?
        .ok_or_else(ChainError::balance_not_found)?;

    let decimals = handle.registry_decimals();
    let total = format_total(balance.free, balance.reserved, decimals).ok_or_else(|| {
        ChainError::InvalidData(format!("Balance of {} overflows", address))
    })?;
    let symbol = symbols
        .symbol_for(endpoint, handle)
        .await
        .map_err(|e| e.context(FETCH_BALANCE_FAILED))?;

    Ok(Balance { total, symbol })
}
