//! Account-related chain queries.

use subxt::dynamic::{At, DecodedValueThunk, Value};

use super::extract_account_bytes;
use crate::client::SubxtHandle;
use crate::error::ChainError;
use crate::handle::AccountBalance;
use crate::ss58::parse_address;

const INDICES_PALLET: &str = "Indices";

impl SubxtHandle {
    /// Get free and reserved balance of an account.
    ///
    /// An account that was never funded has no storage entry; it reads as a
    /// zero balance, the same as the runtime's default `AccountInfo`.
    pub(crate) async fn fetch_account_balance(
        &self,
        address: &str,
    ) -> Result<Option<AccountBalance>, ChainError> {
        let Some(account) = parse_address(address) else {
            tracing::debug!("Not an SS58 address: {}", address);
            return Ok(None);
        };

        let storage_query = subxt::dynamic::storage(
            "System",
            "Account",
            vec![Value::from_bytes(account.0)],
        );

        let result: Option<DecodedValueThunk> = self
            .client()
            .storage()
            .at_latest()
            .await?
            .fetch(&storage_query)
            .await?;

        let Some(value) = result else {
            return Ok(Some(AccountBalance::default()));
        };

        Ok(decode_account_balance(&value.to_value()?))
    }

    /// Resolve an account index to the SS58 address it is bound to.
    pub(crate) async fn fetch_index_account(&self, index: u32) -> Result<Option<String>, ChainError> {
        if !self.has_pallet(INDICES_PALLET) {
            return Ok(None);
        }

        let storage_query = subxt::dynamic::storage(
            INDICES_PALLET,
            "Accounts",
            vec![Value::u128(index as u128)],
        );

        let result: Option<DecodedValueThunk> = self
            .client()
            .storage()
            .at_latest()
            .await?
            .fetch(&storage_query)
            .await?;

        let Some(value) = result else {
            return Ok(None);
        };

        // Accounts = (AccountId, Balance, bool)
        let decoded = value.to_value()?;
        Ok(extract_account_bytes(decoded.at(0)).map(|account| self.encode_address(&account)))
    }
}

/// Decode an `AccountInfo` value.
///
/// AccountInfo = { nonce, consumers, providers, sufficients, data: AccountData }
/// AccountData = { free, reserved, frozen, flags }
///
/// Returns `None` when there is no free balance to read.
pub fn decode_account_balance<T>(value: &Value<T>) -> Option<AccountBalance> {
    let data = value.at("data")?;
    let free = data.at("free")?.as_u128()?;
    let reserved = data
        .at("reserved")
        .and_then(|v: &Value<T>| v.as_u128())
        .unwrap_or(0);

    Some(AccountBalance { free, reserved })
}
