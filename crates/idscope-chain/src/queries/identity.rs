//! Identity queries and decoding of identity pallet storage.

use idscope_core::{
    HashKind, RawData, RawIdentityEntry, RawIdentityInfo, RawJudgement, RawJudgementPair,
    RawRegistration, RawSubIdentity,
};
use subxt::dynamic::{At, DecodedValueThunk, Value};
use subxt::ext::scale_value::ValueDef;

use super::{composite_bytes, extract_account_bytes};
use crate::client::SubxtHandle;
use crate::error::ChainError;
use crate::ss58::{account_from_key, parse_address};

pub(crate) const IDENTITY_PALLET: &str = "Identity";

impl SubxtHandle {
    /// Iterate `Identity.IdentityOf` and decode every registration.
    pub(crate) async fn fetch_identity_entries(&self) -> Result<Vec<RawIdentityEntry>, ChainError> {
        let storage_query = subxt::dynamic::storage(IDENTITY_PALLET, "IdentityOf", ());

        let mut entries = Vec::new();
        let mut iter = self
            .client()
            .storage()
            .at_latest()
            .await?
            .iter(storage_query)
            .await?;

        while let Some(result) = iter.next().await {
            let kv = result?;
            let Some(account) = account_from_key(&kv.key_bytes) else {
                tracing::debug!("Skipping identity entry with short key");
                continue;
            };
            let value: DecodedValueThunk = kv.value;
            let decoded = value.to_value()?;

            match decode_registration(&decoded) {
                Some(registration) => entries.push(RawIdentityEntry {
                    key: vec![self.encode_address(&account)],
                    registration,
                }),
                None => tracing::debug!(
                    "Skipping undecodable identity of {}",
                    self.encode_address(&account)
                ),
            }
        }

        tracing::debug!("Fetched {} identity entries", entries.len());
        Ok(entries)
    }

    /// Fetch the registration of a single account.
    pub(crate) async fn fetch_identity_of(
        &self,
        address: &str,
    ) -> Result<Option<RawRegistration>, ChainError> {
        if !self.has_pallet(IDENTITY_PALLET) {
            return Ok(None);
        }
        let Some(account) = parse_address(address) else {
            tracing::debug!("Not an SS58 address: {}", address);
            return Ok(None);
        };

        let storage_query = subxt::dynamic::storage(
            IDENTITY_PALLET,
            "IdentityOf",
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
            return Ok(None);
        };

        Ok(decode_registration(&value.to_value()?))
    }

    /// Fetch the parent account and sub name of a sub-account.
    pub(crate) async fn fetch_super_of(
        &self,
        address: &str,
    ) -> Result<Option<RawSubIdentity>, ChainError> {
        if !self.has_pallet(IDENTITY_PALLET) {
            return Ok(None);
        }
        let Some(account) = parse_address(address) else {
            return Ok(None);
        };

        let storage_query = subxt::dynamic::storage(
            IDENTITY_PALLET,
            "SuperOf",
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
            return Ok(None);
        };

        let decoded = value.to_value()?;
        Ok(decode_super_of(&decoded).map(|(parent, name)| RawSubIdentity {
            parent: self.encode_address(&parent),
            name,
        }))
    }
}

/// Decode an `IdentityOf` value.
///
/// Newer runtimes store `(Registration, Option<Username>)`, older ones the
/// bare `Registration { judgements, deposit, info }`. People chains call the
/// `riot` field `matrix`.
pub fn decode_registration<T>(value: &Value<T>) -> Option<RawRegistration> {
    let registration = if value.at("info").is_some() {
        value
    } else {
        value.at(0)?
    };
    let info = registration.at("info")?;
    let field = |name: &str| info.at(name).map(decode_data).unwrap_or_default();

    Some(RawRegistration {
        info: RawIdentityInfo {
            display: field("display"),
            legal: field("legal"),
            web: field("web"),
            riot: match field("riot") {
                RawData::None => field("matrix"),
                riot => riot,
            },
            email: field("email"),
            twitter: field("twitter"),
        },
        judgements: registration
            .at("judgements")
            .map(decode_judgements)
            .unwrap_or_default(),
    })
}

/// Decode a `Data` enum value.
pub fn decode_data<T>(value: &Value<T>) -> RawData {
    let ValueDef::Variant(variant) = &value.value else {
        return super::extract_bytes(value)
            .map(RawData::Raw)
            .unwrap_or_default();
    };

    let name = variant.name.as_str();
    if let Some(kind) = HashKind::from_variant(name) {
        return composite_bytes(&variant.values)
            .and_then(|bytes| <[u8; 32]>::try_from(bytes).ok())
            .map(|hash| RawData::Hashed(kind, hash))
            .unwrap_or_default();
    }
    if name.starts_with("Raw") {
        return RawData::Raw(composite_bytes(&variant.values).unwrap_or_default());
    }
    RawData::None
}

/// Decode the `(RegistrarIndex, Judgement)` list of a registration.
pub fn decode_judgements<T>(value: &Value<T>) -> Vec<RawJudgementPair> {
    let ValueDef::Composite(pairs) = &value.value else {
        return Vec::new();
    };
    pairs.values().filter_map(decode_judgement_pair).collect()
}

fn decode_judgement_pair<T>(pair: &Value<T>) -> Option<RawJudgementPair> {
    let registrar = pair.at(0)?.as_u128().and_then(|i| u32::try_from(i).ok())?;
    let judgement = pair.at(1)?;

    let judgement = match &judgement.value {
        ValueDef::Variant(variant) if variant.values.values().next().is_none() => {
            RawJudgement::Label(variant.name.clone())
        }
        ValueDef::Variant(variant) => RawJudgement::Variant {
            name: variant.name.clone(),
            value: variant.values.values().next().and_then(|v| v.as_u128()),
        },
        _ => RawJudgement::Label(judgement.as_str()?.to_string()),
    };
    Some((registrar, judgement))
}

/// Decode a `SuperOf` value: `(parent_account, sub_name)`.
pub fn decode_super_of<T>(value: &Value<T>) -> Option<([u8; 32], RawData)> {
    let parent = extract_account_bytes(value.at(0))?;
    let name = value.at(1).map(decode_data).unwrap_or_default();
    Some((parent, name))
}
