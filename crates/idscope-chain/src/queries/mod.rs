//! Chain query implementations.

pub mod account;
pub mod identity;

use subxt::dynamic::Value;
use subxt::ext::scale_value::{Composite, ValueDef};

/// Extract bytes from a byte-array value, looking through single-field
/// wrappers such as `AccountId32([u8; 32])`.
pub(crate) fn extract_bytes<T>(value: &Value<T>) -> Option<Vec<u8>> {
    match &value.value {
        ValueDef::Composite(composite) => composite_bytes(composite),
        _ => None,
    }
}

pub(crate) fn composite_bytes<T>(composite: &Composite<T>) -> Option<Vec<u8>> {
    let values: Vec<&Value<T>> = composite.values().collect();
    if let [single] = values.as_slice()
        && !matches!(single.value, ValueDef::Primitive(_))
    {
        return extract_bytes(single);
    }

    values
        .into_iter()
        .map(|v| v.as_u128().and_then(|b| u8::try_from(b).ok()))
        .collect()
}

/// Extract a 32 byte account id from a value.
pub(crate) fn extract_account_bytes<T>(value: Option<&Value<T>>) -> Option<[u8; 32]> {
    extract_bytes(value?)?.try_into().ok()
}
