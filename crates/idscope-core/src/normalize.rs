//! Conversion of raw identity payloads into [`BasicIdentityInfo`] records.

use crate::raw::{RawData, RawIdentityEntry, RawRegistration};
use crate::types::BasicIdentityInfo;

/// Normalize one enumerated identity entry.
///
/// The address is the first key component; an empty key gives an empty
/// address. Fields missing from the payload come back as `None`.
pub fn normalize(entry: &RawIdentityEntry) -> BasicIdentityInfo {
    let address = entry.key.first().cloned().unwrap_or_default();
    normalize_registration(address, &entry.registration)
}

/// Normalize a registration for a known address.
pub fn normalize_registration(address: String, registration: &RawRegistration) -> BasicIdentityInfo {
    let info = &registration.info;
    BasicIdentityInfo {
        display: decode_display(&info.display),
        address,
        riot: info.riot.to_human(),
        twitter: info.twitter.to_human(),
        web: info.web.to_human(),
        legal: info.legal.to_human(),
        email: info.email.to_human(),
    }
}

/// Decode a display name.
///
/// Some names are not printable as-is and render as `0x` hex. For those the
/// underlying bytes are decoded directly, with invalid sequences replaced.
pub fn decode_display(data: &RawData) -> Option<String> {
    let human = data.to_human()?;
    if !human.starts_with("0x") {
        return Some(human);
    }

    match data.as_bytes().map(decode_raw_bytes) {
        Some(text) if !text.is_empty() => Some(text),
        _ => Some(human),
    }
}

fn decode_raw_bytes(bytes: &[u8]) -> String {
    let filtered: Vec<u8> = bytes.iter().copied().filter(|&b| b != 0).collect();
    String::from_utf8_lossy(&filtered).into_owned()
}

/// Judgement labels in the order the chain reports them.
pub fn judgement_labels(registration: &RawRegistration) -> Vec<String> {
    registration
        .judgements
        .iter()
        .map(|(_, judgement)| judgement.label().to_string())
        .collect()
}

/// Display name of a sub-account: `parent/sub`, or whichever half exists.
pub fn sub_identity_display(parent: Option<&str>, sub: Option<&str>) -> Option<String> {
    match (parent, sub) {
        (Some(parent), Some(sub)) => Some(format!("{}/{}", parent, sub)),
        (Some(parent), None) => Some(parent.to_string()),
        (None, Some(sub)) => Some(sub.to_string()),
        (None, None) => None,
    }
}
