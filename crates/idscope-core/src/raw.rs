//! Identity payloads as they come off the chain, before normalization.
//!
//! The identity pallet stores each text field as a `Data` enum: either
//! nothing, up to 32 raw bytes, or a 32 byte hash of content kept
//! elsewhere. These types keep that shape so the normalizer can decide how
//! to present each field.

/// Hash function used by a hashed `Data` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashKind {
    BlakeTwo256,
    Sha256,
    Keccak256,
    ShaThree256,
}

impl HashKind {
    pub fn from_variant(name: &str) -> Option<Self> {
        match name {
            "BlakeTwo256" => Some(HashKind::BlakeTwo256),
            "Sha256" => Some(HashKind::Sha256),
            "Keccak256" => Some(HashKind::Keccak256),
            "ShaThree256" => Some(HashKind::ShaThree256),
            _ => None,
        }
    }
}

/// A single identity field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RawData {
    #[default]
    None,
    Raw(Vec<u8>),
    Hashed(HashKind, [u8; 32]),
}

impl RawData {
    pub fn raw(bytes: impl Into<Vec<u8>>) -> Self {
        RawData::Raw(bytes.into())
    }

    /// Bytes of a `Raw` field.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RawData::Raw(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Human-readable rendering of a `Raw` field.
    ///
    /// Printable UTF-8 comes back as text. Anything else is rendered as a
    /// `0x`-prefixed hex string. Hashed and empty fields have no rendering.
    pub fn to_human(&self) -> Option<String> {
        let bytes = self.as_bytes()?;
        let trimmed = trim_trailing_nulls(bytes);
        if trimmed.is_empty() {
            return None;
        }

        match std::str::from_utf8(trimmed) {
            Ok(text) if is_printable(text) => Some(text.to_string()),
            _ => Some(format!("0x{}", hex::encode(bytes))),
        }
    }
}

fn trim_trailing_nulls(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &bytes[..end]
}

fn is_printable(text: &str) -> bool {
    !text.chars().any(|c| c.is_control() && !c.is_whitespace())
}

/// The `info` part of an identity registration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawIdentityInfo {
    pub display: RawData,
    pub legal: RawData,
    pub web: RawData,
    pub riot: RawData,
    pub email: RawData,
    pub twitter: RawData,
}

/// Judgement given by a registrar.
///
/// Unit variants such as `Reasonable` arrive as plain labels. Variants
/// carrying data, like `FeePaid(balance)`, arrive labeled with their payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawJudgement {
    Label(String),
    Variant { name: String, value: Option<u128> },
}

impl RawJudgement {
    pub fn label(&self) -> &str {
        match self {
            RawJudgement::Label(label) => label,
            RawJudgement::Variant { name, .. } => name,
        }
    }
}

/// Registrar index paired with its judgement.
pub type RawJudgementPair = (u32, RawJudgement);

/// A full identity registration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRegistration {
    pub info: RawIdentityInfo,
    pub judgements: Vec<RawJudgementPair>,
}

/// One `(key, value)` entry from enumerating identity storage.
///
/// The key is the list of storage key components rendered as strings; for
/// identities its first element is the account address.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawIdentityEntry {
    pub key: Vec<String>,
    pub registration: RawRegistration,
}

/// Parent link of a sub-account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSubIdentity {
    pub parent: String,
    pub name: RawData,
}
