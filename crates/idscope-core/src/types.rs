//! Core domain types for identity queries.

use serde::{Deserialize, Serialize};

/// Raw on-chain balance in the chain's smallest unit.
pub type RawBalance = u128;

/// Well-known networks with public People chain endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    Polkadot,
    Kusama,
    Westend,
    Paseo,
}

impl Network {
    /// Returns all known networks.
    pub fn all() -> &'static [Network] {
        &[
            Network::Polkadot,
            Network::Kusama,
            Network::Westend,
            Network::Paseo,
        ]
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Polkadot => write!(f, "Polkadot"),
            Network::Kusama => write!(f, "Kusama"),
            Network::Westend => write!(f, "Westend"),
            Network::Paseo => write!(f, "Paseo"),
        }
    }
}

impl std::str::FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "polkadot" | "dot" => Ok(Network::Polkadot),
            "kusama" | "ksm" => Ok(Network::Kusama),
            "westend" | "wnd" => Ok(Network::Westend),
            "paseo" | "pas" => Ok(Network::Paseo),
            _ => Err(format!(
                "Unknown network '{}'. Valid options: polkadot, kusama, westend, paseo",
                s
            )),
        }
    }
}

/// The self-declared profile of an account.
///
/// Every text field is `None` when the chain holds no value for it. The
/// address is always set, but may be empty if the storage key carried none.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicIdentityInfo {
    pub display: Option<String>,
    pub address: String,
    pub riot: Option<String>,
    pub twitter: Option<String>,
    pub web: Option<String>,
    pub legal: Option<String>,
    pub email: Option<String>,
}

impl BasicIdentityInfo {
    /// Creates an identity with only an address.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Populated fields in search priority order: display, email, legal,
    /// riot, twitter, web, then address.
    pub fn searchable_fields(&self) -> impl Iterator<Item = &str> {
        [
            self.display.as_deref(),
            self.email.as_deref(),
            self.legal.as_deref(),
            self.riot.as_deref(),
            self.twitter.as_deref(),
            self.web.as_deref(),
            Some(self.address.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|field| !field.is_empty())
    }

    /// Case-folded key used to order search results: legal name, else
    /// display name, else address.
    pub fn sort_key(&self) -> String {
        self.legal
            .as_deref()
            .or(self.display.as_deref())
            .unwrap_or(&self.address)
            .to_lowercase()
    }
}

/// Token balance of an account in human units.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Balance {
    /// Free plus reserved balance with exactly two fractional digits.
    pub total: String,
    /// Token ticker. Empty when the chain exposes no token properties.
    pub symbol: String,
}

/// An identity record as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Chain name. Set for listing, search and single lookups; left out of
    /// bulk results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
    pub basic_info: BasicIdentityInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub judgements: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Balance>,
}

impl Identity {
    /// Identity as shown in listings and search results.
    pub fn listed(chain: impl Into<String>, basic_info: BasicIdentityInfo) -> Self {
        Self {
            chain: Some(chain.into()),
            basic_info,
            judgements: None,
            balance: None,
        }
    }

    /// Identity as returned in bulk mode: judgements, no chain context.
    pub fn judged(basic_info: BasicIdentityInfo, judgements: Vec<String>) -> Self {
        Self {
            chain: None,
            basic_info,
            judgements: Some(judgements),
            balance: None,
        }
    }
}

/// Native token metadata of a chain.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Token {
    pub symbol: String,
    pub decimals: u32,
}

/// Read-only snapshot of what a chain endpoint offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainStatus {
    pub implements_identity_pallet: bool,
    pub is_archive_node: bool,
    pub chain_name: String,
    pub token: Token,
}

/// One page of an ordered result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items_count: usize,
    pub total_page_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<usize>,
}
