//! Node access for identity queries.
//!
//! [`IdentityEngine`] is the entry point. It caches one connection per
//! endpoint and answers listing, search, lookup and introspection requests
//! through the [`ChainHandle`] capability trait, implemented over subxt by
//! [`SubxtHandle`].

pub mod cache;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod handle;
pub mod identities;
pub mod queries;
pub mod search;
pub mod ss58;
pub mod status;

pub use cache::{ConnectionCache, Eviction, TokenSymbolCache};
pub use client::{SubxtConnector, SubxtHandle};
pub use config::*;
pub use engine::IdentityEngine;
pub use error::*;
pub use handle::{AccountBalance, BlockHash, ChainHandle, ChainProperties, Connector};
pub use queries::account::decode_account_balance;
pub use queries::identity::{decode_data, decode_judgements, decode_registration, decode_super_of};
