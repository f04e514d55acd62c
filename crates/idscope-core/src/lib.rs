//! Core domain logic for on-chain identity queries.
//!
//! This crate provides:
//! - Core domain types (`types` module)
//! - Raw identity payloads as decoded from a node (`raw` module)
//! - Normalization of raw payloads into identity records (`normalize` module)
//! - Pagination (`pagination` module)
//! - Search pattern matching and ranking (`search` module)
//! - Fixed-point amount formatting (`amount` module)
//! - Engine configuration (`config` module)
//!
//! Nothing in here talks to the network; the chain crate feeds these
//! modules with data fetched from a node.

pub mod amount;
pub mod config;
pub mod normalize;
pub mod pagination;
pub mod raw;
pub mod search;
pub mod types;

pub use amount::*;
pub use config::{ConfigError, EngineConfig};
pub use normalize::*;
pub use pagination::*;
pub use raw::*;
pub use search::*;
pub use types::*;
