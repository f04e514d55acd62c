//! Well-known endpoints for identity queries.
//!
//! Since the Polkadot 2.0 migration identity data lives on the People chain
//! of each network, not on the relay chain.

use idscope_core::Network;

/// Get the People chain RPC endpoints for a network.
pub fn get_people_chain_endpoints(network: Network) -> &'static [&'static str] {
    match network {
        Network::Polkadot => &[
            "wss://polkadot-people-rpc.polkadot.io",
            "wss://sys.ibp.network/people-polkadot",
            "wss://people-polkadot.dotters.network",
            "wss://rpc-people-polkadot.luckyfriday.io",
        ],
        Network::Kusama => &[
            "wss://kusama-people-rpc.polkadot.io",
            "wss://sys.ibp.network/people-kusama",
            "wss://people-kusama.dotters.network",
            "wss://rpc-people-kusama.luckyfriday.io",
        ],
        Network::Westend => &[
            "wss://westend-people-rpc.polkadot.io",
            "wss://sys.ibp.network/people-westend",
            "wss://people-westend.dotters.network",
        ],
        Network::Paseo => &[
            "wss://sys.ibp.network/people-paseo",
            "wss://people-paseo.dotters.network",
        ],
    }
}

/// Pick the endpoint to query.
///
/// An explicit endpoint wins; otherwise the first People chain endpoint of
/// `network` is used.
pub fn resolve_endpoint(endpoint: Option<&str>, network: Network) -> String {
    match endpoint.map(str::trim) {
        Some(endpoint) if !endpoint.is_empty() => endpoint.to_string(),
        _ => get_people_chain_endpoints(network)[0].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_network_has_endpoints() {
        for network in Network::all() {
            let endpoints = get_people_chain_endpoints(*network);
            assert!(!endpoints.is_empty());
            assert!(endpoints.iter().all(|e| e.starts_with("wss://")));
        }
    }

    #[test]
    fn test_resolve_endpoint() {
        assert_eq!(
            resolve_endpoint(Some("ws://127.0.0.1:9944"), Network::Polkadot),
            "ws://127.0.0.1:9944"
        );
        assert_eq!(
            resolve_endpoint(None, Network::Kusama),
            "wss://kusama-people-rpc.polkadot.io"
        );
        assert_eq!(
            resolve_endpoint(Some("  "), Network::Westend),
            "wss://westend-people-rpc.polkadot.io"
        );
    }
}
