//! Search over the fake node: field matching, index lookups, ranking.

mod common;

use common::{FAKE_ADDRESS, FAKE_ENDPOINT, FakeChain, FakeConnector, registration_named};
use idscope_chain::{ChainError, IdentityEngine};
use idscope_core::EngineConfig;

fn engine(chain: FakeChain) -> IdentityEngine<FakeConnector> {
    common::init_logging();
    IdentityEngine::new(FakeConnector::new(chain), &EngineConfig::default())
}

fn addresses(page: &idscope_core::Page<idscope_core::Identity>) -> Vec<&str> {
    page.items
        .iter()
        .map(|identity| identity.basic_info.address.as_str())
        .collect()
}

#[tokio::test]
async fn empty_query_lists_everything() {
    let engine = engine(FakeChain::single());
    for query in ["", "   "] {
        let page = engine
            .search_identities(FAKE_ENDPOINT, query, 1, 10)
            .await
            .unwrap();
        assert_eq!(page.total_items_count, 1);
        assert_eq!(page.items[0].basic_info.display.as_deref(), Some("fake-name"));
    }
}

#[tokio::test]
async fn substring_matches_with_fields_intact() {
    let engine = engine(FakeChain::single());
    let page = engine
        .search_identities(FAKE_ENDPOINT, "ake-nam", 1, 10)
        .await
        .unwrap();

    assert_eq!(page.total_items_count, 1);
    let identity = &page.items[0];
    assert_eq!(identity.chain.as_deref(), Some("Fake Chain"));
    assert_eq!(identity.basic_info.address, FAKE_ADDRESS);
    assert_eq!(identity.basic_info.display.as_deref(), Some("fake-name"));
    assert_eq!(identity.basic_info.email.as_deref(), Some("fake-email"));
    assert_eq!(identity.basic_info.twitter.as_deref(), Some("fake-twitter"));
    assert_eq!(identity.basic_info.web.as_deref(), Some("fake-web"));
}

#[tokio::test]
async fn no_match_is_not_an_error() {
    let engine = engine(FakeChain::single());
    let page = engine
        .search_identities(FAKE_ENDPOINT, "faky-nam", 1, 10)
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_items_count, 0);
    assert_eq!(page.total_page_count, 0);
}

#[tokio::test]
async fn special_characters_fail_before_connecting() {
    let engine = engine(FakeChain::single());
    let err = engine
        .search_identities(FAKE_ENDPOINT, "*?", 1, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, ChainError::InvalidQuery(_)));
    assert_eq!(
        err.to_string(),
        "Your search key may contain special characters. Please try escaping them for search. e.g., /*"
    );
    assert_eq!(engine.connections().connector().connects(), 0);
}

#[tokio::test]
async fn invalid_pagination_wins_over_query() {
    let engine = engine(FakeChain::single());
    let err = engine
        .search_identities(FAKE_ENDPOINT, "*?", 0, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, ChainError::InvalidArgument(_)));
}

#[tokio::test]
async fn ranking_prefers_matching_sort_key() {
    let chain = FakeChain::default()
        .with_identity("addr-1", {
            let mut registration = registration_named(Some("Alice"), None);
            registration.info.email = idscope_core::RawData::raw("bob@example.org");
            registration
        })
        .with_identity("addr-2", registration_named(Some("Zed Bob"), None))
        .with_identity("addr-3", registration_named(Some("bobby"), None))
        .with_identity("addr-4", registration_named(Some("Carol"), None))
        .with_identity("addr-5", registration_named(Some("x"), Some("Bob Legal")));
    let engine = engine(chain);

    let page = engine
        .search_identities(FAKE_ENDPOINT, "bob", 1, 10)
        .await
        .unwrap();
    assert_eq!(addresses(&page), vec!["addr-5", "addr-3", "addr-2", "addr-1"]);
}

#[tokio::test]
async fn index_hit_comes_first() {
    let mut chain = FakeChain::default()
        .with_identity("addr-1", registration_named(Some("user 42"), None))
        .with_identity("indexed", registration_named(Some("Indexed"), None));
    chain.indices.insert(42, "indexed".into());
    let engine = engine(chain);

    let page = engine
        .search_identities(FAKE_ENDPOINT, "42", 1, 10)
        .await
        .unwrap();
    assert_eq!(addresses(&page), vec!["indexed", "addr-1"]);
}

#[tokio::test]
async fn index_without_identity_adds_nothing() {
    let mut chain = FakeChain::single();
    chain.indices.insert(7, "no-identity".into());
    let engine = engine(chain);

    let page = engine
        .search_identities(FAKE_ENDPOINT, "7", 1, 10)
        .await
        .unwrap();
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn index_failure_is_swallowed() {
    let chain = FakeChain {
        fail_indices: true,
        ..FakeChain::default()
    }
    .with_identity("addr-1", registration_named(Some("node 12"), None));
    let engine = engine(chain);

    let page = engine
        .search_identities(FAKE_ENDPOINT, "12", 1, 10)
        .await
        .unwrap();
    assert_eq!(addresses(&page), vec!["addr-1"]);
}

#[tokio::test]
async fn field_failure_fails_the_search() {
    let mut chain = FakeChain {
        fail_enumeration: true,
        ..FakeChain::single()
    };
    chain.indices.insert(1, FAKE_ADDRESS.into());
    let engine = engine(chain);

    let err = engine
        .search_identities(FAKE_ENDPOINT, "1", 1, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, ChainError::Fetch { .. }));
}

#[tokio::test]
async fn search_results_are_paginated() {
    let mut chain = FakeChain::default();
    for i in 0..5 {
        chain = chain.with_identity(
            &format!("addr-{}", i),
            registration_named(Some(&format!("validator-{}", i)), None),
        );
    }
    let engine = engine(chain);

    let page = engine
        .search_identities(FAKE_ENDPOINT, "validator", 2, 2)
        .await
        .unwrap();
    assert_eq!(addresses(&page), vec!["addr-2", "addr-3"]);
    assert_eq!(page.total_items_count, 5);
    assert_eq!(page.total_page_count, 3);
    assert_eq!(page.previous, Some(1));
    assert_eq!(page.next, Some(3));
}

#[tokio::test]
async fn chain_name_failure_fails_the_search() {
    let engine = engine(FakeChain {
        fail_chain_name: true,
        ..FakeChain::single()
    });

    let err = engine
        .search_identities(FAKE_ENDPOINT, "fake", 1, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, ChainError::Fetch { .. }));
    assert!(
        err.to_string()
            .starts_with("Something went wrong while fetching identities: ")
    );
}
