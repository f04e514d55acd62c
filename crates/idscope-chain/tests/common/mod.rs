//! In-memory node used by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use idscope_chain::{
    AccountBalance, BlockHash, ChainError, ChainHandle, ChainProperties, Connector,
};
use idscope_core::{
    RawData, RawIdentityEntry, RawIdentityInfo, RawJudgement, RawRegistration, RawSubIdentity,
};

pub const FAKE_ADDRESS: &str = "fake-address";
pub const FAKE_ENDPOINT: &str = "ws://fake-node:9944";

/// Install a test log subscriber once; `RUST_LOG` controls output.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn fake_registration(display: &str) -> RawRegistration {
    RawRegistration {
        info: RawIdentityInfo {
            display: RawData::raw(display),
            legal: RawData::raw("fake-legal"),
            web: RawData::raw("fake-web"),
            riot: RawData::raw("fake-riot"),
            email: RawData::raw("fake-email"),
            twitter: RawData::raw("fake-twitter"),
        },
        judgements: vec![
            (0, RawJudgement::Label("Reasonable".into())),
            (
                1,
                RawJudgement::Variant {
                    name: "Known Good".into(),
                    value: None,
                },
            ),
        ],
    }
}

pub fn registration_named(display: Option<&str>, legal: Option<&str>) -> RawRegistration {
    RawRegistration {
        info: RawIdentityInfo {
            display: display.map(RawData::raw).unwrap_or_default(),
            legal: legal.map(RawData::raw).unwrap_or_default(),
            ..Default::default()
        },
        judgements: Vec::new(),
    }
}

/// What the fake node stores and how it misbehaves.
#[derive(Debug, Clone)]
pub struct FakeChain {
    pub name: String,
    pub properties: Option<ChainProperties>,
    pub decimals: u32,
    pub identity_feature: bool,
    pub archive: bool,
    /// Block one is not known to the node.
    pub missing_block_one: bool,
    pub fail_block_hash: bool,
    pub fail_chain_name: bool,
    pub fail_properties: bool,
    pub fail_balances: bool,
    pub fail_enumeration: bool,
    pub fail_indices: bool,
    pub identities: Vec<(String, RawRegistration)>,
    pub subs: HashMap<String, RawSubIdentity>,
    pub indices: HashMap<u32, String>,
    pub balances: HashMap<String, AccountBalance>,
}

impl Default for FakeChain {
    fn default() -> Self {
        Self {
            name: "Fake Chain".into(),
            properties: Some(ChainProperties {
                token_symbol: vec!["FAKE".into()],
                token_decimals: vec![12],
                ss58_format: Some(42),
            }),
            decimals: 12,
            identity_feature: true,
            archive: true,
            missing_block_one: false,
            fail_block_hash: false,
            fail_chain_name: false,
            fail_properties: false,
            fail_balances: false,
            fail_enumeration: false,
            fail_indices: false,
            identities: Vec::new(),
            subs: HashMap::new(),
            indices: HashMap::new(),
            balances: HashMap::new(),
        }
    }
}

impl FakeChain {
    /// One identity at `fake-address` with a known balance.
    pub fn single() -> Self {
        let mut chain = Self::default();
        chain
            .identities
            .push((FAKE_ADDRESS.into(), fake_registration("fake-name")));
        chain.balances.insert(
            FAKE_ADDRESS.into(),
            AccountBalance {
                free: 0x67a20c15be6a,
                reserved: 0x11d9b07d3c,
            },
        );
        chain
    }

    pub fn with_identity(mut self, address: &str, registration: RawRegistration) -> Self {
        self.identities.push((address.into(), registration));
        self
    }
}

/// Counters shared by all handles of one connector.
#[derive(Debug, Default)]
pub struct Calls {
    pub connects: AtomicUsize,
    pub properties: AtomicUsize,
    pub enumerations: AtomicUsize,
}

pub struct FakeHandle {
    chain: Arc<FakeChain>,
    calls: Arc<Calls>,
    alive: Arc<AtomicBool>,
}

#[async_trait]
impl ChainHandle for FakeHandle {
    async fn is_connected(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    async fn chain_name(&self) -> Result<String, ChainError> {
        if self.chain.fail_chain_name {
            return Err(ChainError::Rpc("system_chain timed out".into()));
        }
        Ok(self.chain.name.clone())
    }

    async fn chain_properties(&self) -> Result<Option<ChainProperties>, ChainError> {
        self.calls.properties.fetch_add(1, Ordering::SeqCst);
        if self.chain.fail_properties {
            return Err(ChainError::Rpc("system_properties timed out".into()));
        }
        Ok(self.chain.properties.clone())
    }

    async fn block_hash(&self, number: u32) -> Result<Option<BlockHash>, ChainError> {
        if self.chain.fail_block_hash {
            return Err(ChainError::Rpc("chain_getBlockHash timed out".into()));
        }
        if self.chain.missing_block_one && number == 1 {
            return Ok(None);
        }
        Ok(Some([number as u8; 32]))
    }

    async fn state_at(&self, _hash: BlockHash) -> Result<(), ChainError> {
        if self.chain.archive {
            Ok(())
        } else {
            Err(ChainError::Storage("State already discarded".into()))
        }
    }

    fn has_identity_feature(&self) -> bool {
        self.chain.identity_feature
    }

    async fn enumerate_identities(&self) -> Result<Vec<RawIdentityEntry>, ChainError> {
        self.calls.enumerations.fetch_add(1, Ordering::SeqCst);
        if self.chain.fail_enumeration || !self.chain.identity_feature {
            return Err(ChainError::Rpc("storage entry not found".into()));
        }
        Ok(self
            .chain
            .identities
            .iter()
            .map(|(address, registration)| RawIdentityEntry {
                key: vec![address.clone()],
                registration: registration.clone(),
            })
            .collect())
    }

    async fn identity_of(&self, address: &str) -> Result<Option<RawRegistration>, ChainError> {
        Ok(self
            .chain
            .identities
            .iter()
            .find(|(a, _)| a == address)
            .map(|(_, registration)| registration.clone()))
    }

    async fn super_of(&self, address: &str) -> Result<Option<RawSubIdentity>, ChainError> {
        Ok(self.chain.subs.get(address).cloned())
    }

    async fn index_to_address(&self, index: u32) -> Result<Option<String>, ChainError> {
        if self.chain.fail_indices {
            return Err(ChainError::Rpc("indices unavailable".into()));
        }
        Ok(self.chain.indices.get(&index).cloned())
    }

    async fn balance_of(&self, address: &str) -> Result<Option<AccountBalance>, ChainError> {
        if self.chain.fail_balances {
            return Err(ChainError::Storage("System.Account unavailable".into()));
        }
        Ok(self.chain.balances.get(address).copied())
    }

    fn registry_decimals(&self) -> u32 {
        self.chain.decimals
    }
}

/// Hands out [`FakeHandle`]s over per-endpoint chains.
#[derive(Default)]
pub struct FakeConnector {
    chains: HashMap<String, Arc<FakeChain>>,
    pub calls: Arc<Calls>,
    handles: Mutex<Vec<Arc<AtomicBool>>>,
}

impl FakeConnector {
    pub fn new(chain: FakeChain) -> Self {
        Self::default().with_chain(FAKE_ENDPOINT, chain)
    }

    pub fn with_chain(mut self, endpoint: &str, chain: FakeChain) -> Self {
        self.chains.insert(endpoint.into(), Arc::new(chain));
        self
    }

    pub fn connects(&self) -> usize {
        self.calls.connects.load(Ordering::SeqCst)
    }

    /// Mark every handle handed out so far as disconnected.
    pub fn drop_connections(&self) {
        for alive in self.handles.lock().unwrap().iter() {
            alive.store(false, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl Connector for FakeConnector {
    type Handle = FakeHandle;

    async fn connect(&self, endpoint: &str) -> Result<FakeHandle, ChainError> {
        let chain = self
            .chains
            .get(endpoint)
            .cloned()
            .ok_or_else(|| ChainError::Connection(format!("{}: unreachable", endpoint)))?;

        self.calls.connects.fetch_add(1, Ordering::SeqCst);
        let alive = Arc::new(AtomicBool::new(true));
        self.handles.lock().unwrap().push(Arc::clone(&alive));

        Ok(FakeHandle {
            chain,
            calls: Arc::clone(&self.calls),
            alive,
        })
    }
}
