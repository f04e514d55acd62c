//! Per-endpoint caches owned by the engine.
//!
//! [`ConnectionCache`] keeps one ready handle per endpoint. Creation is
//! serialized per endpoint: concurrent callers for the same endpoint wait on
//! the endpoint's slot instead of opening a second connection.
//!
//! [`TokenSymbolCache`] remembers the token symbol of each endpoint for the
//! life of the cache.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use idscope_core::EngineConfig;
use lru::LruCache;
use tokio::sync::{Mutex, RwLock};

use crate::error::ChainError;
use crate::handle::{ChainHandle, Connector};

/// When a cached handle must be replaced even though it still answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Eviction {
    /// Keep handles until they disconnect or fall out of the LRU.
    #[default]
    Never,
    /// Replace handles older than this.
    MaxAge(Duration),
}

impl Eviction {
    fn is_expired(&self, created: Instant) -> bool {
        match self {
            Eviction::Never => false,
            Eviction::MaxAge(age) => created.elapsed() >= *age,
        }
    }
}

struct CachedHandle<H> {
    handle: Arc<H>,
    created: Instant,
}

/// Holds at most one handle. Its lock is held while connecting.
struct Slot<H> {
    entry: Mutex<Option<CachedHandle<H>>>,
}

impl<H> Slot<H> {
    fn empty() -> Self {
        Self {
            entry: Mutex::new(None),
        }
    }
}

/// Endpoint to live handle mapping with LRU bound.
pub struct ConnectionCache<C: Connector> {
    connector: C,
    eviction: Eviction,
    slots: Mutex<LruCache<String, Arc<Slot<C::Handle>>>>,
}

impl<C: Connector> ConnectionCache<C> {
    pub fn new(connector: C, capacity: NonZeroUsize, eviction: Eviction) -> Self {
        Self {
            connector,
            eviction,
            slots: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn from_config(connector: C, config: &EngineConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_connections).unwrap_or(NonZeroUsize::MIN);
        let eviction = config
            .max_connection_age()
            .map(Eviction::MaxAge)
            .unwrap_or_default();
        Self::new(connector, capacity, eviction)
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Return a ready handle for `endpoint`, connecting if needed.
    ///
    /// A cached handle that is expired or no longer connected is dropped and
    /// replaced. A failed connect leaves nothing registered for `endpoint`.
    pub async fn acquire(&self, endpoint: &str) -> Result<Arc<C::Handle>, ChainError> {
        loop {
            let slot = self.slot(endpoint).await;
            let mut entry = slot.entry.lock().await;

            // The slot may have been dropped while we waited on it.
            if !self.is_current(endpoint, &slot).await {
                tracing::debug!("Slot for {} was replaced, retrying", endpoint);
                continue;
            }

            if let Some(cached) = entry.take() {
                if self.eviction.is_expired(cached.created) {
                    tracing::info!("Connection to {} expired, reconnecting", endpoint);
                } else if cached.handle.is_connected().await {
                    tracing::debug!("Reusing connection to {}", endpoint);
                    let handle = Arc::clone(&cached.handle);
                    *entry = Some(cached);
                    return Ok(handle);
                } else {
                    tracing::warn!("Connection to {} is dead, reconnecting", endpoint);
                }
            }

            let handle = match self.connector.connect(endpoint).await {
                Ok(handle) => Arc::new(handle),
                Err(e) => {
                    // Still holding the entry lock, so waiters see a stale slot.
                    self.forget_slot(endpoint, &slot).await;
                    return Err(e);
                }
            };
            *entry = Some(CachedHandle {
                handle: Arc::clone(&handle),
                created: Instant::now(),
            });
            self.register_slot(endpoint, &slot).await;
            return Ok(handle);
        }
    }

    async fn is_current(&self, endpoint: &str, slot: &Arc<Slot<C::Handle>>) -> bool {
        self.slots
            .lock()
            .await
            .peek(endpoint)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
    }

    /// Remove `slot` from the map unless it was already replaced.
    async fn forget_slot(&self, endpoint: &str, slot: &Arc<Slot<C::Handle>>) {
        let mut slots = self.slots.lock().await;
        if slots
            .peek(endpoint)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            slots.pop(endpoint);
        }
    }

    /// Put a freshly filled `slot` back if it was dropped during the connect.
    ///
    /// A slot created for `endpoint` in the meantime wins.
    async fn register_slot(&self, endpoint: &str, slot: &Arc<Slot<C::Handle>>) {
        let mut slots = self.slots.lock().await;
        if slots.peek(endpoint).is_some() {
            return;
        }
        tracing::debug!("Registering connection to {} again after eviction", endpoint);
        if let Some((evicted, _)) = slots.push(endpoint.to_string(), Arc::clone(slot)) {
            tracing::debug!("Dropping least recently used connection to {}", evicted);
        }
    }

    async fn slot(&self, endpoint: &str) -> Arc<Slot<C::Handle>> {
        let mut slots = self.slots.lock().await;
        if let Some(slot) = slots.get(endpoint) {
            return Arc::clone(slot);
        }

        let slot = Arc::new(Slot::empty());
        if let Some((evicted, _)) = slots.push(endpoint.to_string(), Arc::clone(&slot)) {
            tracing::debug!("Dropping least recently used connection to {}", evicted);
        }
        slot
    }

    /// Forget the handle of `endpoint`. Returns whether one was registered.
    ///
    /// Requests already holding the handle keep using it; it is closed when
    /// the last of them finishes. A connect in flight for `endpoint` still
    /// registers its handle when it completes.
    pub async fn evict(&self, endpoint: &str) -> bool {
        let removed = self.slots.lock().await.pop(endpoint).is_some();
        if removed {
            tracing::info!("Evicted connection to {}", endpoint);
        }
        removed
    }

    /// Endpoints with a slot, most recently used first.
    pub async fn cached_endpoints(&self) -> Vec<String> {
        self.slots
            .lock()
            .await
            .iter()
            .map(|(endpoint, _)| endpoint.clone())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        self.slots.lock().await.clear();
    }
}

/// Token symbol per endpoint. Entries are never refreshed.
#[derive(Debug, Default)]
pub struct TokenSymbolCache {
    symbols: RwLock<HashMap<String, String>>,
}

impl TokenSymbolCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, endpoint: &str) -> Option<String> {
        self.symbols.read().await.get(endpoint).cloned()
    }

    /// Cached symbol of `endpoint`, reading chain properties on a miss.
    ///
    /// An empty symbol is cached like any other.
    pub async fn symbol_for<H>(&self, endpoint: &str, handle: &H) -> Result<String, ChainError>
    where
        H: ChainHandle + ?Sized,
    {
        if let Some(symbol) = self.get(endpoint).await {
            return Ok(symbol);
        }

        let symbol = handle
            .chain_properties()
            .await?
            .map(|props| props.primary_symbol())
            .unwrap_or_default();
        tracing::debug!("Caching token symbol {:?} for {}", symbol, endpoint);

        let mut symbols = self.symbols.write().await;
        Ok(symbols
            .entry(endpoint.to_string())
            .or_insert(symbol)
            .clone())
    }

    pub async fn clear(&self) {
        self.symbols.write().await.clear();
    }
}
