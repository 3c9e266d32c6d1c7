use super::vendor::TtsVendor;
use crate::infrastructure::repositories::{ProviderError, TtsRepository};
use dashmap::DashMap;
use std::sync::Arc;

/// Extra construction flag for vendors that have more than one mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderMode {
    Standard,
    HighDefinition,
}

/// Composite cache key: one warm client per vendor, credential and mode
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ProviderKey {
    pub vendor: TtsVendor,
    pub api_key: String,
    pub mode: Option<ProviderMode>,
}

impl ProviderKey {
    pub fn new(vendor: TtsVendor, api_key: impl Into<String>) -> Self {
        Self {
            vendor,
            api_key: api_key.into(),
            mode: None,
        }
    }

    pub fn with_mode(mut self, mode: ProviderMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Last four characters only, for logs
    pub fn masked_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 4 {
            return "****".to_string();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{}", tail)
    }
}

impl std::fmt::Debug for ProviderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderKey")
            .field("vendor", &self.vendor)
            .field("api_key", &self.masked_key())
            .field("mode", &self.mode)
            .finish()
    }
}

/// Builds a vendor client for a key. Construction must not perform I/O.
pub trait ProviderFactory: Send + Sync {
    fn create(&self, key: &ProviderKey) -> Result<Arc<dyn TtsRepository>, ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheScope {
    All,
    Vendor(TtsVendor),
}

/// Process-wide memo of provider clients.
///
/// No eviction and no TTL: the key space is bounded by the credentials seen
/// during the process lifetime. Two concurrent misses on the same key may both
/// construct a client; the later insert wins and either instance is usable.
pub struct ProviderInstanceCache {
    factory: Arc<dyn ProviderFactory>,
    instances: DashMap<ProviderKey, Arc<dyn TtsRepository>>,
}

impl ProviderInstanceCache {
    pub fn new(factory: Arc<dyn ProviderFactory>) -> Self {
        Self {
            factory,
            instances: DashMap::new(),
        }
    }

    pub fn get_instance(&self, key: &ProviderKey) -> Result<Arc<dyn TtsRepository>, ProviderError> {
        if let Some(instance) = self.instances.get(key) {
            return Ok(instance.value().clone());
        }

        let instance = self.factory.create(key)?;
        self.instances.insert(key.clone(), instance.clone());

        tracing::debug!(
            vendor = %key.vendor,
            api_key = %key.masked_key(),
            mode = ?key.mode,
            cached_instances = self.instances.len(),
            "Provider instance created"
        );

        Ok(instance)
    }

    pub fn invalidate(&self, scope: CacheScope) {
        let before = self.instances.len();
        match scope {
            CacheScope::All => self.instances.clear(),
            CacheScope::Vendor(vendor) => self.instances.retain(|key, _| key.vendor != vendor),
        }

        tracing::info!(
            scope = ?scope,
            dropped = before.saturating_sub(self.instances.len()),
            "Provider instances invalidated"
        );
    }

    pub fn invalidate_all(&self) {
        self.invalidate(CacheScope::All);
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
