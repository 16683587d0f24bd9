//! Registry of the available engines
//!
//! The registry is built once and is read-only afterwards. Lookups are
//! case-insensitive: names are stored lower-cased and queries are lower-cased
//! before matching.

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::client::ClientConfig;
use crate::engine::Engine;
use crate::engines::{FzMoviesEngine, NetNaijaEngine};
use crate::error::{EngineError, Result};

/// Engines keyed by lower-cased name
#[derive(Default)]
pub struct EngineRegistry {
    engines: BTreeMap<String, Arc<dyn Engine>>,
}

impl EngineRegistry {
    /// Build a registry holding every supported engine.
    ///
    /// Each engine gets its own HTTP client, so rate limits apply per site.
    ///
    /// # Errors
    /// Returns an error if an engine's HTTP client cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut registry = Self::default();
        registry.register(Arc::new(NetNaijaEngine::new(config)?));
        registry.register(Arc::new(FzMoviesEngine::new(config)?));
        Ok(registry)
    }

    /// Add an engine under its lower-cased name, returning any engine it replaces.
    pub fn register(&mut self, engine: Arc<dyn Engine>) -> Option<Arc<dyn Engine>> {
        self.engines.insert(engine.name().to_lowercase(), engine)
    }

    /// All engines keyed by lower-cased name
    pub fn engines(&self) -> &BTreeMap<String, Arc<dyn Engine>> {
        &self.engines
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.engines.keys().map(String::as_str).collect()
    }

    /// Look an engine up by name, ignoring case.
    ///
    /// # Errors
    /// Returns `EngineError::EngineNotFound` naming the requested engine.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Engine>> {
        self.engines
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| EngineError::EngineNotFound(name.to_string()))
    }
}

static REGISTRY: OnceCell<EngineRegistry> = OnceCell::new();

/// Build the process-wide registry, or return it if already built.
///
/// The configuration of the first successful call wins.
pub fn init(config: &ClientConfig) -> Result<&'static EngineRegistry> {
    REGISTRY.get_or_try_init(|| EngineRegistry::new(config))
}

/// All engines of the process-wide registry, built with defaults if needed.
pub fn get_engines() -> Result<&'static BTreeMap<String, Arc<dyn Engine>>> {
    Ok(init(&ClientConfig::default())?.engines())
}

/// Case-insensitive lookup in the process-wide registry.
///
/// # Errors
/// Returns `EngineError::EngineNotFound` for unknown names.
pub fn get_engine(name: &str) -> Result<Arc<dyn Engine>> {
    init(&ClientConfig::default())?.get(name)
}
