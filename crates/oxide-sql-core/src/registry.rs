//! Dialect registry.
//!
//! Maps a dialect identifier such as `"cockroachdb"` to the set of
//! components that speak that dialect. Sets are built once, when
//! configuration is loaded, and then shared.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::dialect::Dialect;
use crate::error::RegistryError;
use crate::grammar::{QueryGrammar, SchemaGrammar};
use crate::processor::Processor;

/// Everything needed to talk to one dialect.
///
/// `C` is the connection factory. It stays `()` for registries that only
/// translate.
#[derive(Clone)]
pub struct DialectSet<C = ()> {
    /// Quoting, placeholders and capability flags.
    pub dialect: Arc<dyn Dialect>,
    /// Statement translator.
    pub query_grammar: Arc<dyn QueryGrammar>,
    /// DDL and catalog query translator.
    pub schema_grammar: Arc<dyn SchemaGrammar>,
    /// Result row normaliser.
    pub processor: Arc<dyn Processor>,
    /// Connection factory.
    pub connector: C,
}

impl<C> DialectSet<C> {
    /// Returns the dialect name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.dialect.name()
    }
}

impl<C> fmt::Debug for DialectSet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialectSet")
            .field("dialect", &self.dialect.name())
            .finish_non_exhaustive()
    }
}

/// Case-insensitive lookup of dialect sets by name or alias.
#[derive(Debug)]
pub struct DialectRegistry<C = ()> {
    sets: HashMap<String, DialectSet<C>>,
    aliases: HashMap<String, String>,
}

impl<C> Default for DialectRegistry<C> {
    fn default() -> Self {
        Self {
            sets: HashMap::new(),
            aliases: HashMap::new(),
        }
    }
}

impl<C: Clone> DialectRegistry<C> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `set` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyRegistered`] when the name (or an
    /// alias with the same spelling) is taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        set: DialectSet<C>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let key = name.to_ascii_lowercase();
        if self.sets.contains_key(&key) || self.aliases.contains_key(&key) {
            return Err(RegistryError::AlreadyRegistered(name));
        }
        self.sets.insert(key, set);
        Ok(())
    }

    /// Makes `alias` resolve to the set registered as `target`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownDialect`] when `target` is not
    /// registered, and [`RegistryError::AlreadyRegistered`] when `alias`
    /// is taken.
    pub fn alias(&mut self, alias: impl Into<String>, target: &str) -> Result<(), RegistryError> {
        let alias = alias.into();
        let key = alias.to_ascii_lowercase();
        let target = target.to_ascii_lowercase();
        if !self.sets.contains_key(&target) {
            return Err(RegistryError::UnknownDialect(target));
        }
        if self.sets.contains_key(&key) || self.aliases.contains_key(&key) {
            return Err(RegistryError::AlreadyRegistered(alias));
        }
        self.aliases.insert(key, target);
        Ok(())
    }

    /// Returns the set registered under `name` or one of its aliases.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownDialect`] for unknown names.
    pub fn resolve(&self, name: &str) -> Result<DialectSet<C>, RegistryError> {
        let key = name.to_ascii_lowercase();
        let key = self.aliases.get(&key).unwrap_or(&key);
        self.sets
            .get(key)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownDialect(String::from(name)))
    }

    /// Returns whether `name` resolves.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let key = name.to_ascii_lowercase();
        self.sets.contains_key(&key) || self.aliases.contains_key(&key)
    }

    /// Returns the registered dialect names (aliases excluded), sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
