//! Named factory constructors for hosts that pick a factory at runtime.
//!
//! A host only knows the [`MetaFactory`] capability. Each registered entry
//! carries the two construction forms every factory supports: one that loads
//! the platform default configuration and one that takes a configuration.

use std::collections::BTreeMap;

use crate::config::Configuration;
use crate::error::FactoryError;
use crate::factory::MetaFactory;

/// The two constructors of a registered factory.
#[derive(Clone, Copy)]
pub struct FactoryConstructor {
    pub default: fn() -> Result<Box<dyn MetaFactory>, FactoryError>,
    pub with_configuration: fn(Option<Configuration>) -> Box<dyn MetaFactory>,
}

/// Registry of factory constructors keyed by name.
#[derive(Default)]
pub struct FactoryRegistry {
    entries: BTreeMap<String, FactoryConstructor>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `ctor` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, ctor: FactoryConstructor) -> &mut Self {
        self.entries.insert(name.into(), ctor);
        self
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn lookup(&self, name: &str) -> Result<&FactoryConstructor, FactoryError> {
        self.entries
            .get(name)
            .ok_or_else(|| FactoryError::UnknownFactory(name.to_string()))
    }

    /// Instantiates `name` with the platform default configuration.
    pub fn instantiate_default(&self, name: &str) -> Result<Box<dyn MetaFactory>, FactoryError> {
        (self.lookup(name)?.default)()
    }

    /// Instantiates `name` with an explicit configuration.
    pub fn instantiate_with(
        &self,
        name: &str,
        conf: Option<Configuration>,
    ) -> Result<Box<dyn MetaFactory>, FactoryError> {
        Ok((self.lookup(name)?.with_configuration)(conf))
    }
}
