//! The composition root owning the process's type registry.
//!
//! A [`TypeSystem`] builds its [`TypeRegistry`] lazily on the first call to
//! [`TypeSystem::instance`]: language tables first, then the built-in types,
//! then every registered initializer (all [`ExtensionPoint::Legacy`] ones in
//! registration order, followed by all [`ExtensionPoint::Current`] ones).
//! Later calls hand out the same shared registry until [`TypeSystem::clear`]
//! drops it. Handles obtained before a clear stay valid and keep seeing the
//! old registry.

use std::sync::{Arc, RwLock};

use tracing::info;

use crate::error::Result;
use crate::language::LanguageTables;
use crate::registry::TypeRegistry;

pub type SharedRegistry = Arc<RwLock<TypeRegistry>>;
pub type Initializer = Box<dyn Fn(&mut TypeRegistry) + Send + Sync>;

/// The two points at which extensions may register their types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExtensionPoint {
    /// Kept for extensions written against the older initialization hook.
    Legacy,
    Current,
}

pub struct TypeSystem {
    language: LanguageTables,
    legacy: Vec<Initializer>,
    current: Vec<Initializer>,
    instance: RwLock<Option<SharedRegistry>>,
}

impl TypeSystem {
    pub fn new(language: LanguageTables) -> Self {
        Self {
            language,
            legacy: Vec::new(),
            current: Vec::new(),
            instance: RwLock::new(None),
        }
    }
    pub fn language(&self) -> &LanguageTables {
        &self.language
    }
    /// Registers an initializer. It only affects registries built afterwards.
    pub fn register_initializer<F>(&mut self, point: ExtensionPoint, initializer: F)
    where
        F: Fn(&mut TypeRegistry) + Send + Sync + 'static,
    {
        match point {
            ExtensionPoint::Legacy => self.legacy.push(Box::new(initializer)),
            ExtensionPoint::Current => self.current.push(Box::new(initializer)),
        }
    }
    /// Returns the shared registry, building it on first use.
    pub fn instance(&self) -> Result<SharedRegistry> {
        if let Some(registry) = self.instance.read()?.as_ref() {
            return Ok(Arc::clone(registry));
        }
        let mut slot = self.instance.write()?;
        // another thread may have built it while we waited for the write lock
        if let Some(registry) = slot.as_ref() {
            return Ok(Arc::clone(registry));
        }
        let registry = Arc::new(RwLock::new(self.build()));
        *slot = Some(Arc::clone(&registry));
        Ok(registry)
    }
    /// Drops the shared registry so that the next [`TypeSystem::instance`] rebuilds it.
    pub fn clear(&self) -> Result<()> {
        self.instance.write()?.take();
        Ok(())
    }
    pub fn is_initialized(&self) -> Result<bool> {
        Ok(self.instance.read()?.is_some())
    }
    /// Switches to other language tables. The registry is rebuilt on next use.
    pub fn set_language(&mut self, language: LanguageTables) -> Result<()> {
        self.language = language;
        self.clear()
    }
    fn build(&self) -> TypeRegistry {
        let mut registry = TypeRegistry::new(&self.language);
        for initializer in self.legacy.iter().chain(self.current.iter()) {
            initializer(&mut registry);
        }
        info!(
            language = registry.language(),
            types = registry.len(),
            extensions = self.legacy.len() + self.current.len(),
            "type registry ready"
        );
        registry
    }
}
