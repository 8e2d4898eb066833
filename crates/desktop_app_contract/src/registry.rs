//! Registry of modules available to the shell.

use std::rc::Rc;

use crate::{ModuleDescriptor, ModuleId};

#[derive(Debug, Clone, Default)]
/// Module descriptors keyed by id, kept in registration order for launchers.
pub struct ModuleRegistry {
    modules: Vec<Rc<ModuleDescriptor>>,
}

impl ModuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module.
    ///
    /// # Errors
    ///
    /// Returns an error when a module with the same id is already registered.
    pub fn register(&mut self, descriptor: ModuleDescriptor) -> Result<(), String> {
        if self.contains(&descriptor.id) {
            return Err(format!("module `{}` is already registered", descriptor.id));
        }
        self.modules.push(Rc::new(descriptor));
        Ok(())
    }

    /// Looks up a module by id.
    pub fn get(&self, id: &ModuleId) -> Option<Rc<ModuleDescriptor>> {
        self.modules.iter().find(|m| &m.id == id).cloned()
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &ModuleId) -> bool {
        self.modules.iter().any(|m| &m.id == id)
    }

    /// Iterates modules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<ModuleDescriptor>> {
        self.modules.iter()
    }

    /// Number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no modules are registered.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
