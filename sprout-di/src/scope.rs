//! Component instances are contained in [Scope]s - containers which decide whether an instance
//! for a given identity already exists. The container only supports the singleton scope: each
//! component is constructed once and shared by all its dependents for the lifetime of the
//! container.

use crate::component::ComponentId;
use crate::instance_provider::ComponentInstanceAnyPtr;
use fxhash::FxHashMap;
#[cfg(test)]
use mockall::automock;

#[cfg(not(feature = "threadsafe"))]
pub type ScopePtr = Box<dyn Scope>;
#[cfg(feature = "threadsafe")]
pub type ScopePtr = Box<dyn Scope + Send + Sync>;

/// Name of the [SingletonScope].
pub const SINGLETON: &str = "SINGLETON";

/// A scope containing component instances. See module documentation for information on scopes.
#[cfg_attr(test, automock)]
pub trait Scope {
    /// Gets an instance stored for the given identity, if available in this scope.
    fn instance(&self, id: &ComponentId) -> Option<ComponentInstanceAnyPtr>;

    /// Stores given instance in the scope.
    fn store_instance(&mut self, id: &ComponentId, instance: ComponentInstanceAnyPtr);
}

/// Scope for instances shared between components.
#[derive(Default)]
pub struct SingletonScope {
    instances: FxHashMap<ComponentId, ComponentInstanceAnyPtr>,
}

impl Scope for SingletonScope {
    #[inline]
    fn instance(&self, id: &ComponentId) -> Option<ComponentInstanceAnyPtr> {
        self.instances.get(id).cloned()
    }

    #[inline]
    fn store_instance(&mut self, id: &ComponentId, instance: ComponentInstanceAnyPtr) {
        self.instances.insert(id.clone(), instance);
    }
}

/// Factory for [Scope]s, used by the [Resolver](crate::resolver::Resolver) to create fresh
/// storage for each build.
#[cfg_attr(test, automock)]
pub trait ScopeFactory {
    fn create_scope(&self) -> ScopePtr;
}

#[derive(Copy, Clone, Eq, PartialEq, Default, Debug)]
pub struct SingletonScopeFactory;

impl ScopeFactory for SingletonScopeFactory {
    fn create_scope(&self) -> ScopePtr {
        Box::<SingletonScope>::default()
    }
}
