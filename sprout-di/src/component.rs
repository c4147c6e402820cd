//! One of the basic blocks of dependency injection is a component - an object whose construction
//! is managed by the container, rather than by its consumers. Each component is described by a
//! [ComponentDescriptor] which carries its identity, the identities it depends on and a factory
//! producing the instance.
//!
//! ## Identities
//!
//! A [ComponentId] is the concrete type of the component plus an optional qualifier. Qualifiers
//! make it possible to register multiple components of the same type:
//!
//! ```
//! use sprout_di::component::ComponentId;
//!
//! struct DataSource;
//!
//! let primary = ComponentId::of::<DataSource>();
//! let replica = ComponentId::named::<DataSource>("replica");
//!
//! assert_ne!(primary, replica);
//! ```
//!
//! ## Descriptors
//!
//! Factories receive their dependencies as [ResolvedDependencies], in the order in which they
//! were declared:
//!
//! ```
//! use sprout_di::component::{ComponentDescriptor, ComponentId};
//! use sprout_di::instance_provider::ComponentInstancePtr;
//!
//! struct DataSource;
//!
//! struct UserRepository {
//!     data_source: ComponentInstancePtr<DataSource>,
//! }
//!
//! let descriptor = ComponentDescriptor::new::<UserRepository, _>(
//!     vec![ComponentId::of::<DataSource>()],
//!     |dependencies| {
//!         Ok(UserRepository {
//!             data_source: dependencies.get(0)?,
//!         })
//!     },
//! );
//!
//! assert_eq!(descriptor.id(), &ComponentId::of::<UserRepository>());
//! ```

use crate::error::ContainerError;
use crate::scope::SINGLETON;
use crate::instance_provider::{
    downcast, error_ptr, ComponentInstanceAnyPtr, ComponentInstancePtr, ErrorPtr,
};
use derivative::Derivative;
use std::any::{type_name, Any, TypeId};
use std::fmt::{Debug, Display, Formatter};

/// Marker trait for types which can be stored in the container. Implemented for all suitable
/// types.
#[cfg(feature = "threadsafe")]
pub trait Injectable: Any + Send + Sync {}

#[cfg(feature = "threadsafe")]
impl<T: Any + Send + Sync> Injectable for T {}

/// Marker trait for types which can be stored in the container. Implemented for all suitable
/// types.
#[cfg(not(feature = "threadsafe"))]
pub trait Injectable: Any {}

#[cfg(not(feature = "threadsafe"))]
impl<T: Any> Injectable for T {}

/// Bounds required from factory closures: `Send + Sync` with the `threadsafe` feature, nothing
/// otherwise.
#[cfg(feature = "threadsafe")]
pub trait FactoryBounds: Send + Sync {}

#[cfg(feature = "threadsafe")]
impl<T: Send + Sync + ?Sized> FactoryBounds for T {}

/// Bounds required from factory closures: `Send + Sync` with the `threadsafe` feature, nothing
/// otherwise.
#[cfg(not(feature = "threadsafe"))]
pub trait FactoryBounds {}

#[cfg(not(feature = "threadsafe"))]
impl<T: ?Sized> FactoryBounds for T {}

/// Type-erased factory invoked once to construct a component.
#[cfg(feature = "threadsafe")]
pub type ComponentFactoryFn = Box<
    dyn FnOnce(ResolvedDependencies) -> Result<ComponentInstanceAnyPtr, ErrorPtr> + Send + Sync,
>;

/// Type-erased factory invoked once to construct a component.
#[cfg(not(feature = "threadsafe"))]
pub type ComponentFactoryFn =
    Box<dyn FnOnce(ResolvedDependencies) -> Result<ComponentInstanceAnyPtr, ErrorPtr>>;

/// Identity of a component: its type and an optional qualifier name.
#[derive(Derivative, Clone)]
#[derivative(Debug, PartialEq, Eq, Hash)]
pub struct ComponentId {
    type_id: TypeId,

    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    type_name: &'static str,

    qualifier: Option<String>,
}

impl ComponentId {
    /// Identity of an unqualified component of type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            qualifier: None,
        }
    }

    /// Identity of a component of type `T` with given qualifier.
    pub fn named<T: ?Sized + 'static>(qualifier: impl Into<String>) -> Self {
        Self::of::<T>().with_qualifier(qualifier)
    }

    /// Returns the same type identity with a different qualifier.
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Type name, for diagnostics only.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }
}

impl Display for ComponentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{}#{}", self.type_name, qualifier),
            None => f.write_str(self.type_name),
        }
    }
}

/// Lifetime of component instances. Only singletons are supported: one instance per identity
/// for the whole lifetime of the container.
#[non_exhaustive]
#[derive(Default, Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ScopeKind {
    #[default]
    Singleton,
}

impl ScopeKind {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            ScopeKind::Singleton => SINGLETON,
        }
    }
}

/// Dependency instances handed to a factory, in declared order.
#[derive(Clone, Default)]
pub struct ResolvedDependencies {
    dependencies: Vec<(ComponentId, ComponentInstanceAnyPtr)>,
}

impl Debug for ResolvedDependencies {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.dependencies.iter().map(|(id, _)| id))
            .finish()
    }
}

impl ResolvedDependencies {
    pub fn new(dependencies: Vec<(ComponentId, ComponentInstanceAnyPtr)>) -> Self {
        Self { dependencies }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Type-erased instance at given position.
    pub fn instance(&self, index: usize) -> Option<&ComponentInstanceAnyPtr> {
        self.dependencies.get(index).map(|(_, instance)| instance)
    }

    /// Identity of the dependency at given position.
    pub fn id(&self, index: usize) -> Option<&ComponentId> {
        self.dependencies.get(index).map(|(id, _)| id)
    }

    /// Returns the dependency at given position as `T`. Errors are already converted to
    /// [ErrorPtr], so they can be propagated from a factory with `?`.
    pub fn get<T: Injectable>(
        &self,
        index: usize,
    ) -> Result<ComponentInstancePtr<T>, ErrorPtr> {
        let (id, instance) = self
            .dependencies
            .get(index)
            .ok_or_else(|| error_ptr(ContainerError::UndeclaredDependency(index)))?;

        downcast::<T>(id, instance.clone()).map_err(error_ptr)
    }
}

/// Definition of a component: identity, dependencies and a factory.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct ComponentDescriptor {
    id: ComponentId,

    dependencies: Vec<ComponentId>,

    scope: ScopeKind,

    #[derivative(Debug = "ignore")]
    factory: ComponentFactoryFn,
}

impl ComponentDescriptor {
    /// Creates a descriptor for an unqualified component of type `T`, built by given factory.
    pub fn new<T, F>(dependencies: Vec<ComponentId>, factory: F) -> Self
    where
        T: Injectable,
        F: FnOnce(ResolvedDependencies) -> Result<T, ErrorPtr> + FactoryBounds + 'static,
    {
        Self::from_parts(
            ComponentId::of::<T>(),
            dependencies,
            Box::new(move |dependencies| {
                factory(dependencies)
                    .map(|instance| ComponentInstancePtr::new(instance) as ComponentInstanceAnyPtr)
            }),
        )
    }

    /// Creates a descriptor from an arbitrary identity and a type-erased factory. The factory
    /// should produce an instance of the type referred by the identity, otherwise typed lookups
    /// will fail.
    pub fn from_parts(
        id: ComponentId,
        dependencies: Vec<ComponentId>,
        factory: ComponentFactoryFn,
    ) -> Self {
        Self {
            id,
            dependencies,
            scope: ScopeKind::Singleton,
            factory,
        }
    }

    /// Sets the qualifier of this component's identity.
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.id = self.id.with_qualifier(qualifier);
        self
    }

    #[inline]
    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    #[inline]
    pub fn dependencies(&self) -> &[ComponentId] {
        &self.dependencies
    }

    #[inline]
    pub fn scope(&self) -> ScopeKind {
        self.scope
    }

    /// Runs the factory, consuming the descriptor.
    pub(crate) fn construct(
        self,
        dependencies: ResolvedDependencies,
    ) -> Result<ComponentInstanceAnyPtr, ErrorPtr> {
        (self.factory)(dependencies)
    }
}
