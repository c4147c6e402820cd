//! Core functionality for constructing component instances from a
//! [ComponentRegistry](crate::component_registry::ComponentRegistry).

use crate::component::{ComponentDescriptor, ComponentId, ResolvedDependencies};
use crate::component_registry::ComponentRegistry;
use crate::error::ContainerError;
use crate::graph::DependencyGraph;
use crate::instance_provider::ComponentInstanceAnyPtr;
use crate::scope::{ScopeFactory, ScopePtr, SingletonScopeFactory};
use derivative::Derivative;
use fxhash::FxHashMap;
use itertools::Itertools;
use tracing::{debug, info, warn};

#[cfg(not(feature = "threadsafe"))]
pub type ScopeFactoryPtr = Box<dyn ScopeFactory>;
#[cfg(feature = "threadsafe")]
pub type ScopeFactoryPtr = Box<dyn ScopeFactory + Send + Sync>;

/// Fully built singleton instances, together with the order in which they were constructed.
/// Read-only once created.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct InstanceCache {
    #[derivative(Debug = "ignore")]
    scope: ScopePtr,
    construction_order: Vec<ComponentId>,
}

impl InstanceCache {
    #[inline]
    pub fn instance(&self, id: &ComponentId) -> Option<ComponentInstanceAnyPtr> {
        self.scope.instance(id)
    }

    /// Identities in construction order.
    #[inline]
    pub fn construction_order(&self) -> &[ComponentId] {
        &self.construction_order
    }
}

/// Walks the dependency graph and constructs components bottom-up.
pub struct Resolver {
    scope_factory: ScopeFactoryPtr,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(Box::<SingletonScopeFactory>::default())
    }
}

impl Resolver {
    /// Creates a resolver storing singletons in scopes from given factory.
    pub fn new(scope_factory: ScopeFactoryPtr) -> Self {
        Self { scope_factory }
    }

    /// Freezes the registry, validates the dependency graph and constructs all components in
    /// dependency order. Validation errors are returned before any factory runs. The first failing
    /// factory aborts the build and all instances constructed so far are dropped. A registry can
    /// only be built once.
    pub fn build_all(
        &self,
        registry: &mut ComponentRegistry,
    ) -> Result<InstanceCache, ContainerError> {
        if registry.is_frozen() {
            return Err(ContainerError::AlreadyBuilt);
        }

        registry.freeze();

        let order = DependencyGraph::build(registry.descriptors())?.topological_order()?;

        let mut descriptors: FxHashMap<ComponentId, ComponentDescriptor> = registry
            .take_descriptors()
            .into_iter()
            .map(|descriptor| (descriptor.id().clone(), descriptor))
            .collect();

        info!("Building {} components...", order.len());

        let mut scope = self.scope_factory.create_scope();
        for id in &order {
            if scope.instance(id).is_some() {
                continue;
            }

            let descriptor = descriptors
                .remove(id)
                .ok_or_else(|| ContainerError::NotFound(id.clone()))?;

            let instance = Self::construct(|id| scope.instance(id), descriptor).map_err(|error| {
                warn!("Aborting build: {}", error);
                error
            })?;

            scope.store_instance(id, instance);
        }

        info!("Built {} components.", order.len());

        Ok(InstanceCache {
            scope,
            construction_order: order,
        })
    }

    fn construct<F>(
        instance: F,
        descriptor: ComponentDescriptor,
    ) -> Result<ComponentInstanceAnyPtr, ContainerError>
    where
        F: Fn(&ComponentId) -> Option<ComponentInstanceAnyPtr>,
    {
        let id = descriptor.id().clone();
        let dependencies: Vec<_> = descriptor
            .dependencies()
            .iter()
            .map(|dependency| {
                instance(dependency)
                    .map(|instance| (dependency.clone(), instance))
                    .ok_or_else(|| ContainerError::UnknownDependency {
                        component: id.clone(),
                        missing: dependency.clone(),
                    })
            })
            .try_collect()?;

        debug!(
            "Constructing {} component: {}",
            descriptor.scope().name(),
            id
        );

        descriptor
            .construct(ResolvedDependencies::new(dependencies))
            .map_err(|cause| ContainerError::ConstructionFailed {
                component: id,
                cause,
            })
    }
}
