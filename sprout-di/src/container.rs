//! The [Container] is the public entry point: components are registered, the whole object graph
//! is built once and then fully-built singletons can be retrieved.
//!
//! ```
//! use sprout_di::component::{ComponentDescriptor, ComponentId};
//! use sprout_di::container::Container;
//! use sprout_di::instance_provider::{ComponentInstancePtr, TypedComponentInstanceProvider};
//!
//! struct EmailService;
//!
//! struct UserService {
//!     email_service: ComponentInstancePtr<EmailService>,
//! }
//!
//! let mut container = Container::new();
//! container
//!     .register_component::<UserService, _>(
//!         vec![ComponentId::of::<EmailService>()],
//!         |dependencies| {
//!             Ok(UserService {
//!                 email_service: dependencies.get(0)?,
//!             })
//!         },
//!     )
//!     .unwrap();
//! container
//!     .register_component::<EmailService, _>(vec![], |_| Ok(EmailService))
//!     .unwrap();
//!
//! container.build().unwrap();
//!
//! let user_service = container.instance_typed::<UserService>().unwrap();
//! ```
//!
//! A failed build leaves the container in the [ContainerState::Failed] state - it cannot be
//! rebuilt and should be discarded.

use crate::component::{
    ComponentDescriptor, ComponentId, FactoryBounds, Injectable, ResolvedDependencies,
};
use crate::component_registry::ComponentRegistry;
use crate::error::ContainerError;
use crate::instance_provider::{ComponentInstanceAnyPtr, ComponentInstanceProvider, ErrorPtr};
use crate::resolver::{InstanceCache, Resolver};
use std::any::TypeId;
use tracing::debug;

/// Lifecycle state of a [Container].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ContainerState {
    /// Nothing registered yet.
    Empty,
    /// At least one component registered, not built.
    Registering,
    /// Build succeeded; instances can be retrieved.
    Built,
    /// Build failed; the container is unusable.
    Failed,
}

/// IoC container facade.
pub struct Container {
    registry: ComponentRegistry,
    resolver: Resolver,
    instances: Option<InstanceCache>,
    failed: bool,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Creates an empty container with the default [Resolver].
    pub fn new() -> Self {
        Self::with_resolver(Resolver::default())
    }

    /// Creates an empty container using given [Resolver].
    pub fn with_resolver(resolver: Resolver) -> Self {
        Self {
            registry: Default::default(),
            resolver,
            instances: None,
            failed: false,
        }
    }

    pub fn state(&self) -> ContainerState {
        if self.failed {
            ContainerState::Failed
        } else if self.instances.is_some() {
            ContainerState::Built
        } else if self.registry.is_empty() {
            ContainerState::Empty
        } else {
            ContainerState::Registering
        }
    }

    /// Registers a component. Only valid before [Container::build].
    pub fn register(&mut self, descriptor: ComponentDescriptor) -> Result<(), ContainerError> {
        self.registry.register(descriptor)
    }

    /// Shorthand for registering an unqualified component of type `T`.
    pub fn register_component<T, F>(
        &mut self,
        dependencies: Vec<ComponentId>,
        factory: F,
    ) -> Result<(), ContainerError>
    where
        T: Injectable,
        F: FnOnce(ResolvedDependencies) -> Result<T, ErrorPtr> + FactoryBounds + 'static,
    {
        self.register(ComponentDescriptor::new::<T, F>(dependencies, factory))
    }

    /// Checks if given identity has been registered.
    #[inline]
    pub fn is_registered(&self, id: &ComponentId) -> bool {
        self.registry.is_registered(id)
    }

    /// Builds all registered components. Can only be called once, regardless of the outcome.
    pub fn build(&mut self) -> Result<(), ContainerError> {
        match self.state() {
            ContainerState::Built | ContainerState::Failed => {
                return Err(ContainerError::AlreadyBuilt)
            }
            ContainerState::Empty | ContainerState::Registering => {}
        }

        match self.resolver.build_all(&mut self.registry) {
            Ok(instances) => {
                self.instances = Some(instances);
                Ok(())
            }
            Err(error) => {
                self.failed = true;
                Err(error)
            }
        }
    }

    /// Returns the instance registered under given identity.
    pub fn get(&self, id: &ComponentId) -> Result<ComponentInstanceAnyPtr, ContainerError> {
        let instances = self.instances.as_ref().ok_or(ContainerError::NotBuilt)?;
        instances.instance(id).ok_or_else(|| {
            debug!("Requested unknown component: {}", id);
            ContainerError::NotFound(id.clone())
        })
    }

    /// Identities in the order their instances were constructed.
    pub fn construction_order(&self) -> Result<&[ComponentId], ContainerError> {
        self.instances
            .as_ref()
            .map(|instances| instances.construction_order())
            .ok_or(ContainerError::NotBuilt)
    }
}

impl ComponentInstanceProvider for Container {
    #[inline]
    fn instance(&self, id: &ComponentId) -> Result<ComponentInstanceAnyPtr, ContainerError> {
        self.get(id)
    }

    fn instances(
        &self,
        type_id: TypeId,
    ) -> Result<Vec<(ComponentId, ComponentInstanceAnyPtr)>, ContainerError> {
        self.construction_order()?
            .iter()
            .filter(|id| id.type_id() == type_id)
            .map(|id| self.get(id).map(|instance| (id.clone(), instance)))
            .collect()
    }
}
