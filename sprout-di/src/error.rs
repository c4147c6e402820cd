use crate::component::ComponentId;
use crate::graph::DependencyCycle;
use crate::instance_provider::ErrorPtr;
use thiserror::Error;

/// Errors related to registering, building and retrieving components.
#[derive(Error, Clone, Debug)]
pub enum ContainerError {
    #[error("Attempted to register a duplicated component: {0}")]
    DuplicateIdentity(ComponentId),
    #[error("Component {component} depends on unregistered component {missing}")]
    UnknownDependency {
        component: ComponentId,
        missing: ComponentId,
    },
    #[error("Detected dependency cycle: {0}")]
    CyclicDependency(DependencyCycle),
    #[error("Error constructing component {component}: {cause}")]
    ConstructionFailed {
        component: ComponentId,
        #[cfg_attr(feature = "threadsafe", source)]
        cause: ErrorPtr,
    },
    #[error("Cannot find component: {0}")]
    NotFound(ComponentId),
    #[error("Container has not been built")]
    NotBuilt,
    #[error("Container has already been built")]
    AlreadyBuilt,
    #[error("Tried to downcast component to incompatible type: {0}")]
    IncompatibleComponent(ComponentId),
    #[error("Requested dependency at position {0}, which was not declared")]
    UndeclaredDependency(usize),
}
