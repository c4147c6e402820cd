//! Registry of [ComponentDescriptor]s collected during the registration phase. Descriptors can be
//! registered in any order; the registry only keeps track of identity uniqueness and of the
//! registration order, which is later used to break ties when ordering construction.

use crate::component::{ComponentDescriptor, ComponentId};
use crate::error::ContainerError;
use fxhash::FxHashSet;
use tracing::trace;

/// Registry of component descriptors, which becomes immutable once frozen by the build phase.
#[derive(Default, Debug)]
pub struct ComponentRegistry {
    descriptors: Vec<ComponentDescriptor>,
    identities: Vec<ComponentId>,
    registered: FxHashSet<ComponentId>,
    frozen: bool,
}

impl ComponentRegistry {
    /// Adds a new descriptor. The first registration of a given identity wins - duplicates are
    /// rejected and leave the registry untouched.
    pub fn register(&mut self, descriptor: ComponentDescriptor) -> Result<(), ContainerError> {
        if self.frozen {
            return Err(ContainerError::AlreadyBuilt);
        }

        if self.registered.contains(descriptor.id()) {
            return Err(ContainerError::DuplicateIdentity(descriptor.id().clone()));
        }

        trace!("Registering component: {}", descriptor.id());

        self.registered.insert(descriptor.id().clone());
        self.identities.push(descriptor.id().clone());
        self.descriptors.push(descriptor);

        Ok(())
    }

    /// Makes the registry immutable. Subsequent registrations fail with
    /// [ContainerError::AlreadyBuilt].
    #[inline]
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Checks if given identity has been registered. Keeps working after the descriptors have
    /// been consumed by the build phase.
    #[inline]
    pub fn is_registered(&self, id: &ComponentId) -> bool {
        self.registered.contains(id)
    }

    /// All registered identities, in registration order.
    #[inline]
    pub fn identities(&self) -> &[ComponentId] {
        &self.identities
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// Descriptors not yet consumed by the build phase, in registration order.
    #[inline]
    pub fn descriptors(&self) -> &[ComponentDescriptor] {
        &self.descriptors
    }

    pub(crate) fn take_descriptors(&mut self) -> Vec<ComponentDescriptor> {
        std::mem::take(&mut self.descriptors)
    }
}
