//! Pointer types used for component instances and the generic access to built instances.

use crate::component::{ComponentId, Injectable};
use crate::error::ContainerError;
use itertools::Itertools;
#[cfg(test)]
use mockall::automock;
use std::any::{Any, TypeId};
use std::error::Error;
#[cfg(not(feature = "threadsafe"))]
use std::rc::Rc;
#[cfg(feature = "threadsafe")]
use std::sync::Arc;

#[cfg(not(feature = "threadsafe"))]
pub type ComponentInstancePtr<T> = Rc<T>;
#[cfg(feature = "threadsafe")]
pub type ComponentInstancePtr<T> = Arc<T>;

#[cfg(not(feature = "threadsafe"))]
pub type ComponentInstanceAnyPtr = ComponentInstancePtr<dyn Any + 'static>;
#[cfg(feature = "threadsafe")]
pub type ComponentInstanceAnyPtr = ComponentInstancePtr<dyn Any + Send + Sync + 'static>;

/// Shared error pointer returned by component factories.
#[cfg(not(feature = "threadsafe"))]
pub type ErrorPtr = Rc<dyn Error + 'static>;
/// Shared error pointer returned by component factories.
#[cfg(feature = "threadsafe")]
pub type ErrorPtr = Arc<dyn Error + Send + Sync + 'static>;

/// Converts any error into an [ErrorPtr], e.g. `.map_err(error_ptr)?` inside a factory.
#[cfg(feature = "threadsafe")]
pub fn error_ptr<E: Error + Send + Sync + 'static>(error: E) -> ErrorPtr {
    Arc::new(error) as ErrorPtr
}

/// Converts any error into an [ErrorPtr], e.g. `.map_err(error_ptr)?` inside a factory.
#[cfg(not(feature = "threadsafe"))]
pub fn error_ptr<E: Error + 'static>(error: E) -> ErrorPtr {
    Rc::new(error) as ErrorPtr
}

/// Tries to turn a type-erased instance into a concrete one.
pub fn downcast<T: Injectable>(
    id: &ComponentId,
    instance: ComponentInstanceAnyPtr,
) -> Result<ComponentInstancePtr<T>, ContainerError> {
    instance
        .downcast::<T>()
        .map_err(|_| ContainerError::IncompatibleComponent(id.clone()))
}

/// Generic, read-only provider of built component instances.
#[cfg_attr(test, automock)]
pub trait ComponentInstanceProvider {
    /// Returns the instance registered under given identity.
    fn instance(&self, id: &ComponentId) -> Result<ComponentInstanceAnyPtr, ContainerError>;

    /// Returns all instances whose identity has given type, regardless of qualifier, in
    /// construction order.
    fn instances(
        &self,
        type_id: TypeId,
    ) -> Result<Vec<(ComponentId, ComponentInstanceAnyPtr)>, ContainerError>;
}

/// Helper trait for [ComponentInstanceProvider] providing strongly-typed access.
pub trait TypedComponentInstanceProvider {
    /// Returns the unqualified instance of `T`.
    fn instance_typed<T: Injectable>(&self) -> Result<ComponentInstancePtr<T>, ContainerError>;

    /// Returns the instance of `T` registered with given qualifier.
    fn named_instance_typed<T: Injectable>(
        &self,
        qualifier: &str,
    ) -> Result<ComponentInstancePtr<T>, ContainerError>;

    /// Returns every instance of `T`, qualified or not.
    fn instances_typed<T: Injectable>(
        &self,
    ) -> Result<Vec<ComponentInstancePtr<T>>, ContainerError>;
}

impl<P: ComponentInstanceProvider + ?Sized> TypedComponentInstanceProvider for P {
    fn instance_typed<T: Injectable>(&self) -> Result<ComponentInstancePtr<T>, ContainerError> {
        let id = ComponentId::of::<T>();
        self.instance(&id)
            .and_then(|instance| downcast::<T>(&id, instance))
    }

    fn named_instance_typed<T: Injectable>(
        &self,
        qualifier: &str,
    ) -> Result<ComponentInstancePtr<T>, ContainerError> {
        let id = ComponentId::named::<T>(qualifier);
        self.instance(&id)
            .and_then(|instance| downcast::<T>(&id, instance))
    }

    fn instances_typed<T: Injectable>(
        &self,
    ) -> Result<Vec<ComponentInstancePtr<T>>, ContainerError> {
        self.instances(TypeId::of::<T>())?
            .into_iter()
            .map(|(id, instance)| downcast::<T>(&id, instance))
            .try_collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::component::ComponentId;
    use crate::error::ContainerError;
    use crate::instance_provider::{
        ComponentInstanceAnyPtr, ComponentInstancePtr, MockComponentInstanceProvider,
        TypedComponentInstanceProvider,
    };
    use mockall::predicate::*;
    use std::any::TypeId;

    #[derive(Debug, PartialEq)]
    struct TestComponent(i32);

    #[test]
    fn should_return_typed_instance() {
        let mut provider = MockComponentInstanceProvider::new();
        provider
            .expect_instance()
            .with(eq(ComponentId::of::<TestComponent>()))
            .times(1)
            .returning(|_| Ok(ComponentInstancePtr::new(TestComponent(5)) as ComponentInstanceAnyPtr));

        assert_eq!(*provider.instance_typed::<TestComponent>().unwrap(), TestComponent(5));
    }

    #[test]
    fn should_look_up_qualified_identity() {
        let mut provider = MockComponentInstanceProvider::new();
        provider
            .expect_instance()
            .with(eq(ComponentId::named::<TestComponent>("secondary")))
            .times(1)
            .returning(|_| Ok(ComponentInstancePtr::new(TestComponent(2)) as ComponentInstanceAnyPtr));

        assert_eq!(
            provider
                .named_instance_typed::<TestComponent>("secondary")
                .unwrap()
                .0,
            2
        );
    }

    #[test]
    fn should_reject_incompatible_instance() {
        let mut provider = MockComponentInstanceProvider::new();
        provider
            .expect_instance()
            .returning(|_| Ok(ComponentInstancePtr::new(1u8) as ComponentInstanceAnyPtr));

        assert!(matches!(
            provider.instance_typed::<TestComponent>().unwrap_err(),
            ContainerError::IncompatibleComponent(id) if id == ComponentId::of::<TestComponent>()
        ));
    }

    #[test]
    fn should_forward_provider_errors() {
        let mut provider = MockComponentInstanceProvider::new();
        provider
            .expect_instance()
            .returning(|_| Err(ContainerError::NotBuilt));

        assert!(matches!(
            provider.instance_typed::<TestComponent>().unwrap_err(),
            ContainerError::NotBuilt
        ));
    }

    #[test]
    fn should_return_all_typed_instances() {
        let mut provider = MockComponentInstanceProvider::new();
        provider
            .expect_instances()
            .with(eq(TypeId::of::<TestComponent>()))
            .times(1)
            .returning(|_| {
                Ok(vec![
                    (
                        ComponentId::of::<TestComponent>(),
                        ComponentInstancePtr::new(TestComponent(1)) as ComponentInstanceAnyPtr,
                    ),
                    (
                        ComponentId::named::<TestComponent>("other"),
                        ComponentInstancePtr::new(TestComponent(2)) as ComponentInstanceAnyPtr,
                    ),
                ])
            });

        let instances = provider.instances_typed::<TestComponent>().unwrap();
        assert_eq!(
            instances.iter().map(|instance| instance.0).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }
}
