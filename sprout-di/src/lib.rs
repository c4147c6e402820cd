//! Minimal IoC container. Components are described by
//! [ComponentDescriptor](component::ComponentDescriptor)s - an identity, the identities of their
//! dependencies and a factory - and registered in a [Container](container::Container). A single
//! build pass validates the dependency graph, rejecting unknown dependencies and cycles, and
//! constructs every component exactly once, dependencies first. Afterwards the container is
//! frozen and only serves lookups.
//!
//! Discovering components (e.g. via attributes or configuration files) is left to the caller -
//! the container only consumes descriptors.
//!
//! ### Features
//!
//! * `threadsafe` - use threadsafe pointers and `Send + Sync` trait bounds (enabled by default)

pub mod component;
pub mod component_registry;
pub mod container;
mod error;
pub mod graph;
pub mod instance_provider;
pub mod resolver;
pub mod scope;

pub use error::ContainerError;
