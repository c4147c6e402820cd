//! Application framework based on the [sprout_di] container.
//!
//! With dependency injection in place, application components form a dependency graph managed by
//! the container instead of being wired by hand in `main()`. This crate provides the entrypoint
//! for such applications in the form of [Application](application::Application): it builds the
//! container, runs the registered [ApplicationRunners](runner::ApplicationRunner) and configures
//! supporting infrastructure, e.g. logging.
//!
//! ### Features
//!
//! * `threadsafe` - use threadsafe pointers and `Send + Sync` trait bounds (enabled by default)

pub mod application;
pub mod config;
pub mod logging;
pub mod runner;
