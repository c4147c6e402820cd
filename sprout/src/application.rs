//! Core application framework functionality.

use crate::config::ApplicationConfig;
use crate::logging::install_tracing_logger;
use crate::runner::{ApplicationRunner, ApplicationRunnerPtr};
use config::ConfigError;
use derive_more::Constructor;
use itertools::Itertools;
use sprout_di::component::{ComponentId, Injectable};
use sprout_di::container::Container;
use sprout_di::instance_provider::{
    downcast, ComponentInstanceProvider, ComponentInstancePtr, ErrorPtr,
};
use sprout_di::ContainerError;
use std::cmp::Reverse;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Clone, Error, Debug)]
pub enum ApplicationError {
    #[error("Container error: {0}")]
    Container(#[from] ContainerError),
    #[error("Runner {runner} failed: {cause}")]
    Runner { runner: ComponentId, cause: ErrorPtr },
}

type RunnerResolver = fn(
    &Container,
    &ComponentId,
) -> Result<ComponentInstancePtr<ApplicationRunnerPtr>, ContainerError>;

#[derive(Constructor)]
struct RunnerRegistration {
    id: ComponentId,
    resolve: RunnerResolver,
}

fn resolve_runner<R: ApplicationRunner + Injectable>(
    container: &Container,
    id: &ComponentId,
) -> Result<ComponentInstancePtr<ApplicationRunnerPtr>, ContainerError> {
    container
        .instance(id)
        .and_then(|instance| downcast::<R>(id, instance))
        .map(|runner| runner as ComponentInstancePtr<ApplicationRunnerPtr>)
}

/// Creates an [Application] with the config taken from the environment. See
/// [ApplicationConfig::init_from_environment].
pub fn create_default(container: Container) -> Result<Application, ConfigError> {
    ApplicationConfig::init_from_environment()
        .map(|config| Application::new(container).with_config(config))
}

/// Main entrypoint for the application. Builds the [Container] and runs registered
/// [ApplicationRunners](ApplicationRunner).
pub struct Application {
    container: Container,
    config: ApplicationConfig,
    runners: Vec<RunnerRegistration>,
}

impl Application {
    /// Creates an application with the default config.
    pub fn new(container: Container) -> Self {
        Self {
            container,
            config: Default::default(),
            runners: vec![],
        }
    }

    pub fn with_config(mut self, config: ApplicationConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds a runner, which should be a component registered under given identity.
    pub fn with_runner<R: ApplicationRunner + Injectable>(mut self, id: ComponentId) -> Self {
        self.runners.push(RunnerRegistration::new(id, resolve_runner::<R>));
        self
    }

    #[inline]
    pub fn config(&self) -> &ApplicationConfig {
        &self.config
    }

    #[inline]
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Builds the container and runs all runners, highest priority first. Stops at the first
    /// runner error.
    pub fn run(&mut self) -> Result<(), ApplicationError> {
        if self.config.install_tracing_logger && !install_tracing_logger(&self.config) {
            debug!("Global logger already installed");
        }

        info!("Building application container...");
        self.container.build()?;

        info!("Searching for application runners...");

        let runners: Vec<_> = self
            .runners
            .iter()
            .map(|registration| {
                (registration.resolve)(&self.container, &registration.id)
                    .map(|runner| (&registration.id, runner))
            })
            .try_collect()?;

        info!("Running {} application runners...", runners.len());

        for (id, runner) in runners
            .into_iter()
            .sorted_by_key(|(_, runner)| Reverse(runner.priority()))
        {
            debug!("Running {}", id);

            runner.run().map_err(|cause| ApplicationError::Runner {
                runner: id.clone(),
                cause,
            })?;
        }

        Ok(())
    }
}
