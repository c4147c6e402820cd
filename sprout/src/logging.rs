//! Default `tracing` logger installed by the [Application](crate::application::Application).

use crate::config::ApplicationConfig;
use tracing_subscriber::EnvFilter;

/// Installs a global fmt logger. `RUST_LOG` takes precedence over
/// [ApplicationConfig::log_filter]. Returns false if a global logger was already set.
pub fn install_tracing_logger(config: &ApplicationConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use crate::config::ApplicationConfig;
    use crate::logging::install_tracing_logger;

    #[test]
    fn should_not_replace_installed_logger() {
        let config = ApplicationConfig::default();

        install_tracing_logger(&config);
        assert!(!install_tracing_logger(&config));
    }
}
