mod settings;

use config::{Config, ConfigError, Environment, File};

pub use settings::{
    ClientSettings, LogSettings, PartialSettings, ServerSettings, Settings,
};

/// Prefix of the environment variables read by `load_config`.
pub const ENV_PREFIX: &str = "MEMQ";

/// Loads the configuration from `config/default.*` and `MEMQ_*` environment
/// variables, merged over the defaults.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from("config/default")
}

/// Same as `load_config`, reading the optional file at `path` (extension
/// resolved by the `config` crate).
///
/// Nested keys use `__` in the environment, e.g. `MEMQ_SERVER__BASE_PATH`.
pub fn load_config_from(path: &str) -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(Settings::merge(partial))
}
