use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{Config, ReportSettings, SimulationOverrides, SimulationSettings};

/// The file looked up when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "tradelog.toml";

/// Loads the application configuration.
///
/// Values come from the TOML file at `path` (or `tradelog.toml` in the working
/// directory, if present), overlaid with `TRADELOG_*` environment variables such as
/// `TRADELOG_SIMULATION__TRIALS=5000`. Anything left unset keeps its default.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(p) if !p.is_file() => return Err(ConfigError::MissingFile(p.to_path_buf())),
        Some(p) => config::File::from(p).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix("TRADELOG")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("simulation.drawdown_thresholds")
                .try_parsing(true),
        )
        .build()?;

    finish(builder)
}

/// Loads the configuration from an in-memory TOML document.
pub fn load_config_from_str(toml: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    finish(builder)
}

fn finish(builder: config::Config) -> Result<Config, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;
    tracing::debug!(?config, "Configuration loaded.");
    Ok(config)
}
