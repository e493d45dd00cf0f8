//! Configuration loading
//!
//! Layers, lowest priority first: built-in defaults, an optional `waze.toml`
//! in the working directory (or an explicit `--config` file), then `WAZE_*`
//! environment variables. Nested keys use a double underscore, e.g.
//! `WAZE_ROUTE_OPTIONS__ALTERNATIVES=2`.

use std::path::Path;

use integration_waze::WazeConfig;

/// Environment variable prefix
const ENV_PREFIX: &str = "WAZE";

/// Default configuration file name (extension resolved by the config crate)
const DEFAULT_FILE: &str = "waze";

/// Load the configuration from file and process environment
pub fn load(file: Option<&Path>) -> Result<WazeConfig, config::ConfigError> {
    load_with_env(file, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn load_with_env(
    file: Option<&Path>,
    env: config::Environment,
) -> Result<WazeConfig, config::ConfigError> {
    let file_source = match file {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_FILE).required(false),
    };

    let config = config::Config::builder()
        .add_source(file_source)
        .add_source(env)
        .build()?;

    config.try_deserialize()
}
