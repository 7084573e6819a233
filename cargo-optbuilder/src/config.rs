//! Layered configuration for a round.
//!
//! Lowest to highest precedence: built-in defaults, the TOML file, variables
//! prefixed with `OPTBUILDER_`, and command-line flags.

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use optbuilder_engine::{DuplicateProviderPolicy, GeneratorConfig, ProviderStrictness};
use serde::Serialize;

use crate::error::CliError;

/// File read from the working directory when `--config` is absent.
pub const CONFIG_FILE: &str = "optbuilder.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "OPTBUILDER_";

/// Values supplied on the command line; unset values leave lower layers
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Overrides {
    /// `--strict`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_strictness: Option<ProviderStrictness>,
    /// `--duplicate-providers`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_providers: Option<DuplicateProviderPolicy>,
    /// `--no-parallel`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,
    /// `--crate-path`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crate_path: Option<String>,
}

/// Assemble the configuration layers.
#[must_use]
pub fn figment(file: &Utf8Path, overrides: &Overrides) -> Figment {
    Figment::from(Serialized::defaults(GeneratorConfig::default()))
        .merge(Toml::file(file.as_std_path()))
        .merge(Env::prefixed(ENV_PREFIX))
        .merge(Serialized::defaults(overrides))
}

/// Load the round configuration.
///
/// # Errors
///
/// Returns [`CliError::MissingConfig`] when an explicit file does not exist
/// and [`CliError::Config`] when a layer holds invalid values.
pub fn load(explicit: Option<&Utf8Path>, overrides: &Overrides) -> Result<GeneratorConfig, CliError> {
    let file = match explicit {
        Some(path) if !path.is_file() => return Err(CliError::MissingConfig(path.to_path_buf())),
        Some(path) => path.to_path_buf(),
        None => Utf8PathBuf::from(CONFIG_FILE),
    };
    figment(&file, overrides)
        .extract()
        .map_err(|err| CliError::Config(Box::new(err)))
}
