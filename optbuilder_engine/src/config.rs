//! Round configuration.
//!
//! [`GeneratorConfig`] is deserializable so hosts can layer it from files,
//! the environment, and command-line flags. Every field has a default.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How the registry treats two providers for the same type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateProviderPolicy {
    /// The later provider replaces the earlier one silently.
    LastWins,
    /// The later provider wins and a warning is reported.
    #[default]
    Warn,
    /// The round aborts with [`crate::GenerationError::DuplicateProvider`].
    Error,
}

impl DuplicateProviderPolicy {
    /// Parse a policy keyword, accepting `last_wins` or `last-wins`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use optbuilder_engine::DuplicateProviderPolicy;
    ///
    /// assert_eq!(
    ///     DuplicateProviderPolicy::parse("last-wins"),
    ///     Some(DuplicateProviderPolicy::LastWins)
    /// );
    /// ```
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "last_wins" => Some(Self::LastWins),
            "warn" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for DuplicateProviderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LastWins => "last_wins",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

/// Whether a marked declaration lacking the provider capability is fatal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStrictness {
    /// Report and skip the declaration.
    #[default]
    Lenient,
    /// Abort the round.
    Strict,
}

/// Settings for one generation round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Treatment of marked declarations without the provider capability.
    pub provider_strictness: ProviderStrictness,
    /// Treatment of two providers producing the same type.
    pub duplicate_providers: DuplicateProviderPolicy,
    /// Process aggregates in parallel when the `parallel` feature is on.
    pub parallel: bool,
    /// Path generated code uses to reach the runtime crate.
    pub crate_path: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider_strictness: ProviderStrictness::default(),
            duplicate_providers: DuplicateProviderPolicy::default(),
            parallel: true,
            crate_path: DEFAULT_CRATE_PATH.to_owned(),
        }
    }
}

/// Runtime crate path used when none is configured.
pub const DEFAULT_CRATE_PATH: &str = "::optbuilder";
