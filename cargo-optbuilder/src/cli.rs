//! Command-line interface definitions for `cargo-optbuilder`.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use optbuilder_engine::{DuplicateProviderPolicy, ProviderStrictness};

use crate::config::Overrides;

/// Entry point when invoked as `cargo optbuilder`.
#[derive(Debug, Parser)]
#[command(name = "cargo", bin_name = "cargo")]
pub enum CargoCli {
    /// Generate builders for `#[builder]` aggregates.
    Optbuilder(Args),
}

/// Artefact format written per builder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Rust items ready to `include!`.
    #[default]
    Rust,
    /// The structured builder description.
    Json,
}

impl OutputFormat {
    /// File extension for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Rust => "rs",
            Self::Json => "json",
        }
    }
}

/// Parsed CLI arguments for `cargo-optbuilder`.
#[derive(Debug, Parser)]
#[command(name = "cargo-optbuilder")]
#[command(about = "Generate builders with optional, defaulted parameters")]
#[command(version)]
pub struct Args {
    /// Rust source files forming one round; each file's stem is its module.
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<Utf8PathBuf>,
    /// Output directory for generated artefacts.
    #[arg(long, value_name = "path", default_value = "optbuilder-out")]
    pub out_dir: Utf8PathBuf,
    /// Artefact format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Rust)]
    pub format: OutputFormat,
    /// Configuration file used instead of `optbuilder.toml`.
    #[arg(long, value_name = "path")]
    pub config: Option<Utf8PathBuf>,
    /// Abort when a `#[provides]` type lacks a provider implementation.
    #[arg(long = "strict")]
    pub is_strict: bool,
    /// Treatment of two providers for the same type.
    #[arg(long, value_name = "policy", value_parser = parse_policy)]
    pub duplicate_providers: Option<DuplicateProviderPolicy>,
    /// Path generated code uses for the runtime crate.
    #[arg(long, value_name = "path")]
    pub crate_path: Option<String>,
    /// Process aggregates on one thread.
    #[arg(long = "no-parallel")]
    pub should_skip_parallel: bool,
}

impl Args {
    /// Configuration values given on the command line.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            provider_strictness: self.is_strict.then_some(ProviderStrictness::Strict),
            duplicate_providers: self.duplicate_providers,
            parallel: self.should_skip_parallel.then_some(false),
            crate_path: self.crate_path.clone(),
        }
    }
}

fn parse_policy(value: &str) -> Result<DuplicateProviderPolicy, String> {
    DuplicateProviderPolicy::parse(value)
        .ok_or_else(|| format!("unknown policy `{value}`; expected last_wins, warn, or error"))
}
