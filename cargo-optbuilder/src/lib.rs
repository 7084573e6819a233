//! Library interface for `cargo-optbuilder`.
//!
//! Runs one generation round over a set of Rust source files and writes one
//! artefact per generated builder. Use it when the builders should live in
//! checked-in files rather than be expanded by `#[optbuilder::generate]`;
//! annotate the sources with `#[derive(optbuilder::Declare)]` so the markers
//! compile.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod sources;

use camino::Utf8PathBuf;
use optbuilder_engine::{CollectingSink, Diagnostic, Generator, RoundOutput};
use tracing::{debug, warn};

pub use crate::cli::{Args, CargoCli, OutputFormat};
pub use crate::error::CliError;

/// Result of one invocation.
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    /// Artefacts written, in aggregate order.
    pub written: Vec<Utf8PathBuf>,
    /// Diagnostics reported by the round.
    pub diagnostics: Vec<Diagnostic>,
}

impl Outcome {
    /// Whether any error diagnostic was reported.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Load configuration, run the round, and write the artefacts.
///
/// # Errors
///
/// Returns a [`CliError`] for configuration, input, or output failures.
/// Generation problems are returned as diagnostics in the [`Outcome`].
pub fn run(args: &Args) -> Result<Outcome, CliError> {
    let config = config::load(args.config.as_deref(), &args.overrides())?;
    debug!(?config, inputs = args.inputs.len(), "loaded configuration");
    let model = sources::load(&args.inputs)?;

    let generator = Generator::new(config);
    let mut sink = CollectingSink::default();
    let round = generator.run(&model, &mut sink).unwrap_or_else(|error| {
        warn!(%error, "generation round aborted");
        RoundOutput::default()
    });
    let written = output::write_builders(
        &args.out_dir,
        &round.builders,
        args.format,
        &generator.config().crate_path,
    )?;
    debug!(written = written.len(), failed = round.failed.len(), "round finished");
    Ok(Outcome {
        written,
        diagnostics: sink.into_inner(),
    })
}
