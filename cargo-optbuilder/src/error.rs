//! Error types for `cargo-optbuilder`.

use camino::Utf8PathBuf;
use optbuilder_engine::EmitError;
use thiserror::Error;

/// Errors surfaced by the `cargo-optbuilder` pipeline.
///
/// Generation problems are diagnostics, not errors; these cover the host's
/// own failures.
#[derive(Debug, Error)]
pub enum CliError {
    /// A configuration layer held invalid values.
    #[error("invalid configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    /// `--config` named a file that does not exist.
    #[error("configuration file {0} not found")]
    MissingConfig(Utf8PathBuf),

    /// Reading or writing a file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// File or directory involved.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// An input file is not valid Rust or holds a malformed marker.
    #[error("{path}: {source}")]
    Parse {
        /// Input file.
        path: Utf8PathBuf,
        /// Parser error.
        #[source]
        source: syn::Error,
    },

    /// An input file stem cannot serve as a module name.
    #[error("{0}: file stem is not a valid module name")]
    InvalidModuleName(Utf8PathBuf),

    /// A generated builder could not be rendered.
    #[error("cannot render {builder}: {source}")]
    Emit {
        /// Builder name.
        builder: String,
        /// Rendering error.
        #[source]
        source: EmitError,
    },

    /// A builder description could not be serialized.
    #[error("failed to serialize builder description: {0}")]
    Json(#[from] serde_json::Error),
}
