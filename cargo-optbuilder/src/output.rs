//! Output writers for `cargo-optbuilder`.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use heck::ToSnakeCase;
use optbuilder_engine::{SynthesizedBuilderType, render};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// File name of the artefact for `builder`.
#[must_use]
pub fn file_name(builder: &SynthesizedBuilderType, format: OutputFormat) -> String {
    format!("{}.{}", builder.name.to_snake_case(), format.extension())
}

/// Artefact contents for `builder`.
///
/// # Errors
///
/// Returns [`CliError::Emit`] or [`CliError::Json`] when the builder cannot
/// be rendered.
pub fn contents(
    builder: &SynthesizedBuilderType,
    format: OutputFormat,
    crate_path: &str,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Rust => {
            let tokens = render(builder, crate_path).map_err(|source| CliError::Emit {
                builder: builder.name.clone(),
                source,
            })?;
            Ok(format!(
                "// Generated by cargo-optbuilder for `{}::{}`. Do not edit.\n{tokens}\n",
                builder.package, builder.target
            ))
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(builder)?),
    }
}

/// Write one artefact per builder into `out_dir`, creating it if needed.
///
/// # Errors
///
/// Returns [`CliError::Io`] when the directory or a file cannot be written,
/// or a rendering error from [`contents`].
pub fn write_builders(
    out_dir: &Utf8Path,
    builders: &[SynthesizedBuilderType],
    format: OutputFormat,
    crate_path: &str,
) -> Result<Vec<Utf8PathBuf>, CliError> {
    let dir = open_out_dir(out_dir)?;
    builders
        .iter()
        .map(|builder| {
            let filename = file_name(builder, format);
            let target = out_dir.join(&filename);
            let content = contents(builder, format, crate_path)?;
            let io_error = |source| CliError::Io {
                path: target.clone(),
                source,
            };
            let mut file = dir
                .open_with(
                    &filename,
                    OpenOptions::new().write(true).create(true).truncate(true),
                )
                .map_err(io_error)?;
            file.write_all(content.as_bytes()).map_err(io_error)?;
            Ok(target)
        })
        .collect()
}

fn open_out_dir(path: &Utf8Path) -> Result<Dir, CliError> {
    let io_error = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    Dir::create_ambient_dir_all(path, ambient_authority()).map_err(io_error)?;
    Dir::open_ambient_dir(path, ambient_authority()).map_err(io_error)
}
