//! Reading input files into one declaration model.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use heck::ToSnakeCase;
use optbuilder_engine::SourceModel;
use tracing::debug;

use crate::error::CliError;

/// Module path of the declarations in `path`: its file stem in snake case.
///
/// # Errors
///
/// Returns [`CliError::InvalidModuleName`] when the stem is not an
/// identifier.
pub fn package_of(path: &Utf8Path) -> Result<String, CliError> {
    let package = path
        .file_stem()
        .map(ToSnakeCase::to_snake_case)
        .filter(|stem| syn::parse_str::<syn::Ident>(stem).is_ok())
        .ok_or_else(|| CliError::InvalidModuleName(path.to_path_buf()))?;
    Ok(package)
}

/// Read every input into one model.
///
/// A trait implementation in one file attaches to a provider declared in
/// another when its self type is written as a path ending in the provider's
/// `package::Name`.
///
/// # Errors
///
/// Returns the first I/O, parse, or marker error.
pub fn load(inputs: &[Utf8PathBuf]) -> Result<SourceModel, CliError> {
    let mut model = SourceModel::default();
    for path in inputs {
        let package = package_of(path)?;
        let text = read(path)?;
        let file = syn::parse_file(&text).map_err(|source| CliError::Parse {
            path: path.clone(),
            source,
        })?;
        model
            .extend_from_items(&package, &file.items)
            .map_err(|source| CliError::Parse {
                path: path.clone(),
                source,
            })?;
        debug!(%path, %package, "read source file");
    }
    Ok(model)
}

fn read(path: &Utf8Path) -> Result<String, CliError> {
    let io_error = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| CliError::InvalidModuleName(path.to_path_buf()))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error)?;
    dir.read_to_string(name).map_err(io_error)
}
