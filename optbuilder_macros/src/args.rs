//! Arguments of `#[optbuilder::generate(...)]`.

use optbuilder_engine::{DuplicateProviderPolicy, GeneratorConfig, ProviderStrictness};
use syn::LitStr;
use syn::meta::ParseNestedMeta;

#[derive(Debug, Default)]
pub(crate) struct GenerateArgs {
    crate_path: Option<String>,
    strict: bool,
    duplicate_providers: Option<DuplicateProviderPolicy>,
}

impl GenerateArgs {
    pub(crate) fn parse(&mut self, meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
        if meta.path.is_ident("crate") {
            let lit: LitStr = meta.value()?.parse()?;
            syn::parse_str::<syn::Path>(&lit.value())
                .map_err(|e| syn::Error::new(lit.span(), e))?;
            return set_once(&mut self.crate_path, lit.value(), meta, "crate");
        }
        if meta.path.is_ident("strict") {
            if self.strict {
                return Err(meta.error("duplicate `strict` option"));
            }
            self.strict = true;
            return Ok(());
        }
        if meta.path.is_ident("duplicate_providers") {
            let lit: LitStr = meta.value()?.parse()?;
            let policy = DuplicateProviderPolicy::parse(&lit.value()).ok_or_else(|| {
                syn::Error::new(
                    lit.span(),
                    "expected \"last_wins\", \"warn\", or \"error\"",
                )
            })?;
            return set_once(&mut self.duplicate_providers, policy, meta, "duplicate_providers");
        }
        Err(meta.error("unsupported optbuilder option"))
    }

    pub(crate) fn into_config(self) -> GeneratorConfig {
        let mut config = GeneratorConfig::default();
        if self.strict {
            config.provider_strictness = ProviderStrictness::Strict;
        }
        if let Some(policy) = self.duplicate_providers {
            config.duplicate_providers = policy;
        }
        if let Some(path) = self.crate_path {
            config.crate_path = path;
        }
        config
    }
}

fn set_once<T>(
    slot: &mut Option<T>,
    value: T,
    meta: &ParseNestedMeta<'_>,
    key: &str,
) -> syn::Result<()> {
    if slot.is_some() {
        return Err(meta.error(format!("duplicate `{key}` option")));
    }
    *slot = Some(value);
    Ok(())
}
