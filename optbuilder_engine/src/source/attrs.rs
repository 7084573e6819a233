//! Marker attribute parsing.
//!
//! Markers are bare attributes so they double as derive helper attributes:
//!
//! - `#[builder]`, `#[builder(name = "CustomBuilder")]` on aggregates;
//! - `#[optional]` with an optional strategy on fields;
//! - `#[setter(name = "...")]` on fields;
//! - `#[provides]` on provider structs.

use quote::ToTokens;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Expr, Lit, LitStr};

use super::types::path_text;
use crate::model::{EnumPosition, ParameterDirective};

/// Attribute names recognised as markers.
pub const MARKERS: [&str; 4] = ["builder", "optional", "setter", "provides"];

/// Parsed `#[builder]` marker.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct BuilderAttr {
    pub name: Option<String>,
}

/// Whether `attr` is one of the marker attributes.
pub(crate) fn is_marker(attr: &Attribute) -> bool {
    MARKERS.iter().any(|marker| attr.path().is_ident(marker))
}

fn find<'a>(attrs: &'a [Attribute], marker: &str) -> syn::Result<Option<&'a Attribute>> {
    let mut found = attrs.iter().filter(|attr| attr.path().is_ident(marker));
    let first = found.next();
    if let Some(extra) = found.next() {
        return Err(syn::Error::new_spanned(
            extra,
            format!("`{marker}` may only be applied once"),
        ));
    }
    Ok(first)
}

fn lit_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    let literal = meta.value()?.parse::<Lit>()?;
    match literal {
        Lit::Str(value) => Ok(value),
        other => Err(syn::Error::new(other.span(), format!("{key} must be a string"))),
    }
}

fn unknown_key(meta: &ParseNestedMeta, marker: &str) -> syn::Error {
    let key = meta
        .path
        .get_ident()
        .map_or_else(|| path_text(&meta.path), ToString::to_string);
    meta.error(format!("unrecognised {marker} key `{key}`"))
}

/// Parse the `#[builder]` marker, if present.
pub(crate) fn builder_attr(attrs: &[Attribute]) -> syn::Result<Option<BuilderAttr>> {
    let Some(attr) = find(attrs, "builder")? else {
        return Ok(None);
    };
    let mut parsed = BuilderAttr::default();
    if matches!(attr.meta, syn::Meta::Path(_)) {
        return Ok(Some(parsed));
    }
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("name") {
            let name = lit_str(&meta, "name")?;
            syn::parse_str::<syn::Ident>(&name.value())
                .map_err(|_| syn::Error::new(name.span(), "name must be a valid identifier"))?;
            parsed.name = Some(name.value());
            Ok(())
        } else {
            Err(unknown_key(&meta, "builder"))
        }
    })?;
    Ok(Some(parsed))
}

/// Whether the `#[provides]` marker is present.
pub(crate) fn provides_attr(attrs: &[Attribute]) -> syn::Result<bool> {
    let Some(attr) = find(attrs, "provides")? else {
        return Ok(false);
    };
    attr.meta.require_path_only()?;
    Ok(true)
}

/// Parse the `#[setter(name = "...")]` marker, if present.
pub(crate) fn setter_attr(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let Some(attr) = find(attrs, "setter")? else {
        return Ok(None);
    };
    let mut name = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("name") {
            let value = lit_str(&meta, "name")?;
            syn::parse_str::<syn::Ident>(&value.value())
                .map_err(|_| syn::Error::new(value.span(), "name must be a valid identifier"))?;
            name = Some(value.value());
            Ok(())
        } else {
            Err(unknown_key(&meta, "setter"))
        }
    })?;
    name.map(Some)
        .ok_or_else(|| syn::Error::new_spanned(attr, "expected `setter(name = \"...\")`"))
}

/// Parse the `#[optional]` marker into a directive.
///
/// A field without the marker is [`ParameterDirective::None`].
pub(crate) fn optional_attr(attrs: &[Attribute]) -> syn::Result<ParameterDirective> {
    let Some(attr) = find(attrs, "optional")? else {
        return Ok(ParameterDirective::None);
    };
    if matches!(attr.meta, syn::Meta::Path(_)) {
        return Ok(ParameterDirective::Optional);
    }
    let mut directive: Option<ParameterDirective> = None;
    attr.parse_nested_meta(|meta| {
        let parsed = optional_strategy(&meta)?;
        if directive.is_some() {
            return Err(meta.error("`optional` accepts a single strategy"));
        }
        directive = Some(parsed);
        Ok(())
    })?;
    Ok(directive.unwrap_or(ParameterDirective::Optional))
}

fn optional_strategy(meta: &ParseNestedMeta) -> syn::Result<ParameterDirective> {
    if meta.path.is_ident("nullable") {
        return Ok(ParameterDirective::OptionalNullable);
    }
    if meta.path.is_ident("default") {
        let initializer = if meta.input.peek(syn::Token![=]) {
            let expr: Expr = meta.value()?.parse()?;
            Some(expr.to_token_stream().to_string())
        } else {
            None
        };
        return Ok(ParameterDirective::OptionalHasInitializer { initializer });
    }
    if meta.path.is_ident("enumerable") {
        let position = if meta.input.peek(syn::Token![=]) {
            let value = lit_str(meta, "enumerable")?;
            EnumPosition::parse(&value.value()).ok_or_else(|| {
                syn::Error::new(value.span(), "enumerable must be \"first\" or \"last\"")
            })?
        } else {
            EnumPosition::First
        };
        return Ok(ParameterDirective::OptionalEnumerable { position });
    }
    if meta.path.is_ident("provider") {
        let path: syn::Path = meta.value()?.parse()?;
        return Ok(ParameterDirective::OptionalValueProvider {
            provider: path_text(&path),
        });
    }
    Err(unknown_key(meta, "optional"))
}
