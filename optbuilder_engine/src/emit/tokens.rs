//! Conversion of model text back into tokens.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Expr, Ident, Path, Type};

use super::EmitError;
use crate::model::{TypeBase, TypeDescriptor, Visibility};

pub(super) fn ident(name: &str) -> Result<Ident, EmitError> {
    syn::parse_str(name).map_err(|source| EmitError::InvalidIdentifier {
        name: name.to_owned(),
        source,
    })
}

pub(super) fn path(text: &str) -> Result<Path, EmitError> {
    syn::parse_str(text).map_err(|source| EmitError::InvalidPath {
        path: text.to_owned(),
        source,
    })
}

pub(super) fn expr(text: &str) -> Result<Expr, EmitError> {
    syn::parse_str(text).map_err(|source| EmitError::InvalidExpression {
        expression: text.to_owned(),
        source,
    })
}

/// Tokens for a declared type, wrapping nullable types in `Option`.
pub(super) fn ty(descriptor: &TypeDescriptor) -> Result<TokenStream, EmitError> {
    let inner = match &descriptor.base {
        TypeBase::Unit => quote!(()),
        TypeBase::Named(text) => {
            let base = path(text)?;
            let args = descriptor
                .args
                .iter()
                .map(ty)
                .collect::<Result<Vec<_>, _>>()?;
            if args.is_empty() {
                quote!(#base)
            } else {
                quote!(#base<#(#args),*>)
            }
        }
        TypeBase::Array { len } => {
            let element = descriptor
                .args
                .first()
                .ok_or_else(|| EmitError::InvalidType {
                    ty: descriptor.to_string(),
                    reason: "array without element type".to_owned(),
                })
                .and_then(ty)?;
            let length = expr(len)?;
            quote!([#element; #length])
        }
        TypeBase::Opaque(text) => {
            let parsed: Type = syn::parse_str(text).map_err(|source| EmitError::InvalidType {
                ty: text.clone(),
                reason: source.to_string(),
            })?;
            quote!(#parsed)
        }
    };
    Ok(if descriptor.nullable {
        quote!(::core::option::Option<#inner>)
    } else {
        inner
    })
}

/// Tokens for a slot holding `descriptor`, widened to `Option` when needed.
pub(super) fn slot(descriptor: &TypeDescriptor, widened: bool) -> Result<TokenStream, EmitError> {
    let declared = ty(descriptor)?;
    Ok(if widened {
        quote!(::core::option::Option<#declared>)
    } else {
        declared
    })
}

pub(super) fn visibility(visibility: &Visibility) -> Result<TokenStream, EmitError> {
    match visibility {
        Visibility::Public => Ok(quote!(pub)),
        Visibility::Private => Ok(TokenStream::new()),
        Visibility::Internal { scope } => {
            let text = format!("pub({scope})");
            let parsed: syn::Visibility =
                syn::parse_str(&text).map_err(|source| EmitError::InvalidVisibility {
                    visibility: text.clone(),
                    source,
                })?;
            Ok(quote!(#parsed))
        }
    }
}
