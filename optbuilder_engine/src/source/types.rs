//! Conversion of `syn` types into [`TypeDescriptor`]s.

use quote::ToTokens;
use syn::{GenericArgument, Path, PathArguments, Type};

use crate::model::TypeDescriptor;

/// Render a path as `a::b::C`, without generic arguments.
pub(crate) fn path_text(path: &Path) -> String {
    let segments = path
        .segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect::<Vec<_>>()
        .join("::");
    if path.leading_colon.is_some() {
        format!("::{segments}")
    } else {
        segments
    }
}

/// Returns the generic parameter if `ty` is `Option<T>`.
///
/// Only the last path segment is inspected, so `std::option::Option<T>`
/// matches as well. The check is not recursive.
pub(crate) fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(p) = ty else {
        return None;
    };
    if p.qself.is_some() {
        return None;
    }
    let last = p.path.segments.last()?;
    if last.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

fn opaque(ty: &Type) -> TypeDescriptor {
    TypeDescriptor::opaque(ty.to_token_stream().to_string())
}

/// Describe a declared field type.
///
/// `Option<T>` becomes `T` marked nullable; in `Option<Option<T>>` only the
/// outer layer is folded, so the inner `Option<T>` stays a named type. Shapes
/// the model cannot express structurally, such as references, tuples, or
/// trait objects, are kept as opaque text.
pub(crate) fn describe(ty: &Type) -> TypeDescriptor {
    match ty {
        Type::Paren(inner) => describe(&inner.elem),
        Type::Group(inner) => describe(&inner.elem),
        Type::Tuple(tuple) if tuple.elems.is_empty() => TypeDescriptor::unit(),
        Type::Array(array) => TypeDescriptor::array(
            describe(&array.elem),
            array.len.to_token_stream().to_string(),
        ),
        Type::Path(_) => option_inner(ty).map_or_else(
            || describe_path(ty),
            |inner| {
                let described = describe(inner);
                if described.nullable {
                    describe_path(inner).into_nullable()
                } else {
                    described.into_nullable()
                }
            },
        ),
        _ => opaque(ty),
    }
}

fn describe_path(ty: &Type) -> TypeDescriptor {
    let Type::Path(p) = ty else {
        return opaque(ty);
    };
    if p.qself.is_some() {
        return opaque(ty);
    }
    let segments = &p.path.segments;
    let Some(last) = segments.last() else {
        return opaque(ty);
    };
    if segments.iter().rev().skip(1).any(|s| !s.arguments.is_empty()) {
        return opaque(ty);
    }
    let args = match &last.arguments {
        PathArguments::None => Vec::new(),
        PathArguments::AngleBracketed(angle) => {
            let mut described = Vec::with_capacity(angle.args.len());
            for arg in &angle.args {
                let GenericArgument::Type(arg_ty) = arg else {
                    return opaque(ty);
                };
                described.push(describe(arg_ty));
            }
            described
        }
        PathArguments::Parenthesized(_) => return opaque(ty),
    };
    TypeDescriptor::named(path_text(&p.path)).with_args(args)
}
