//! Procedural macros for `optbuilder`.
//!
//! [`macro@generate`] runs one generation round over the items of an inline
//! module and appends the generated builders next to their aggregates.
//! [`Declare`] registers the marker attributes on items that are processed
//! by the `cargo-optbuilder` tool instead.

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemMod, parse_macro_input};

mod args;
mod expand;
mod spans;
mod warnings;

/// Generate builders for the `#[builder]` aggregates of an inline module.
///
/// Accepted arguments:
///
/// - `crate = "path"`: path generated code uses for the runtime crate.
/// - `strict`: abort when a `#[provides]` type lacks a
///   `DefaultValueProvider` implementation.
/// - `duplicate_providers = "last_wins" | "warn" | "error"`: treatment of two
///   providers for the same type.
#[proc_macro_attribute]
pub fn generate(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut args = args::GenerateArgs::default();
    let parser = syn::meta::parser(|meta| args.parse(&meta));
    parse_macro_input!(attr with parser);
    let module = parse_macro_input!(item as ItemMod);
    expand::expand(args.into_config(), module)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Register `builder`, `optional`, `setter`, and `provides` as inert helper
/// attributes. Emits nothing.
#[proc_macro_derive(Declare, attributes(builder, optional, setter, provides))]
pub fn derive_declare(input: TokenStream) -> TokenStream {
    match syn::parse::<DeriveInput>(input) {
        Ok(_) => TokenStream::new(),
        Err(err) => err.to_compile_error().into(),
    }
}
