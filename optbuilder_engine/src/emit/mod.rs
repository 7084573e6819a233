//! Rust emission adapter.
//!
//! Renders a [`SynthesizedBuilderType`] as Rust items. The generated code
//! reaches the runtime crate through a configurable path and providers
//! through the paths chosen during classification, which are relative to
//! the aggregate's module.
//!
//! For an aggregate `Address` the output has this shape:
//!
//! ```text
//! pub struct AddressBuilder { street: Supplied<Option<String>>, ... }
//!
//! impl AddressBuilder {
//!     fn from_parts(street: Option<String>, ...) -> Self;
//!     pub fn new(/* mandatory */) -> Self;
//!     pub fn create<F: FnOnce(&mut Self)>(/* mandatory */, optbuilder_configure: F) -> Address;
//!     pub fn street<F: FnOnce() -> Option<String> + 'static>(&mut self, value: F) -> &mut Self;
//!     pub fn build(self) -> Address;
//! }
//! ```

#[cfg(test)]
mod tests;
mod tokens;

use proc_macro2::TokenStream;
use quote::quote;
use thiserror::Error;

use crate::synth::{
    BuildPlan, BuilderField, Branch, InitialValue, ProviderBinding, Resolution,
    SynthesizedBuilderType,
};

/// Errors raised while rendering a builder.
#[derive(Debug, Error)]
pub enum EmitError {
    /// A name is not a Rust identifier.
    #[error("`{name}` is not a valid identifier: {source}")]
    InvalidIdentifier {
        /// Offending name.
        name: String,
        /// Parser error.
        #[source]
        source: syn::Error,
    },

    /// A type cannot be rendered.
    #[error("cannot render type `{ty}`: {reason}")]
    InvalidType {
        /// Offending type text.
        ty: String,
        /// Why rendering failed.
        reason: String,
    },

    /// A default expression does not parse.
    #[error("`{expression}` is not a valid expression: {source}")]
    InvalidExpression {
        /// Offending expression text.
        expression: String,
        /// Parser error.
        #[source]
        source: syn::Error,
    },

    /// A path does not parse.
    #[error("`{path}` is not a valid path: {source}")]
    InvalidPath {
        /// Offending path text.
        path: String,
        /// Parser error.
        #[source]
        source: syn::Error,
    },

    /// A visibility scope does not parse.
    #[error("`{visibility}` is not a valid visibility: {source}")]
    InvalidVisibility {
        /// Offending visibility text.
        visibility: String,
        /// Parser error.
        #[source]
        source: syn::Error,
    },
}

/// Name of the generic parameter used by setters and `create`.
const CALLBACK: &str = "OptbuilderFn";

/// Render `builder` as Rust items.
///
/// `crate_path` is the path generated code uses for the runtime crate,
/// usually `::optbuilder`.
///
/// # Errors
///
/// Returns an [`EmitError`] when a name, type, expression, or path stored in
/// the description is not valid Rust.
///
/// # Examples
///
/// ```rust
/// use optbuilder_engine::{CollectingSink, Generator, GeneratorConfig, SourceModel, render};
///
/// let file: syn::File = syn::parse_quote! {
///     #[builder]
///     pub struct Flag { #[optional] on: bool }
/// };
/// let model = SourceModel::from_items("flags", &file.items)?;
/// let output = Generator::new(GeneratorConfig::default()).run(&model, &mut CollectingSink::default())?;
/// for builder in &output.builders {
///     let tokens = render(builder, "::optbuilder")?;
///     assert!(tokens.to_string().contains("FlagBuilder"));
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render(builder: &SynthesizedBuilderType, crate_path: &str) -> Result<TokenStream, EmitError> {
    let runtime = tokens::path(crate_path)?;
    let rt = quote!(#runtime);
    Renderer { builder, rt: &rt }.render()
}

struct Renderer<'a> {
    builder: &'a SynthesizedBuilderType,
    rt: &'a TokenStream,
}

impl Renderer<'_> {
    fn render(&self) -> Result<TokenStream, EmitError> {
        let builder = self.builder;
        let rt = self.rt;
        let name = tokens::ident(&builder.name)?;
        let target = tokens::ident(&builder.target)?;
        let vis = tokens::visibility(&builder.visibility)?;
        let callback = tokens::ident(CALLBACK)?;

        let doc = format!(
            " Builder for [`{}`] with optional, defaulted parameters.",
            builder.target
        );
        let mut slots = Vec::with_capacity(builder.fields.len());
        let mut parts = Vec::with_capacity(builder.fields.len());
        let mut stores = Vec::with_capacity(builder.fields.len());
        for field in &builder.fields {
            let field_name = tokens::ident(&field.name)?;
            let slot = tokens::slot(&field.declared_type, field.widened)?;
            slots.push(quote!(#field_name: #rt::Supplied<#slot>));
            parts.push(quote!(#field_name: #slot));
            stores.push(quote!(#field_name: #rt::Supplied::ready(#field_name)));
        }

        let (mandatory_params, mandatory_args) = self.mandatory()?;
        let initial = self.initial_values()?;
        let setters = self.setters()?;
        let build = self.build_body()?;

        let new_doc = format!(
            " Start a [`{}`] with every optional parameter at its default.",
            builder.name
        );
        let create_doc = format!(
            " Build a [`{}`] after letting `optbuilder_configure` adjust the builder.",
            builder.target
        );
        let default_impl = builder.factory.mandatory.is_empty().then(|| {
            quote! {
                #[automatically_derived]
                impl ::core::default::Default for #name {
                    fn default() -> Self {
                        Self::new()
                    }
                }
            }
        });

        Ok(quote! {
            #[doc = #doc]
            #[must_use]
            #vis struct #name {
                #(#slots,)*
            }

            #[automatically_derived]
            impl #name {
                fn from_parts(#(#parts),*) -> Self {
                    Self {
                        #(#stores,)*
                    }
                }

                #[doc = #new_doc]
                #[must_use]
                #vis fn new(#(#mandatory_params),*) -> Self {
                    Self::from_parts(#(#initial),*)
                }

                #[doc = #create_doc]
                #vis fn create<#callback>(#(#mandatory_params,)* optbuilder_configure: #callback) -> #target
                where
                    #callback: ::core::ops::FnOnce(&mut Self),
                {
                    let mut builder = Self::new(#(#mandatory_args),*);
                    optbuilder_configure(&mut builder);
                    builder.build()
                }

                #(#setters)*

                #build
            }

            #default_impl

            #[automatically_derived]
            impl ::core::fmt::Debug for #name {
                fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    f.debug_struct(::core::stringify!(#name)).finish_non_exhaustive()
                }
            }
        })
    }

    fn mandatory(&self) -> Result<(Vec<TokenStream>, Vec<TokenStream>), EmitError> {
        let mut params = Vec::new();
        let mut args = Vec::new();
        for field in &self.builder.fields {
            if !field.kind.is_mandatory() {
                continue;
            }
            let field_name = tokens::ident(&field.name)?;
            let declared = tokens::ty(&field.declared_type)?;
            params.push(quote!(#field_name: #declared));
            args.push(quote!(#field_name));
        }
        Ok((params, args))
    }

    /// Arguments `new` passes to `from_parts`, in field order.
    fn initial_values(&self) -> Result<Vec<TokenStream>, EmitError> {
        let defaults = &self.builder.factory.defaults;
        self.builder
            .fields
            .iter()
            .map(|field| {
                if field.kind.is_mandatory() {
                    let field_name = tokens::ident(&field.name)?;
                    return Ok(quote!(#field_name));
                }
                let initial = defaults
                    .iter()
                    .find(|binding| binding.field == field.name)
                    .map_or(&InitialValue::Unset, |binding| &binding.initial);
                match initial {
                    InitialValue::Null | InitialValue::Unset => Ok(quote!(::core::option::Option::None)),
                    InitialValue::Value(text) => {
                        let value = tokens::expr(text)?;
                        Ok(quote!(::core::option::Option::Some(#value)))
                    }
                }
            })
            .collect()
    }

    fn setters(&self) -> Result<Vec<TokenStream>, EmitError> {
        let rt = self.rt;
        let vis = tokens::visibility(&self.builder.visibility)?;
        let callback = tokens::ident(CALLBACK)?;
        self.builder
            .setters
            .iter()
            .map(|setter| {
                let setter_name = tokens::ident(&setter.name)?;
                let field_name = tokens::ident(&setter.field)?;
                let value_type = tokens::ty(&setter.value_type)?;
                let doc = format!(
                    " Set `{}`. The callback runs when the builder is built.",
                    setter.field
                );
                let stored = if setter.wraps {
                    quote!(#rt::Supplied::deferred(move || ::core::option::Option::Some(value())))
                } else {
                    quote!(#rt::Supplied::deferred(value))
                };
                Ok(quote! {
                    #[doc = #doc]
                    #vis fn #setter_name<#callback>(&mut self, value: #callback) -> &mut Self
                    where
                        #callback: ::core::ops::FnOnce() -> #value_type + 'static,
                    {
                        self.#field_name = #stored;
                        self
                    }
                })
            })
            .collect()
    }

    fn build_body(&self) -> Result<TokenStream, EmitError> {
        let builder = self.builder;
        let vis = tokens::visibility(&builder.visibility)?;
        let target = tokens::ident(&builder.target)?;
        let ctor = tokens::path(&builder.constructor_path)?;
        let doc = format!(
            " Evaluate every supplied callback and construct the [`{}`].",
            builder.target
        );

        let resolutions = builder
            .build
            .resolutions()
            .iter()
            .map(|resolution| {
                let field_name = tokens::ident(&resolution.field)?;
                Ok(match &resolution.strategy {
                    Resolution::Value => quote!(let #field_name = self.#field_name.resolve();),
                    Resolution::OrDefault(text) => {
                        let fallback = tokens::expr(text)?;
                        quote! {
                            let #field_name = self.#field_name.resolve().unwrap_or_else(|| #fallback);
                        }
                    }
                })
            })
            .collect::<Result<Vec<_>, EmitError>>()?;

        let body = match &builder.build {
            BuildPlan::Direct { .. } => {
                let inits = self.field_inits(|_| Ok(None))?;
                quote!(#ctor { #(#inits,)* })
            }
            BuildPlan::Branched {
                bindings, branches, ..
            } => self.branches(&ctor, bindings, branches)?,
        };

        Ok(quote! {
            #[doc = #doc]
            #vis fn build(self) -> #target {
                #(#resolutions)*
                #body
            }
        })
    }

    fn branches(
        &self,
        ctor: &syn::Path,
        bindings: &[ProviderBinding],
        branches: &[Branch],
    ) -> Result<TokenStream, EmitError> {
        let names = bindings
            .iter()
            .map(|binding| tokens::ident(&binding.field))
            .collect::<Result<Vec<_>, _>>()?;
        let arms = branches
            .iter()
            .map(|branch| {
                let patterns = names.iter().zip(bindings).map(|(binding_name, binding)| {
                    if branch.set.contains(&binding.field) {
                        quote!(::core::option::Option::Some(#binding_name))
                    } else {
                        quote!(::core::option::Option::None)
                    }
                });
                let patterns: Vec<_> = patterns.collect();
                let inits = self.field_inits(|field| {
                    if !branch.defaulted.contains(&field.name) {
                        return Ok(None);
                    }
                    bindings
                        .iter()
                        .find(|binding| binding.field == field.name)
                        .map(|binding| self.provider_call(binding))
                        .transpose()
                })?;
                Ok(quote! {
                    (#(#patterns,)*) => #ctor { #(#inits,)* },
                })
            })
            .collect::<Result<Vec<_>, EmitError>>()?;
        Ok(quote! {
            match (#(self.#names.resolve(),)*) {
                #(#arms)*
            }
        })
    }

    /// Field initialisers of the constructor call; `provided` returns the
    /// expression for fields taken from a provider in the current branch.
    fn field_inits<F>(&self, provided: F) -> Result<Vec<TokenStream>, EmitError>
    where
        F: Fn(&BuilderField) -> Result<Option<TokenStream>, EmitError>,
    {
        self.builder
            .fields
            .iter()
            .map(|field| {
                let field_name = tokens::ident(&field.name)?;
                Ok(match provided(field)? {
                    Some(value) => quote!(#field_name: #value),
                    None => quote!(#field_name),
                })
            })
            .collect()
    }

    fn provider_call(&self, binding: &ProviderBinding) -> Result<TokenStream, EmitError> {
        let rt = self.rt;
        let provider = tokens::path(&binding.provider)?;
        let produced = tokens::ty(&binding.produced)?;
        let instance = if binding.singleton {
            quote!(&#provider)
        } else {
            quote!(&<#provider as ::core::default::Default>::default())
        };
        Ok(quote!(<#provider as #rt::DefaultValueProvider<#produced>>::get(#instance)))
    }
}
