//! Source spans of declarations, collected before markers are stripped.
//!
//! Diagnostics carry module paths and names only, so errors are mapped back
//! to the identifier of the declaration or field they refer to.

use std::collections::HashMap;

use optbuilder_engine::Anchor;
use proc_macro2::Span;
use syn::{Fields, Item};

#[derive(Debug)]
pub(crate) struct SpanIndex {
    fallback: Span,
    declarations: HashMap<(String, String), Span>,
    parameters: HashMap<(String, String, String), Span>,
}

impl SpanIndex {
    pub(crate) fn new(package: &str, items: &[Item], fallback: Span) -> Self {
        let mut index = Self {
            fallback,
            declarations: HashMap::new(),
            parameters: HashMap::new(),
        };
        index.items(package, items);
        index
    }

    /// Span of the parameter named by `anchor`, else its declaration, else
    /// the module.
    pub(crate) fn locate(&self, anchor: &Anchor) -> Span {
        let declaration = (anchor.package.clone(), anchor.declaration.clone());
        anchor
            .parameter
            .as_ref()
            .and_then(|parameter| {
                self.parameters.get(&(
                    anchor.package.clone(),
                    anchor.declaration.clone(),
                    parameter.clone(),
                ))
            })
            .or_else(|| self.declarations.get(&declaration))
            .copied()
            .unwrap_or(self.fallback)
    }

    fn items(&mut self, package: &str, items: &[Item]) {
        for item in items {
            match item {
                Item::Struct(structure) => {
                    self.declaration(package, &structure.ident);
                    self.fields(package, &structure.ident, &structure.fields);
                }
                Item::Enum(enumeration) => {
                    self.declaration(package, &enumeration.ident);
                    for variant in &enumeration.variants {
                        self.fields(package, &enumeration.ident, &variant.fields);
                    }
                }
                Item::Mod(module) => {
                    if let Some((_, nested)) = &module.content {
                        let path = format!("{package}::{}", module.ident);
                        self.items(&path, nested);
                    }
                }
                _ => {}
            }
        }
    }

    fn declaration(&mut self, package: &str, ident: &syn::Ident) {
        self.declarations
            .entry((package.to_owned(), ident.to_string()))
            .or_insert_with(|| ident.span());
    }

    fn fields(&mut self, package: &str, owner: &syn::Ident, fields: &Fields) {
        for field in fields {
            if let Some(ident) = &field.ident {
                self.parameters
                    .entry((package.to_owned(), owner.to_string(), ident.to_string()))
                    .or_insert_with(|| ident.span());
            }
        }
    }
}
