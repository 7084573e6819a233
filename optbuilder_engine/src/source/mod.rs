//! Rust source adapter.
//!
//! Reads marker attributes from `syn` items and fills a [`DeclarationSet`].
//! Every struct is a provider candidate; `#[provides]` marks it for type
//! matching, and `impl Trait<T> for Name` blocks anywhere in the round supply
//! its capabilities. Every field-less enum is an enumeration.

mod attrs;
mod types;

use syn::{Fields, Item, ItemEnum, ItemImpl, ItemStruct, Type};

pub use attrs::MARKERS;

use crate::model::{
    AggregateDeclaration, Constructor, ConstructorParameter, DeclarationModel, DeclarationSet,
    EnumDeclaration, ProviderDeclaration, ProviderShape, TypeDescriptor, Visibility, qualify,
};
use attrs::{builder_attr, is_marker, optional_attr, provides_attr, setter_attr};
use types::{describe, path_text};

/// Declarations read from Rust items.
#[derive(Debug, Clone, Default)]
pub struct SourceModel {
    declarations: DeclarationSet,
    unattached: Vec<Capability>,
}

/// A trait implementation waiting to be attached to its provider.
#[derive(Debug, Clone)]
struct Capability {
    package: String,
    self_path: String,
    capability: TypeDescriptor,
}

impl SourceModel {
    /// Read `items` declared in module `package`.
    ///
    /// # Errors
    ///
    /// Returns a spanned error for the first malformed marker attribute.
    pub fn from_items(package: &str, items: &[Item]) -> syn::Result<Self> {
        let mut model = Self::default();
        model.extend_from_items(package, items)?;
        Ok(model)
    }

    /// Read a parsed file whose module path is `package`.
    ///
    /// # Errors
    ///
    /// See [`Self::from_items`].
    pub fn from_file(package: &str, file: &syn::File) -> syn::Result<Self> {
        Self::from_items(package, &file.items)
    }

    /// Add the declarations of `items` to this model.
    ///
    /// A trait implementation read before its provider is kept and attached
    /// once the provider is read, so files of one round may be added in any
    /// order.
    ///
    /// # Errors
    ///
    /// See [`Self::from_items`].
    pub fn extend_from_items(&mut self, package: &str, items: &[Item]) -> syn::Result<()> {
        let mut collector = Collector::default();
        collector.items(package, items)?;
        let Collector {
            found,
            capabilities,
        } = collector;
        self.declarations.extend(found);
        self.unattached.extend(capabilities);
        let pending = std::mem::take(&mut self.unattached);
        self.unattached = pending
            .into_iter()
            .filter_map(|capability| attach(&mut self.declarations.providers, capability))
            .collect();
        Ok(())
    }

    /// Declarations read so far.
    #[must_use]
    pub const fn declarations(&self) -> &DeclarationSet {
        &self.declarations
    }

    /// Take the declarations.
    #[must_use]
    pub fn into_declarations(self) -> DeclarationSet {
        self.declarations
    }
}

impl DeclarationModel for SourceModel {
    fn aggregates(&self) -> &[AggregateDeclaration] {
        self.declarations.aggregates()
    }

    fn providers(&self) -> &[ProviderDeclaration] {
        self.declarations.providers()
    }

    fn enumeration(&self, ty: &TypeDescriptor, package: &str) -> Option<&EnumDeclaration> {
        self.declarations.enumeration(ty, package)
    }
}

/// Attach `pending` to its provider, handing it back when none matches.
fn attach(providers: &mut [ProviderDeclaration], pending: Capability) -> Option<Capability> {
    let qualified_self = pending.self_path.contains("::");
    let simple = pending
        .self_path
        .rsplit("::")
        .next()
        .unwrap_or(pending.self_path.as_str());
    let target = providers.iter_mut().rev().find(|provider| {
        provider.name == simple
            && (provider.package == pending.package
                || (qualified_self && names_provider(&pending.self_path, provider)))
    });
    match target {
        Some(provider) => {
            provider.capabilities.push(pending.capability);
            None
        }
        None => Some(pending),
    }
}

/// Whether `path` is the provider's qualified name, possibly behind a prefix.
fn names_provider(path: &str, provider: &ProviderDeclaration) -> bool {
    let qualified = provider.qualified_name();
    path == qualified || path.ends_with(&format!("::{qualified}"))
}

#[derive(Default)]
struct Collector {
    found: DeclarationSet,
    capabilities: Vec<Capability>,
}

impl Collector {
    fn items(&mut self, package: &str, items: &[Item]) -> syn::Result<()> {
        for item in items {
            match item {
                Item::Struct(structure) => self.structure(package, structure)?,
                Item::Enum(enumeration) => self.enumeration(package, enumeration)?,
                Item::Impl(implementation) => self.implementation(package, implementation),
                Item::Mod(module) => {
                    if let Some((_, nested)) = &module.content {
                        let path = qualify(package, &module.ident.to_string());
                        self.items(&path, nested)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn structure(&mut self, package: &str, item: &ItemStruct) -> syn::Result<()> {
        let name = item.ident.to_string();
        let marked = provides_attr(&item.attrs)?;
        self.found.providers.push(ProviderDeclaration {
            name: name.clone(),
            package: package.to_owned(),
            shape: if matches!(item.fields, Fields::Unit) {
                ProviderShape::Singleton
            } else {
                ProviderShape::Instantiable
            },
            marked,
            capabilities: Vec::new(),
        });
        let Some(builder) = builder_attr(&item.attrs)? else {
            return Ok(());
        };
        let constructors = match &item.fields {
            Fields::Named(_) => vec![Constructor {
                path: name.clone(),
                parameters: parameters(&item.fields)?,
            }],
            Fields::Unnamed(_) | Fields::Unit => Vec::new(),
        };
        self.found.aggregates.push(AggregateDeclaration {
            name,
            package: package.to_owned(),
            visibility: visibility(&item.vis),
            builder_name_override: builder.name,
            generic: !item.generics.params.is_empty(),
            constructors,
        });
        Ok(())
    }

    fn enumeration(&mut self, package: &str, item: &ItemEnum) -> syn::Result<()> {
        let name = item.ident.to_string();
        let fieldless = item.generics.params.is_empty()
            && item
                .variants
                .iter()
                .all(|variant| matches!(variant.fields, Fields::Unit));
        if fieldless {
            self.found.enums.push(EnumDeclaration {
                name: name.clone(),
                package: package.to_owned(),
                variants: item.variants.iter().map(|v| v.ident.to_string()).collect(),
            });
        }
        let Some(builder) = builder_attr(&item.attrs)? else {
            return Ok(());
        };
        // Tuple variants count towards ambiguity but never stand alone.
        let addressable = item
            .variants
            .iter()
            .any(|variant| !matches!(variant.fields, Fields::Unnamed(_)));
        let constructors = if addressable {
            item.variants
                .iter()
                .map(|variant| {
                    Ok(Constructor {
                        path: format!("{name}::{}", variant.ident),
                        parameters: parameters(&variant.fields)?,
                    })
                })
                .collect::<syn::Result<Vec<_>>>()?
        } else {
            Vec::new()
        };
        self.found.aggregates.push(AggregateDeclaration {
            name,
            package: package.to_owned(),
            visibility: visibility(&item.vis),
            builder_name_override: builder.name,
            generic: !item.generics.params.is_empty(),
            constructors,
        });
        Ok(())
    }

    fn implementation(&mut self, package: &str, item: &ItemImpl) {
        let Some((None, trait_path, _)) = &item.trait_ else {
            return;
        };
        let Type::Path(self_ty) = item.self_ty.as_ref() else {
            return;
        };
        let capability = describe(&Type::Path(syn::TypePath {
            qself: None,
            path: trait_path.clone(),
        }));
        self.capabilities.push(Capability {
            package: package.to_owned(),
            self_path: path_text(&self_ty.path),
            capability,
        });
    }
}

fn parameters(fields: &Fields) -> syn::Result<Vec<ConstructorParameter>> {
    fields
        .iter()
        .filter_map(|field| field.ident.as_ref().map(|ident| (ident, field)))
        .map(|(ident, field)| {
            Ok(ConstructorParameter {
                name: ident.to_string(),
                declared_type: describe(&field.ty),
                setter_name_override: setter_attr(&field.attrs)?,
                directive: optional_attr(&field.attrs)?,
            })
        })
        .collect()
}

fn visibility(vis: &syn::Visibility) -> Visibility {
    match vis {
        syn::Visibility::Public(_) => Visibility::Public,
        syn::Visibility::Inherited => Visibility::Private,
        syn::Visibility::Restricted(restricted) => {
            let scope = path_text(&restricted.path);
            if scope == "self" {
                Visibility::Private
            } else if restricted.in_token.is_some() {
                Visibility::Internal {
                    scope: format!("in {scope}"),
                }
            } else {
                Visibility::Internal { scope }
            }
        }
    }
}

/// Remove marker attributes from `items`, their fields, and nested inline
/// modules, leaving everything else untouched.
pub fn strip_markers(items: &mut [Item]) {
    for item in items {
        match item {
            Item::Struct(structure) => {
                structure.attrs.retain(|attr| !is_marker(attr));
                strip_fields(&mut structure.fields);
            }
            Item::Enum(enumeration) => {
                enumeration.attrs.retain(|attr| !is_marker(attr));
                for variant in &mut enumeration.variants {
                    variant.attrs.retain(|attr| !is_marker(attr));
                    strip_fields(&mut variant.fields);
                }
            }
            Item::Mod(module) => {
                if let Some((_, nested)) = &mut module.content {
                    strip_markers(nested);
                }
            }
            _ => {}
        }
    }
}

fn strip_fields(fields: &mut Fields) {
    for field in fields.iter_mut() {
        field.attrs.retain(|attr| !is_marker(attr));
    }
}
