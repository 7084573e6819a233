//! Declaration model consumed by a generation round.
//!
//! Hosts describe their sources with these types and expose them through
//! [`DeclarationModel`]. Nothing here performs I/O; the `source` module is
//! one host that fills the model from `syn` items.

mod directive;
#[cfg(test)]
mod tests;
mod types;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub use directive::{EnumPosition, ParameterDirective};
pub use types::{TypeBase, TypeDescriptor};

use crate::error::GenerationError;

/// Visibility of a declaration, carried over to its generated builder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "level")]
pub enum Visibility {
    /// Visible wherever the package is.
    #[default]
    Public,
    /// Visible inside a restricted scope such as `crate` or `super`.
    Internal {
        /// Scope as written, e.g. `crate` or `in crate::shapes`.
        scope: String,
    },
    /// Visible only inside the declaring module.
    Private,
}

/// One constructor parameter in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorParameter {
    /// Parameter (field) name.
    pub name: String,
    /// Declared type.
    pub declared_type: TypeDescriptor,
    /// Setter name requested in source, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setter_name_override: Option<String>,
    /// Marker attached to the parameter.
    #[serde(default)]
    pub directive: ParameterDirective,
}

impl ConstructorParameter {
    /// A parameter with no setter override.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        declared_type: TypeDescriptor,
        directive: ParameterDirective,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type,
            setter_name_override: None,
            directive,
        }
    }

    /// Request a custom setter name.
    #[must_use]
    pub fn with_setter(mut self, setter: impl Into<String>) -> Self {
        self.setter_name_override = Some(setter.into());
        self
    }

    /// Name the builder's setter for this parameter uses.
    #[must_use]
    pub fn setter_name(&self) -> &str {
        self.setter_name_override
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.name)
    }
}

/// An addressable constructor of an aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constructor {
    /// Construction path relative to the package, e.g. `Address` or
    /// `Shape::Circle`.
    pub path: String,
    /// Ordered parameters.
    pub parameters: Vec<ConstructorParameter>,
}

/// A type marked for builder generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateDeclaration {
    /// Simple type name.
    pub name: String,
    /// Module path the type lives in.
    pub package: String,
    /// Declared visibility.
    #[serde(default)]
    pub visibility: Visibility,
    /// Builder name requested in source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builder_name_override: Option<String>,
    /// Whether the type declares generic or lifetime parameters.
    #[serde(default)]
    pub generic: bool,
    /// Every addressable constructor.
    pub constructors: Vec<Constructor>,
}

impl AggregateDeclaration {
    /// A public, non-generic aggregate with a single constructor named after
    /// the type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use optbuilder_engine::{AggregateDeclaration, ConstructorParameter, ParameterDirective, TypeDescriptor};
    ///
    /// let decl = AggregateDeclaration::new(
    ///     "shop",
    ///     "Order",
    ///     vec![ConstructorParameter::new("id", TypeDescriptor::named("u64"), ParameterDirective::None)],
    /// );
    /// assert_eq!(decl.resolve_generated_name(), "OrderBuilder");
    /// ```
    #[must_use]
    pub fn new(
        package: impl Into<String>,
        name: impl Into<String>,
        parameters: Vec<ConstructorParameter>,
    ) -> Self {
        let type_name: String = name.into();
        Self {
            constructors: vec![Constructor {
                path: type_name.clone(),
                parameters,
            }],
            name: type_name,
            package: package.into(),
            visibility: Visibility::Public,
            builder_name_override: None,
            generic: false,
        }
    }

    /// Name of the generated builder: the non-empty override, otherwise
    /// `<Name>Builder`.
    #[must_use]
    pub fn resolve_generated_name(&self) -> String {
        self.builder_name_override
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(|| format!("{}Builder", self.name), ToOwned::to_owned)
    }

    /// Qualified name used in logs and diagnostics.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        qualify(&self.package, &self.name)
    }

    /// The single constructor of the aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::NoConstructorFound`] when there is none and
    /// [`GenerationError::AmbiguousConstructor`] when there are several.
    pub fn constructor(&self) -> Result<&Constructor, GenerationError> {
        match self.constructors.as_slice() {
            [only] => Ok(only),
            [] => Err(GenerationError::NoConstructorFound {
                aggregate: self.name.clone(),
            }),
            many => Err(GenerationError::AmbiguousConstructor {
                aggregate: self.name.clone(),
                count: many.len(),
            }),
        }
    }

    /// Ordered parameters of the single constructor.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::constructor`] failures and returns
    /// [`GenerationError::DuplicateParameter`] when two parameters share a
    /// name.
    pub fn constructor_parameters(&self) -> Result<&[ConstructorParameter], GenerationError> {
        let parameters = &self.constructor()?.parameters;
        let mut seen = BTreeSet::new();
        for parameter in parameters {
            if !seen.insert(parameter.name.as_str()) {
                return Err(GenerationError::DuplicateParameter {
                    aggregate: self.name.clone(),
                    parameter: parameter.name.clone(),
                });
            }
        }
        Ok(parameters)
    }
}

/// A field-less enum usable as an enumeration default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDeclaration {
    /// Simple type name.
    pub name: String,
    /// Module path the enum lives in.
    pub package: String,
    /// Variant names in declaration order.
    pub variants: Vec<String>,
}

impl EnumDeclaration {
    /// The variant at `position`.
    #[must_use]
    pub fn variant(&self, position: EnumPosition) -> Option<&str> {
        match position {
            EnumPosition::First => self.variants.first(),
            EnumPosition::Last => self.variants.last(),
        }
        .map(String::as_str)
    }

    /// Qualified name of the enum.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        qualify(&self.package, &self.name)
    }
}

/// How a provider is reached when its value is needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderShape {
    /// A unit value: the type itself is the instance.
    Singleton,
    /// A type that must be instantiated before use.
    #[default]
    Instantiable,
}

/// A declaration that may act as a default value provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDeclaration {
    /// Simple type name.
    pub name: String,
    /// Module path the provider lives in.
    pub package: String,
    /// Singleton or instantiable.
    pub shape: ProviderShape,
    /// Whether the declaration carries the provider marker.
    pub marked: bool,
    /// Traits the declaration implements.
    #[serde(default)]
    pub capabilities: Vec<TypeDescriptor>,
}

impl ProviderDeclaration {
    /// Qualified name of the provider.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        qualify(&self.package, &self.name)
    }
}

/// Read access to the declarations of one round.
///
/// Implementations must be shareable across threads because aggregates may
/// be processed in parallel.
pub trait DeclarationModel: Sync {
    /// Aggregates marked for generation, in source order.
    fn aggregates(&self) -> &[AggregateDeclaration];

    /// Every provider candidate, marked or not.
    fn providers(&self) -> &[ProviderDeclaration];

    /// The enumeration `ty` refers to when written in module `package`.
    fn enumeration(&self, ty: &TypeDescriptor, package: &str) -> Option<&EnumDeclaration>;
}

/// A plain in-memory [`DeclarationModel`].
///
/// Useful for hosts that build declarations by hand or load them from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationSet {
    /// Aggregates marked for generation.
    #[serde(default)]
    pub aggregates: Vec<AggregateDeclaration>,
    /// Provider candidates.
    #[serde(default)]
    pub providers: Vec<ProviderDeclaration>,
    /// Known enumerations.
    #[serde(default)]
    pub enums: Vec<EnumDeclaration>,
}

impl DeclarationSet {
    /// Append another set's declarations to this one.
    pub fn extend(&mut self, other: Self) {
        self.aggregates.extend(other.aggregates);
        self.providers.extend(other.providers);
        self.enums.extend(other.enums);
    }
}

impl DeclarationModel for DeclarationSet {
    fn aggregates(&self) -> &[AggregateDeclaration] {
        &self.aggregates
    }

    fn providers(&self) -> &[ProviderDeclaration] {
        &self.providers
    }

    fn enumeration(&self, ty: &TypeDescriptor, package: &str) -> Option<&EnumDeclaration> {
        if !ty.args.is_empty() {
            return None;
        }
        let path = ty.path()?.trim().trim_start_matches("::");
        qualified_candidates(path, package)
            .iter()
            .find_map(|candidate| {
                self.enums
                    .iter()
                    .find(|decl| decl.qualified_name() == *candidate)
            })
            .or_else(|| {
                if path.contains("::") {
                    return None;
                }
                let mut named = self.enums.iter().filter(|decl| decl.name == path);
                match (named.next(), named.next()) {
                    (Some(only), None) => Some(only),
                    _ => None,
                }
            })
    }
}

pub(crate) fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_owned()
    } else {
        format!("{package}::{name}")
    }
}

/// Qualified names `reference` may denote when written in `package`, most
/// specific first.
///
/// `self::` and `super::` are applied to `package` and `crate::` starts at
/// the round root. Any other path is tried relative to `package`, then from
/// the root.
pub(crate) fn qualified_candidates(reference: &str, package: &str) -> Vec<String> {
    let mut module: Vec<&str> = package.split("::").filter(|s| !s.is_empty()).collect();
    let mut segments = reference.split("::").map(str::trim).peekable();
    if segments.next_if_eq(&"crate").is_some() {
        return vec![segments.collect::<Vec<_>>().join("::")];
    }
    let mut relative = false;
    while let Some(segment) = segments.next_if(|s| *s == "self" || *s == "super") {
        if segment == "super" {
            module.pop();
        }
        relative = true;
    }
    let rest: Vec<&str> = segments.collect();
    let local = module.iter().chain(&rest).copied().collect::<Vec<_>>().join("::");
    if relative {
        vec![local]
    } else {
        vec![local, rest.join("::")]
    }
}
