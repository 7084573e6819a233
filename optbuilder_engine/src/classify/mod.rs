//! Parameter classification.
//!
//! Every constructor parameter gets exactly one [`ParameterKind`]. Explicit
//! directives go straight to their rule; the generic `optional` marker tries
//! a registered provider, then nullability, then enumerations, then the
//! literal catalogue.

mod literals;
#[cfg(test)]
mod tests;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub use literals::ValueShape;

use crate::error::GenerationError;
use crate::model::{
    ConstructorParameter, DeclarationModel, EnumPosition, ParameterDirective, ProviderShape,
    TypeDescriptor,
};
use crate::registry::ProviderRegistry;

/// Builder method names a setter must not take.
pub const RESERVED_METHODS: [&str; 4] = ["new", "create", "build", "from_parts"];

/// Default-value strategy chosen for a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ParameterKind {
    /// Must be passed to the factories.
    Mandatory,
    /// Defaults to `None`.
    Nullable,
    /// Defaults to an enum variant.
    Enum {
        /// Chosen variant.
        variant: String,
        /// Position the variant was chosen from.
        position: EnumPosition,
        /// Expression producing the variant, wrapped in `Some` for nullable
        /// parameters.
        expression: String,
    },
    /// Defaults to the zero value of a catalogue type.
    Literal {
        /// Catalogue entry.
        shape: ValueShape,
        /// Zero-value expression.
        expression: String,
    },
    /// Defaults to a trusted source expression; `None` means
    /// `Default::default()`.
    Initializer {
        /// Default expression as written in source.
        expression: Option<String>,
    },
    /// Defaults to a provider's value.
    Provider {
        /// Path used to reach the provider.
        provider: String,
        /// Whether the provider is reached without instantiation.
        singleton: bool,
    },
}

impl ParameterKind {
    /// Whether the parameter must be supplied up front.
    #[must_use]
    pub const fn is_mandatory(&self) -> bool {
        matches!(self, Self::Mandatory)
    }

    /// Whether the parameter falls back to a provider.
    #[must_use]
    pub const fn is_provider(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }
}

/// A parameter together with its strategy and setter name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedParameter {
    /// Parameter name.
    pub name: String,
    /// Declared type.
    pub declared_type: TypeDescriptor,
    /// Setter name.
    pub setter_name: String,
    /// Chosen strategy.
    pub kind: ParameterKind,
}

/// Classifies parameters against one round's registry and model.
///
/// Providers matched by type are referenced relative to `package`, the
/// module the aggregate lives in.
#[derive(Debug)]
pub struct Classifier<'a, M: ?Sized> {
    registry: &'a ProviderRegistry,
    model: &'a M,
    package: &'a str,
}

impl<'a, M: DeclarationModel + ?Sized> Classifier<'a, M> {
    /// Create a classifier for parameters of an aggregate in `package`.
    #[must_use]
    pub const fn new(registry: &'a ProviderRegistry, model: &'a M, package: &'a str) -> Self {
        Self {
            registry,
            model,
            package,
        }
    }

    /// Classify every parameter and check setter names.
    ///
    /// # Errors
    ///
    /// Returns the first classification error, or
    /// [`GenerationError::SetterNameConflict`] when a setter name repeats or
    /// collides with a builder method.
    pub fn classify_all(
        &self,
        parameters: &[ConstructorParameter],
    ) -> Result<Vec<ClassifiedParameter>, GenerationError> {
        let mut setters = BTreeSet::new();
        parameters
            .iter()
            .map(|parameter| {
                let setter = parameter.setter_name();
                if RESERVED_METHODS.contains(&setter) {
                    return Err(conflict(parameter, "a builder method"));
                }
                if !setters.insert(setter) {
                    return Err(conflict(parameter, "another setter"));
                }
                Ok(ClassifiedParameter {
                    name: parameter.name.clone(),
                    declared_type: parameter.declared_type.clone(),
                    setter_name: setter.to_owned(),
                    kind: self.classify(parameter)?,
                })
            })
            .collect()
    }

    /// Classify one parameter.
    ///
    /// # Errors
    ///
    /// Returns a directive error when the marker contradicts the type and
    /// [`GenerationError::DefaultValueUndeterminable`] when the generic
    /// marker finds no default.
    pub fn classify(&self, parameter: &ConstructorParameter) -> Result<ParameterKind, GenerationError> {
        let declared = &parameter.declared_type;
        match &parameter.directive {
            ParameterDirective::None => Ok(ParameterKind::Mandatory),
            ParameterDirective::Optional => self.infer(parameter),
            ParameterDirective::OptionalNullable => {
                if declared.nullable {
                    Ok(ParameterKind::Nullable)
                } else {
                    Err(GenerationError::NotNullable {
                        parameter: parameter.name.clone(),
                        declared: declared.to_string(),
                    })
                }
            }
            ParameterDirective::OptionalHasInitializer { initializer } => {
                Ok(ParameterKind::Initializer {
                    expression: initializer.clone(),
                })
            }
            ParameterDirective::OptionalEnumerable { position } => self
                .enum_default(declared, *position)
                .ok_or_else(|| GenerationError::ParameterNotEnum {
                    parameter: parameter.name.clone(),
                    declared: declared.to_string(),
                }),
            ParameterDirective::OptionalValueProvider { provider } => {
                self.explicit_provider(parameter, provider)
            }
        }
    }

    fn infer(&self, parameter: &ConstructorParameter) -> Result<ParameterKind, GenerationError> {
        let declared = &parameter.declared_type;
        if let Some(entry) = self.registry.entry_for(declared) {
            return Ok(ParameterKind::Provider {
                provider: relative_path(
                    self.package,
                    &entry.provider.package,
                    &entry.provider.name,
                ),
                singleton: entry.singleton,
            });
        }
        if declared.nullable {
            return Ok(ParameterKind::Nullable);
        }
        if let Some(kind) = self.enum_default(declared, EnumPosition::First) {
            return Ok(kind);
        }
        ValueShape::of(declared)
            .map(|shape| ParameterKind::Literal {
                shape,
                expression: shape.zero_value().to_owned(),
            })
            .ok_or_else(|| GenerationError::DefaultValueUndeterminable {
                parameter: parameter.name.clone(),
                declared: declared.to_string(),
            })
    }

    fn enum_default(&self, declared: &TypeDescriptor, position: EnumPosition) -> Option<ParameterKind> {
        let inner = declared.non_null();
        let enumeration = self.model.enumeration(&inner, self.package)?;
        let variant = enumeration.variant(position)?;
        let path = inner.path()?;
        let value = format!("{path}::{variant}");
        let expression = if declared.nullable {
            format!("::core::option::Option::Some({value})")
        } else {
            value
        };
        Some(ParameterKind::Enum {
            variant: variant.to_owned(),
            position,
            expression,
        })
    }

    fn explicit_provider(
        &self,
        parameter: &ConstructorParameter,
        reference: &str,
    ) -> Result<ParameterKind, GenerationError> {
        let (provider, produced) =
            self.registry
                .resolve(reference, self.package)
                .ok_or_else(|| GenerationError::UnknownProvider {
                    parameter: parameter.name.clone(),
                    provider: reference.to_owned(),
                })?;
        let Some(produced) = produced else {
            return Err(GenerationError::NotAProvider {
                provider: provider.qualified_name(),
                reason: format!(
                    "does not implement {}<T>",
                    crate::registry::PROVIDER_CAPABILITY
                ),
            });
        };
        if *produced != parameter.declared_type {
            return Err(GenerationError::ValueProviderTypeMismatch {
                parameter: parameter.name.clone(),
                declared: parameter.declared_type.to_string(),
                provider: reference.to_owned(),
                produced: produced.to_string(),
            });
        }
        Ok(ParameterKind::Provider {
            provider: reference.trim().to_owned(),
            singleton: provider.shape == ProviderShape::Singleton,
        })
    }
}

/// Path reaching `name` in module `target` from module `from`.
///
/// ```text
/// from app::inner, target app      => super::Names
/// from app,        target app::dep => dep::Names
/// ```
fn relative_path(from: &str, target: &str, name: &str) -> String {
    let from: Vec<&str> = from.split("::").filter(|s| !s.is_empty()).collect();
    let target: Vec<&str> = target.split("::").filter(|s| !s.is_empty()).collect();
    let shared = from
        .iter()
        .zip(&target)
        .take_while(|(left, right)| left == right)
        .count();
    std::iter::repeat_n("super", from.len() - shared)
        .chain(target.iter().skip(shared).copied())
        .chain(std::iter::once(name))
        .collect::<Vec<_>>()
        .join("::")
}

fn conflict(parameter: &ConstructorParameter, with: &str) -> GenerationError {
    GenerationError::SetterNameConflict {
        parameter: parameter.name.clone(),
        setter: parameter.setter_name().to_owned(),
        conflict: with.to_owned(),
    }
}
