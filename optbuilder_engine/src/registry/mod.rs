//! Default value provider registry.
//!
//! The registry is built once per round from every provider-marked
//! declaration and maps each produced type to the provider that supplies
//! its default. It also remembers every provider candidate by name so
//! explicit `provider = ...` references can be resolved.


use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::{DuplicateProviderPolicy, GeneratorConfig, ProviderStrictness};
use crate::diagnostics::{Anchor, Diagnostic, DiagnosticSink};
use crate::error::GenerationError;
use crate::model::{ProviderDeclaration, ProviderShape, TypeDescriptor, qualified_candidates};

/// Last path segment of the capability a provider must implement.
pub const PROVIDER_CAPABILITY: &str = "DefaultValueProvider";

/// A registered provider for one produced type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRegistryEntry {
    /// The provider declaration.
    pub provider: ProviderDeclaration,
    /// Whether the provider is reached without instantiation.
    pub singleton: bool,
}

/// A provider known by name together with the type it produces, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
struct KnownProvider {
    provider: ProviderDeclaration,
    produced: Option<TypeDescriptor>,
}

/// Mapping from produced type to provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    by_type: BTreeMap<TypeDescriptor, ProviderRegistryEntry>,
    known: Vec<KnownProvider>,
}

/// Extract `T` from a `DefaultValueProvider<T>` capability.
///
/// # Examples
///
/// ```rust
/// use optbuilder_engine::TypeDescriptor;
/// use optbuilder_engine::registry::produced_type;
///
/// let capability = TypeDescriptor::named("optbuilder::DefaultValueProvider")
///     .with_args(vec![TypeDescriptor::named("String")]);
/// assert_eq!(produced_type(&capability), Some(&TypeDescriptor::named("String")));
/// ```
#[must_use]
pub fn produced_type(capability: &TypeDescriptor) -> Option<&TypeDescriptor> {
    if capability.last_segment() != Some(PROVIDER_CAPABILITY) {
        return None;
    }
    match capability.args.as_slice() {
        [produced] => Some(produced),
        _ => None,
    }
}

fn capability_of(provider: &ProviderDeclaration) -> Option<&TypeDescriptor> {
    provider.capabilities.iter().find_map(produced_type)
}

fn provider_anchor(provider: &ProviderDeclaration) -> Anchor {
    Anchor::declaration(&provider.package, &provider.name)
}

impl ProviderRegistry {
    /// Build the registry from a round's provider candidates.
    ///
    /// Non-fatal problems are reported to `sink` as they are found. The
    /// returned error, if any, has already been reported.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::NotAProvider`] under
    /// [`ProviderStrictness::Strict`] and
    /// [`GenerationError::DuplicateProvider`] under
    /// [`DuplicateProviderPolicy::Error`].
    pub fn build(
        providers: &[ProviderDeclaration],
        config: &GeneratorConfig,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self, GenerationError> {
        let mut registry = Self::default();
        for provider in providers {
            let produced = capability_of(provider).cloned();
            registry.known.push(KnownProvider {
                provider: provider.clone(),
                produced: produced.clone(),
            });
            if !provider.marked {
                continue;
            }
            match produced {
                Some(ty) => registry.register(ty, provider, config, sink)?,
                None => reject(provider, config, sink)?,
            }
        }
        debug!(entries = registry.by_type.len(), "provider registry built");
        Ok(registry)
    }

    fn register(
        &mut self,
        produced: TypeDescriptor,
        provider: &ProviderDeclaration,
        config: &GeneratorConfig,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), GenerationError> {
        let entry = ProviderRegistryEntry {
            provider: provider.clone(),
            singleton: provider.shape == ProviderShape::Singleton,
        };
        let Some(previous) = self.by_type.get(&produced) else {
            self.by_type.insert(produced, entry);
            return Ok(());
        };
        let error = GenerationError::DuplicateProvider {
            produced: produced.to_string(),
            first: previous.provider.qualified_name(),
            second: provider.qualified_name(),
        };
        match config.duplicate_providers {
            DuplicateProviderPolicy::Error => {
                sink.report(Diagnostic::from_error(&error, provider_anchor(provider)));
                return Err(error);
            }
            DuplicateProviderPolicy::Warn => {
                warn!(%error, "replacing provider");
                sink.report(Diagnostic::warning(
                    format!("{error}; using {}", provider.qualified_name()),
                    provider_anchor(provider),
                ));
            }
            DuplicateProviderPolicy::LastWins => {}
        }
        self.by_type.insert(produced, entry);
        Ok(())
    }

    /// Provider registered for exactly `ty`.
    #[must_use]
    pub fn entry_for(&self, ty: &TypeDescriptor) -> Option<&ProviderRegistryEntry> {
        self.by_type.get(ty)
    }

    /// Resolve an explicit provider reference written in module `package`.
    ///
    /// Relative paths are resolved against `package`. When no qualified name
    /// matches, the last segment is compared with provider names, provided
    /// exactly one provider carries it. The produced type is `None` when the
    /// provider lacks the capability.
    #[must_use]
    pub fn resolve(
        &self,
        reference: &str,
        package: &str,
    ) -> Option<(&ProviderDeclaration, Option<&TypeDescriptor>)> {
        let wanted = reference.trim().trim_start_matches("::");
        let found = qualified_candidates(wanted, package)
            .iter()
            .find_map(|candidate| {
                self.known
                    .iter()
                    .rev()
                    .find(|known| known.provider.qualified_name() == *candidate)
            })
            .or_else(|| {
                let simple = wanted.rsplit("::").next().unwrap_or(wanted);
                let mut named = self.known.iter().filter(|known| known.provider.name == simple);
                match (named.next(), named.next()) {
                    (Some(only), None) => Some(only),
                    _ => None,
                }
            })?;
        Some((&found.provider, found.produced.as_ref()))
    }

    /// Number of registered produced types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    /// Whether no provider was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

fn reject(
    provider: &ProviderDeclaration,
    config: &GeneratorConfig,
    sink: &mut dyn DiagnosticSink,
) -> Result<(), GenerationError> {
    let error = GenerationError::NotAProvider {
        provider: provider.qualified_name(),
        reason: format!("does not implement {PROVIDER_CAPABILITY}<T>"),
    };
    match config.provider_strictness {
        ProviderStrictness::Strict => {
            sink.report(Diagnostic::from_error(&error, provider_anchor(provider)));
            Err(error)
        }
        ProviderStrictness::Lenient => {
            warn!(provider = %provider.qualified_name(), "skipping provider candidate");
            sink.report(Diagnostic::warning(
                error.to_string(),
                provider_anchor(provider),
            ));
            Ok(())
        }
    }
}
