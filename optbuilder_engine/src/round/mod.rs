//! Generation rounds.
//!
//! A round builds the provider registry once, then generates one builder per
//! aggregate. Each aggregate succeeds or fails on its own; its errors are
//! reported and its siblings still generate.


#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::classify::Classifier;
use crate::config::GeneratorConfig;
use crate::diagnostics::{Anchor, Diagnostic, DiagnosticSink};
use crate::error::GenerationError;
use crate::model::{AggregateDeclaration, DeclarationModel, Visibility};
use crate::registry::ProviderRegistry;
use crate::synth::{SynthesizedBuilderType, synthesize};

/// Most provider-backed parameters one aggregate may have. `build` holds
/// one branch per subset of them.
pub const MAX_PROVIDER_PARAMETERS: usize = 10;

/// Result of a completed round.
#[derive(Debug, Clone, Default)]
pub struct RoundOutput {
    /// Builders generated, in aggregate order.
    pub builders: Vec<SynthesizedBuilderType>,
    /// Qualified names of aggregates that failed.
    pub failed: Vec<String>,
}

/// Runs generation rounds with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Create a generator.
    #[must_use]
    pub const fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run one round over `model`.
    ///
    /// Every problem is reported to `sink`. Per-aggregate failures are
    /// listed in [`RoundOutput::failed`].
    ///
    /// # Errors
    ///
    /// Returns the registry error that aborted the round, after reporting
    /// it.
    pub fn run<M: DeclarationModel + ?Sized>(
        &self,
        model: &M,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<RoundOutput, GenerationError> {
        let aggregates = model.aggregates();
        debug!(
            aggregates = aggregates.len(),
            providers = model.providers().len(),
            "starting generation round"
        );
        let registry = ProviderRegistry::build(model.providers(), &self.config, sink)?;
        let results = self.generate_all(aggregates, &registry, model);

        let mut output = RoundOutput::default();
        for (decl, result) in aggregates.iter().zip(results) {
            match result {
                Ok(builder) => {
                    debug!(aggregate = %decl.qualified_name(), builder = %builder.name, "generated builder");
                    output.builders.push(builder);
                }
                Err(error) => {
                    warn!(aggregate = %decl.qualified_name(), %error, "builder generation failed");
                    sink.report(Diagnostic::from_error(
                        &error,
                        Anchor::declaration(&decl.package, &decl.name),
                    ));
                    output.failed.push(decl.qualified_name());
                }
            }
        }
        Ok(output)
    }

    fn generate_all<M: DeclarationModel + ?Sized>(
        &self,
        aggregates: &[AggregateDeclaration],
        registry: &ProviderRegistry,
        model: &M,
    ) -> Vec<Result<SynthesizedBuilderType, GenerationError>> {
        #[cfg(feature = "parallel")]
        if self.config.parallel {
            return aggregates
                .par_iter()
                .map(|decl| generate_builder(decl, registry, model))
                .collect();
        }
        #[cfg(not(feature = "parallel"))]
        if self.config.parallel {
            debug!("parallel generation requested without the `parallel` feature");
        }
        aggregates
            .iter()
            .map(|decl| generate_builder(decl, registry, model))
            .collect()
    }
}

/// Generate the builder for one aggregate.
///
/// # Errors
///
/// Returns the structural, directive, or inference error that prevents
/// generation.
pub fn generate_builder<M: DeclarationModel + ?Sized>(
    decl: &AggregateDeclaration,
    registry: &ProviderRegistry,
    model: &M,
) -> Result<SynthesizedBuilderType, GenerationError> {
    if decl.visibility == Visibility::Private {
        return Err(GenerationError::PrivateAggregate {
            aggregate: decl.name.clone(),
        });
    }
    if decl.generic {
        return Err(GenerationError::UnsupportedGenerics {
            aggregate: decl.name.clone(),
        });
    }
    let constructor = decl.constructor()?;
    let parameters = decl.constructor_parameters()?;
    let classified = Classifier::new(registry, model, &decl.package).classify_all(parameters)?;
    let provided = classified.iter().filter(|p| p.kind.is_provider()).count();
    if provided > MAX_PROVIDER_PARAMETERS {
        return Err(GenerationError::TooManyProviderParameters {
            aggregate: decl.name.clone(),
            count: provided,
            limit: MAX_PROVIDER_PARAMETERS,
        });
    }
    Ok(synthesize(decl, &constructor.path, classified))
}
