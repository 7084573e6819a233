//! Generation engine for `optbuilder`.
//!
//! The engine turns annotated aggregate declarations into builder
//! descriptions. A round flows through four stages:
//!
//! 1. the [`model`] exposes declarations, enumerations, and provider
//!    candidates through [`DeclarationModel`];
//! 2. the [`registry`] maps produced types to default value providers;
//! 3. the [`classify`] stage assigns a [`ParameterKind`] to every constructor
//!    parameter;
//! 4. the [`synth`] stage computes the [`SynthesizedBuilderType`].
//!
//! [`Generator`] drives a whole round and routes every failure to a
//! [`DiagnosticSink`]. The [`source`] and [`emit`] modules are the Rust host:
//! they read declarations from `syn` items and render builders back to
//! tokens.
//!
//! ```rust
//! use optbuilder_engine::{CollectingSink, Generator, GeneratorConfig, SourceModel};
//!
//! let file: syn::File = syn::parse_quote! {
//!     #[builder]
//!     pub struct Point {
//!         x: i32,
//!         #[optional]
//!         y: i32,
//!     }
//! };
//! let model = SourceModel::from_items("geometry", &file.items)?;
//! let mut sink = CollectingSink::default();
//! let output = Generator::new(GeneratorConfig::default()).run(&model, &mut sink)?;
//! assert_eq!(output.builders.len(), 1);
//! assert!(!sink.has_errors());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod emit;
mod error;
pub mod model;
pub mod registry;
pub mod round;
pub mod source;
pub mod synth;

pub use classify::{ClassifiedParameter, Classifier, ParameterKind, ValueShape};
pub use config::{
    DEFAULT_CRATE_PATH, DuplicateProviderPolicy, GeneratorConfig, ProviderStrictness,
};
pub use diagnostics::{Anchor, CollectingSink, Diagnostic, DiagnosticSink, Severity};
pub use emit::{EmitError, render};
pub use error::{ErrorCategory, GenerationError};
pub use model::{
    AggregateDeclaration, Constructor, ConstructorParameter, DeclarationModel, DeclarationSet,
    EnumDeclaration, EnumPosition, ParameterDirective, ProviderDeclaration, ProviderShape,
    TypeBase, TypeDescriptor, Visibility,
};
pub use registry::{PROVIDER_CAPABILITY, ProviderRegistry, ProviderRegistryEntry};
pub use round::{Generator, MAX_PROVIDER_PARAMETERS, RoundOutput, generate_builder};
pub use source::{MARKERS, SourceModel, strip_markers};
pub use synth::{
    BuildPlan, Branch, BuilderField, CompanionFactory, DefaultBinding, FieldResolution,
    FluentSetter, InitialValue, ProviderBinding, Resolution, SynthesizedBuilderType, synthesize,
};
