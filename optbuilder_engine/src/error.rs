//! Errors raised while generating a builder.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad family an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The aggregate's shape prevents generation.
    Structural,
    /// A parameter marker contradicts the parameter's type.
    Directive,
    /// No default value could be inferred.
    Inference,
    /// A provider candidate is unusable.
    Registry,
}

/// Errors reported by a generation round.
///
/// Per-aggregate errors stop generation for that aggregate only; registry
/// errors are fatal only under strict provider checking or the `error`
/// duplicate policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GenerationError {
    /// The aggregate exposes no addressable constructor.
    #[error("{aggregate} exposes no constructor with named fields")]
    NoConstructorFound {
        /// Aggregate name.
        aggregate: String,
    },

    /// The aggregate exposes more than one constructor.
    #[error("{aggregate} exposes {count} constructors; exactly one is required")]
    AmbiguousConstructor {
        /// Aggregate name.
        aggregate: String,
        /// Number of constructors found.
        count: usize,
    },

    /// Builders cannot be generated for private aggregates.
    #[error("{aggregate} is private; give it `pub` or `pub(crate)` visibility")]
    PrivateAggregate {
        /// Aggregate name.
        aggregate: String,
    },

    /// Two constructor parameters share a name.
    #[error("{aggregate} declares parameter `{parameter}` more than once")]
    DuplicateParameter {
        /// Aggregate name.
        aggregate: String,
        /// Repeated parameter name.
        parameter: String,
    },

    /// Generic aggregates are not supported.
    #[error("{aggregate} declares generic parameters; builders require a concrete type")]
    UnsupportedGenerics {
        /// Aggregate name.
        aggregate: String,
    },

    /// `optional(nullable)` on a non-nullable type.
    #[error("parameter `{parameter}` type ({declared}) is not nullable")]
    NotNullable {
        /// Parameter name.
        parameter: String,
        /// Declared type.
        declared: String,
    },

    /// An explicit provider produces a different type.
    #[error(
        "parameter `{parameter}` type ({declared}) is not the same as the type produced by {provider} ({produced})"
    )]
    ValueProviderTypeMismatch {
        /// Parameter name.
        parameter: String,
        /// Declared type.
        declared: String,
        /// Provider reference.
        provider: String,
        /// Type the provider produces.
        produced: String,
    },

    /// `optional(enumerable)` on a type that is not a known enumeration.
    #[error("parameter `{parameter}` type ({declared}) is not a field-less enum of this round")]
    ParameterNotEnum {
        /// Parameter name.
        parameter: String,
        /// Declared type.
        declared: String,
    },

    /// An explicit provider reference matches no provider.
    #[error("parameter `{parameter}` refers to unknown provider `{provider}`")]
    UnknownProvider {
        /// Parameter name.
        parameter: String,
        /// Provider reference as written.
        provider: String,
    },

    /// A setter name is repeated or collides with a builder method.
    #[error("setter `{setter}` for parameter `{parameter}` conflicts with {conflict}")]
    SetterNameConflict {
        /// Parameter name.
        parameter: String,
        /// Requested setter name.
        setter: String,
        /// What the name collides with.
        conflict: String,
    },

    /// Too many provider-backed parameters to branch over in `build`.
    #[error(
        "{aggregate} has {count} provider-backed parameters; at most {limit} are supported"
    )]
    TooManyProviderParameters {
        /// Aggregate name.
        aggregate: String,
        /// Provider-backed parameters found.
        count: usize,
        /// Largest supported number.
        limit: usize,
    },

    /// Generic `optional` on a type with no inferable default.
    #[error(
        "cannot determine a default value for parameter `{parameter}` of type {declared}; use `optional(default)` or a provider"
    )]
    DefaultValueUndeterminable {
        /// Parameter name.
        parameter: String,
        /// Declared type.
        declared: String,
    },

    /// A provider-marked declaration lacks the provider capability.
    #[error("{provider} is marked as a provider but {reason}")]
    NotAProvider {
        /// Provider name.
        provider: String,
        /// What is missing.
        reason: String,
    },

    /// Two providers produce the same type.
    #[error("{first} and {second} both provide default values for {produced}")]
    DuplicateProvider {
        /// Produced type.
        produced: String,
        /// Provider registered first.
        first: String,
        /// Provider registered second.
        second: String,
    },
}

impl GenerationError {
    /// Category of this error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use optbuilder_engine::{ErrorCategory, GenerationError};
    ///
    /// let err = GenerationError::PrivateAggregate { aggregate: "Secret".into() };
    /// assert_eq!(err.category(), ErrorCategory::Structural);
    /// ```
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::NoConstructorFound { .. }
            | Self::AmbiguousConstructor { .. }
            | Self::PrivateAggregate { .. }
            | Self::DuplicateParameter { .. }
            | Self::UnsupportedGenerics { .. } => ErrorCategory::Structural,
            Self::NotNullable { .. }
            | Self::ValueProviderTypeMismatch { .. }
            | Self::ParameterNotEnum { .. }
            | Self::UnknownProvider { .. }
            | Self::SetterNameConflict { .. }
            | Self::TooManyProviderParameters { .. } => ErrorCategory::Directive,
            Self::DefaultValueUndeterminable { .. } => ErrorCategory::Inference,
            Self::NotAProvider { .. } | Self::DuplicateProvider { .. } => ErrorCategory::Registry,
        }
    }

    /// Parameter the error is anchored to, if any.
    #[must_use]
    pub fn parameter(&self) -> Option<&str> {
        match self {
            Self::DuplicateParameter { parameter, .. }
            | Self::NotNullable { parameter, .. }
            | Self::ValueProviderTypeMismatch { parameter, .. }
            | Self::ParameterNotEnum { parameter, .. }
            | Self::UnknownProvider { parameter, .. }
            | Self::SetterNameConflict { parameter, .. }
            | Self::DefaultValueUndeterminable { parameter, .. } => Some(parameter),
            Self::NoConstructorFound { .. }
            | Self::AmbiguousConstructor { .. }
            | Self::PrivateAggregate { .. }
            | Self::UnsupportedGenerics { .. }
            | Self::TooManyProviderParameters { .. }
            | Self::NotAProvider { .. }
            | Self::DuplicateProvider { .. } => None,
        }
    }
}
