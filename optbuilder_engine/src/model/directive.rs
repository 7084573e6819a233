//! Parameter directives attached by the source markers.

use serde::{Deserialize, Serialize};

/// Which variant an enumerable parameter defaults to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumPosition {
    /// First declared variant.
    #[default]
    First,
    /// Last declared variant.
    Last,
}

impl EnumPosition {
    /// Parse a position keyword (`first` or `last`).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use optbuilder_engine::EnumPosition;
    ///
    /// assert_eq!(EnumPosition::parse("last"), Some(EnumPosition::Last));
    /// assert_eq!(EnumPosition::parse("middle"), None);
    /// ```
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "first" => Some(Self::First),
            "last" => Some(Self::Last),
            _ => None,
        }
    }
}

/// How a constructor parameter was marked in source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "directive")]
pub enum ParameterDirective {
    /// No marker: the parameter is mandatory.
    #[default]
    None,
    /// Optional with the default inferred from the type.
    Optional,
    /// Optional and defaulting to `None`; the type must be nullable.
    OptionalNullable,
    /// Optional with a source-provided default.
    ///
    /// The initializer is trusted as written and never type-checked by the
    /// engine. `None` stands for `Default::default()`.
    OptionalHasInitializer {
        /// Default expression as written in source.
        initializer: Option<String>,
    },
    /// Optional and defaulting to the first or last enum variant.
    OptionalEnumerable {
        /// Variant position.
        position: EnumPosition,
    },
    /// Optional and defaulting to the named provider's value.
    OptionalValueProvider {
        /// Provider reference as written in source.
        provider: String,
    },
}

impl ParameterDirective {
    /// Whether the parameter carries any optional marker.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        !matches!(self, Self::None)
    }
}
