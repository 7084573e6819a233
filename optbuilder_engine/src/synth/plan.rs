//! Default resolution performed by `build`.

use serde::{Deserialize, Serialize};

use super::BuilderField;
use crate::classify::ParameterKind;
use crate::model::TypeDescriptor;

const DEFAULT_EXPRESSION: &str = "::core::default::Default::default()";

/// How `build` obtains a field that is not provider-backed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "resolution", content = "expression")]
pub enum Resolution {
    /// Use the stored value as is.
    Value,
    /// Use the stored value, or the expression when unset.
    OrDefault(String),
}

/// Resolution of one non-provider field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldResolution {
    /// Field name.
    pub field: String,
    /// Strategy.
    pub strategy: Resolution,
}

/// A provider-backed field bound to a local in `build`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderBinding {
    /// Field name.
    pub field: String,
    /// Path used to reach the provider.
    pub provider: String,
    /// Whether the provider is reached without instantiation.
    pub singleton: bool,
    /// Type the provider produces.
    pub produced: TypeDescriptor,
}

/// One arm of a branched `build`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Provider-backed fields taken from their set value.
    pub set: Vec<String>,
    /// Provider-backed fields taken from their provider.
    pub defaulted: Vec<String>,
}

/// The body of `build`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "plan")]
pub enum BuildPlan {
    /// A single construction; no field is provider-backed.
    Direct {
        /// Resolutions in field order.
        resolutions: Vec<FieldResolution>,
    },
    /// One construction per subset of set provider-backed fields.
    Branched {
        /// Resolutions of the other fields in field order.
        resolutions: Vec<FieldResolution>,
        /// Provider-backed fields in field order.
        bindings: Vec<ProviderBinding>,
        /// All `2^k` branches, largest set first. A round never plans more
        /// than [`crate::round::MAX_PROVIDER_PARAMETERS`] bindings.
        branches: Vec<Branch>,
    },
}

impl BuildPlan {
    pub(super) fn for_fields(fields: &[BuilderField]) -> Self {
        let mut resolutions = Vec::new();
        let mut bindings = Vec::new();
        for field in fields {
            let strategy = match &field.kind {
                ParameterKind::Mandatory | ParameterKind::Nullable => Resolution::Value,
                ParameterKind::Literal { expression, .. } | ParameterKind::Enum { expression, .. } => {
                    Resolution::OrDefault(expression.clone())
                }
                ParameterKind::Initializer { expression } => Resolution::OrDefault(
                    expression
                        .clone()
                        .unwrap_or_else(|| DEFAULT_EXPRESSION.to_owned()),
                ),
                ParameterKind::Provider { provider, singleton } => {
                    bindings.push(ProviderBinding {
                        field: field.name.clone(),
                        provider: provider.clone(),
                        singleton: *singleton,
                        produced: field.declared_type.clone(),
                    });
                    continue;
                }
            };
            resolutions.push(FieldResolution {
                field: field.name.clone(),
                strategy,
            });
        }
        if bindings.is_empty() {
            return Self::Direct { resolutions };
        }
        let names: Vec<&str> = bindings.iter().map(|b| b.field.as_str()).collect();
        let branches = powerset(&names)
            .into_iter()
            .map(|set| Branch {
                defaulted: names
                    .iter()
                    .filter(|name| !set.contains(name))
                    .map(|name| (*name).to_owned())
                    .collect(),
                set: set.into_iter().map(ToOwned::to_owned).collect(),
            })
            .collect();
        Self::Branched {
            resolutions,
            bindings,
            branches,
        }
    }

    /// Branches of the plan; empty for a direct plan.
    #[must_use]
    pub fn branches(&self) -> &[Branch] {
        match self {
            Self::Direct { .. } => &[],
            Self::Branched { branches, .. } => branches,
        }
    }

    /// Resolutions of the non-provider fields.
    #[must_use]
    pub fn resolutions(&self) -> &[FieldResolution] {
        match self {
            Self::Direct { resolutions } | Self::Branched { resolutions, .. } => resolutions,
        }
    }

    /// Provider bindings; empty for a direct plan.
    #[must_use]
    pub fn bindings(&self) -> &[ProviderBinding] {
        match self {
            Self::Direct { .. } => &[],
            Self::Branched { bindings, .. } => bindings,
        }
    }

    /// Branch `build` takes when exactly the provider-backed fields in `set`
    /// hold a value. Names of other fields are ignored.
    #[must_use]
    pub fn select_branch(&self, set: &[&str]) -> Option<&Branch> {
        self.branches()
            .iter()
            .find(|branch| branch.set.iter().all(|field| set.contains(&field.as_str())))
    }
}

/// Every subset of `items`, largest first.
///
/// Subsets keep the order of `items`; subsets of equal size keep the order
/// in which they are generated.
///
/// # Examples
///
/// ```rust
/// use optbuilder_engine::synth::powerset;
///
/// let subsets = powerset(&["p", "q"]);
/// assert_eq!(subsets, vec![vec!["p", "q"], vec!["p"], vec!["q"], vec![]]);
/// ```
#[must_use]
pub fn powerset<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    let mut subsets = items.iter().fold(vec![Vec::new()], |mut acc, item| {
        let extended: Vec<Vec<T>> = acc
            .iter()
            .map(|subset| {
                let mut next = subset.clone();
                next.push(item.clone());
                next
            })
            .collect();
        acc.extend(extended);
        acc
    });
    subsets.sort_by_key(|subset| std::cmp::Reverse(subset.len()));
    subsets
}
