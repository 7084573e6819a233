//! Builder synthesis.
//!
//! Turns classified parameters into a host-neutral description of the
//! generated builder. Synthesis cannot fail: every check happens during
//! classification.

mod plan;

use serde::{Deserialize, Serialize};

pub use plan::{BuildPlan, Branch, FieldResolution, ProviderBinding, Resolution, powerset};

use crate::classify::{ClassifiedParameter, ParameterKind};
use crate::model::{AggregateDeclaration, TypeDescriptor, Visibility};

/// One backing field of the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderField {
    /// Field name, equal to the parameter name.
    pub name: String,
    /// Declared parameter type.
    pub declared_type: TypeDescriptor,
    /// Whether the slot is widened to admit "unset".
    pub widened: bool,
    /// Classification of the parameter.
    pub kind: ParameterKind,
}

/// A chaining setter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FluentSetter {
    /// Setter name.
    pub name: String,
    /// Field the setter writes.
    pub field: String,
    /// Type the value callback returns.
    pub value_type: TypeDescriptor,
    /// Whether the value is wrapped into the widened slot.
    pub wraps: bool,
}

/// Value a factory stores in a non-mandatory field before configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "initial", content = "expression")]
pub enum InitialValue {
    /// The declared `None`.
    Null,
    /// Unset; resolved at build time.
    Unset,
    /// A known zero value or enum variant.
    Value(String),
}

/// Initial value of one non-mandatory field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultBinding {
    /// Field name.
    pub field: String,
    /// Value stored by the factories.
    pub initial: InitialValue,
}

/// The two factory entry points.
///
/// Both take the mandatory parameters positionally. `create` additionally
/// takes a configuration callback, runs it on the fresh builder, and returns
/// the built aggregate; `new` returns the builder itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanionFactory {
    /// Mandatory parameter names in declaration order.
    pub mandatory: Vec<String>,
    /// Initial values of the remaining fields in declaration order.
    pub defaults: Vec<DefaultBinding>,
}

/// Complete description of a generated builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesizedBuilderType {
    /// Builder type name.
    pub name: String,
    /// Package the builder is placed in.
    pub package: String,
    /// Aggregate the builder produces.
    pub target: String,
    /// Constructor path used by `build`.
    pub constructor_path: String,
    /// Builder visibility, copied from the aggregate.
    pub visibility: Visibility,
    /// Backing fields in parameter order.
    pub fields: Vec<BuilderField>,
    /// Setters in parameter order.
    pub setters: Vec<FluentSetter>,
    /// Factory description.
    pub factory: CompanionFactory,
    /// How `build` resolves the fields.
    pub build: BuildPlan,
}

impl SynthesizedBuilderType {
    /// Field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&BuilderField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Compute the builder for `decl` from its classified parameters.
///
/// # Examples
///
/// ```rust
/// use optbuilder_engine::{
///     AggregateDeclaration, ClassifiedParameter, ParameterKind, TypeDescriptor, synth::synthesize,
/// };
///
/// let decl = AggregateDeclaration::new("app", "Flag", Vec::new());
/// let builder = synthesize(
///     &decl,
///     "Flag",
///     vec![ClassifiedParameter {
///         name: "on".into(),
///         declared_type: TypeDescriptor::named("bool"),
///         setter_name: "on".into(),
///         kind: ParameterKind::Mandatory,
///     }],
/// );
/// assert_eq!(builder.name, "FlagBuilder");
/// assert_eq!(builder.factory.mandatory, ["on"]);
/// ```
#[must_use]
pub fn synthesize(
    decl: &AggregateDeclaration,
    constructor_path: &str,
    parameters: Vec<ClassifiedParameter>,
) -> SynthesizedBuilderType {
    let setters = parameters
        .iter()
        .map(|parameter| FluentSetter {
            name: parameter.setter_name.clone(),
            field: parameter.name.clone(),
            value_type: parameter.declared_type.clone(),
            wraps: widens(&parameter.kind),
        })
        .collect();
    let fields: Vec<BuilderField> = parameters
        .into_iter()
        .map(|parameter| BuilderField {
            widened: widens(&parameter.kind),
            name: parameter.name,
            declared_type: parameter.declared_type,
            kind: parameter.kind,
        })
        .collect();
    SynthesizedBuilderType {
        name: decl.resolve_generated_name(),
        package: decl.package.clone(),
        target: decl.name.clone(),
        constructor_path: constructor_path.to_owned(),
        visibility: decl.visibility.clone(),
        factory: factory(&fields),
        build: BuildPlan::for_fields(&fields),
        setters,
        fields,
    }
}

/// Mandatory parameters keep their type, as do nullable parameters whose
/// declared `None` already means "unset".
const fn widens(kind: &ParameterKind) -> bool {
    !matches!(kind, ParameterKind::Mandatory | ParameterKind::Nullable)
}

fn factory(fields: &[BuilderField]) -> CompanionFactory {
    let mut mandatory = Vec::new();
    let mut defaults = Vec::new();
    for field in fields {
        let initial = match &field.kind {
            ParameterKind::Mandatory => {
                mandatory.push(field.name.clone());
                continue;
            }
            ParameterKind::Nullable => InitialValue::Null,
            ParameterKind::Initializer { .. } | ParameterKind::Provider { .. } => {
                InitialValue::Unset
            }
            ParameterKind::Literal { expression, .. } | ParameterKind::Enum { expression, .. } => {
                InitialValue::Value(expression.clone())
            }
        };
        defaults.push(DefaultBinding {
            field: field.name.clone(),
            initial,
        });
    }
    CompanionFactory { mandatory, defaults }
}
