//! Tests for parameter classification.

use anyhow::{Result, anyhow, ensure};
use rstest::{fixture, rstest};

use super::*;
use crate::config::GeneratorConfig;
use crate::diagnostics::CollectingSink;
use crate::model::{DeclarationSet, EnumDeclaration, ProviderDeclaration};

struct Round {
    model: DeclarationSet,
    registry: ProviderRegistry,
}

impl Round {
    fn classifier(&self) -> Classifier<'_, DeclarationSet> {
        Classifier::new(&self.registry, &self.model, "app")
    }

    fn classify(&self, name: &str, ty: TypeDescriptor, directive: ParameterDirective) -> Result<ParameterKind> {
        Ok(self
            .classifier()
            .classify(&ConstructorParameter::new(name, ty, directive))?)
    }

    fn classify_err(
        &self,
        name: &str,
        ty: TypeDescriptor,
        directive: ParameterDirective,
    ) -> Result<GenerationError> {
        self.classifier()
            .classify(&ConstructorParameter::new(name, ty, directive))
            .err()
            .ok_or_else(|| anyhow!("classification of `{name}` should fail"))
    }
}

fn enumeration(name: &str, variants: &[&str]) -> EnumDeclaration {
    EnumDeclaration {
        name: name.to_owned(),
        package: "app".to_owned(),
        variants: variants.iter().map(|v| (*v).to_owned()).collect(),
    }
}

fn string_provider(name: &str, produced: TypeDescriptor) -> ProviderDeclaration {
    ProviderDeclaration {
        name: name.to_owned(),
        package: "app".to_owned(),
        shape: ProviderShape::Singleton,
        marked: true,
        capabilities: vec![TypeDescriptor::named("DefaultValueProvider").with_args(vec![produced])],
    }
}

#[fixture]
fn round() -> Round {
    let mut providers = vec![string_provider("StateProvider", TypeDescriptor::named("String"))];
    let mut unmarked = string_provider("Counter", TypeDescriptor::named("u64"));
    unmarked.marked = false;
    unmarked.shape = ProviderShape::Instantiable;
    providers.push(unmarked);
    let model = DeclarationSet {
        aggregates: Vec::new(),
        enums: vec![
            enumeration("Colour", &["Red", "Green", "Blue"]),
            enumeration("Only", &["Single"]),
        ],
        providers,
    };
    let mut sink = CollectingSink::default();
    let registry = ProviderRegistry::build(&model.providers, &GeneratorConfig::default(), &mut sink)
        .unwrap_or_default();
    Round { model, registry }
}

#[rstest]
#[case(TypeDescriptor::named("String"))]
#[case(TypeDescriptor::named("String").into_nullable())]
#[case(TypeDescriptor::named("Colour"))]
#[case(TypeDescriptor::opaque("fn() -> u8"))]
fn unmarked_parameters_are_mandatory(round: Round, #[case] ty: TypeDescriptor) -> Result<()> {
    let kind = round.classify("value", ty, ParameterDirective::None)?;
    ensure!(kind == ParameterKind::Mandatory, "got {kind:?}");
    Ok(())
}

#[rstest]
#[case(ParameterDirective::Optional)]
#[case(ParameterDirective::OptionalNullable)]
fn nullable_types_default_to_none(round: Round, #[case] directive: ParameterDirective) -> Result<()> {
    let ty = TypeDescriptor::named("u16").into_nullable();
    let kind = round.classify("port", ty, directive)?;
    ensure!(kind == ParameterKind::Nullable, "got {kind:?}");
    Ok(())
}

#[rstest]
fn explicit_nullable_requires_nullable_type(round: Round) -> Result<()> {
    let err = round.classify_err("port", TypeDescriptor::named("u16"), ParameterDirective::OptionalNullable)?;
    ensure!(matches!(err, GenerationError::NotNullable { .. }), "got {err}");
    Ok(())
}

#[rstest]
#[case("Colour", EnumPosition::First, "Red")]
#[case("Colour", EnumPosition::Last, "Blue")]
#[case("Only", EnumPosition::First, "Single")]
#[case("Only", EnumPosition::Last, "Single")]
fn enumerable_picks_variant_by_position(
    round: Round,
    #[case] ty: &str,
    #[case] position: EnumPosition,
    #[case] variant: &str,
) -> Result<()> {
    let kind = round.classify(
        "choice",
        TypeDescriptor::named(ty),
        ParameterDirective::OptionalEnumerable { position },
    )?;
    let ParameterKind::Enum { variant: chosen, expression, .. } = kind else {
        return Err(anyhow!("expected an enum default"));
    };
    ensure!(chosen == variant);
    ensure!(expression == format!("{ty}::{variant}"));
    Ok(())
}

#[rstest]
fn generic_optional_uses_first_variant(round: Round) -> Result<()> {
    let kind = round.classify("colour", TypeDescriptor::named("Colour"), ParameterDirective::Optional)?;
    ensure!(
        matches!(&kind, ParameterKind::Enum { variant, .. } if variant == "Red"),
        "got {kind:?}"
    );
    Ok(())
}

#[rstest]
fn nullable_enumerable_wraps_variant(round: Round) -> Result<()> {
    let kind = round.classify(
        "colour",
        TypeDescriptor::named("Colour").into_nullable(),
        ParameterDirective::OptionalEnumerable {
            position: EnumPosition::Last,
        },
    )?;
    let ParameterKind::Enum { expression, .. } = kind else {
        return Err(anyhow!("expected an enum default"));
    };
    ensure!(expression == "::core::option::Option::Some(Colour::Blue)");
    Ok(())
}

#[rstest]
fn enumerable_requires_enum(round: Round) -> Result<()> {
    let err = round.classify_err(
        "count",
        TypeDescriptor::named("u8"),
        ParameterDirective::OptionalEnumerable {
            position: EnumPosition::First,
        },
    )?;
    ensure!(matches!(err, GenerationError::ParameterNotEnum { .. }), "got {err}");
    Ok(())
}

#[rstest]
#[case(TypeDescriptor::named("i64"), ValueShape::Integer, "0")]
#[case(TypeDescriptor::named("f32"), ValueShape::Float, "0.0")]
#[case(TypeDescriptor::named("bool"), ValueShape::Boolean, "false")]
#[case(TypeDescriptor::unit(), ValueShape::Unit, "()")]
#[case(TypeDescriptor::named("Vec").with_args(vec![TypeDescriptor::named("u8")]), ValueShape::Sequence, "::core::default::Default::default()")]
#[case(TypeDescriptor::named("BTreeSet").with_args(vec![TypeDescriptor::named("u8")]), ValueShape::Set, "::core::default::Default::default()")]
#[case(TypeDescriptor::named("std::string::String"), ValueShape::Text, "::std::string::String::new()")]
#[case(TypeDescriptor::named("::core::primitive::u16"), ValueShape::Integer, "0")]
fn catalogue_types_get_zero_values(
    round: Round,
    #[case] ty: TypeDescriptor,
    #[case] shape: ValueShape,
    #[case] expression: &str,
) -> Result<()> {
    let kind = round.classify("value", ty, ParameterDirective::Optional)?;
    ensure!(
        kind == ParameterKind::Literal {
            shape,
            expression: expression.to_owned(),
        },
        "got {kind:?}"
    );
    Ok(())
}

#[rstest]
fn registered_provider_wins_over_catalogue(round: Round) -> Result<()> {
    let kind = round.classify("state", TypeDescriptor::named("String"), ParameterDirective::Optional)?;
    ensure!(
        kind == ParameterKind::Provider {
            provider: "StateProvider".to_owned(),
            singleton: true,
        },
        "got {kind:?}"
    );
    Ok(())
}

#[rstest]
#[case("Instant")]
#[case("app::String")]
#[case("shapes::Vec")]
fn unknown_types_are_undeterminable(round: Round, #[case] path: &str) -> Result<()> {
    let err = round.classify_err("started", TypeDescriptor::named(path), ParameterDirective::Optional)?;
    ensure!(err.category() == crate::ErrorCategory::Inference, "got {err}");
    Ok(())
}

#[rstest]
#[case(ParameterDirective::Optional)]
#[case(ParameterDirective::OptionalNullable)]
fn nested_options_default_to_none(round: Round, #[case] directive: ParameterDirective) -> Result<()> {
    let ty = TypeDescriptor::named("Option")
        .with_args(vec![TypeDescriptor::named("u8")])
        .into_nullable();
    ensure!(ty.to_string() == "Option<Option<u8>>");
    let kind = round.classify("patch", ty, directive)?;
    ensure!(kind == ParameterKind::Nullable, "got {kind:?}");
    Ok(())
}

#[rstest]
#[case("app", "StateProvider")]
#[case("app::inner", "super::StateProvider")]
#[case("app::a::b", "super::super::StateProvider")]
#[case("other", "super::app::StateProvider")]
fn matched_providers_are_reached_from_the_aggregate_module(
    round: Round,
    #[case] package: &str,
    #[case] expected: &str,
) -> Result<()> {
    let kind = Classifier::new(&round.registry, &round.model, package).classify(&ConstructorParameter::new(
        "state",
        TypeDescriptor::named("String"),
        ParameterDirective::Optional,
    ))?;
    ensure!(
        kind == ParameterKind::Provider {
            provider: expected.to_owned(),
            singleton: true,
        },
        "got {kind:?}"
    );
    Ok(())
}

#[rstest]
#[case("", "app", "app::Names")]
#[case("app", "app::dep", "dep::Names")]
#[case("app::x", "app::y", "super::y::Names")]
fn relative_paths_climb_then_descend(
    #[case] from: &str,
    #[case] target: &str,
    #[case] expected: &str,
) -> Result<()> {
    ensure!(relative_path(from, target, "Names") == expected);
    Ok(())
}

#[rstest]
#[case(None)]
#[case(Some("42"))]
fn initializer_is_trusted(round: Round, #[case] initializer: Option<&str>) -> Result<()> {
    let kind = round.classify(
        "anything",
        TypeDescriptor::named("Instant"),
        ParameterDirective::OptionalHasInitializer {
            initializer: initializer.map(ToOwned::to_owned),
        },
    )?;
    ensure!(
        kind == ParameterKind::Initializer {
            expression: initializer.map(ToOwned::to_owned),
        }
    );
    Ok(())
}

#[rstest]
fn explicit_provider_must_produce_declared_type(round: Round) -> Result<()> {
    let err = round.classify_err(
        "count",
        TypeDescriptor::named("u32"),
        ParameterDirective::OptionalValueProvider {
            provider: "Counter".to_owned(),
        },
    )?;
    ensure!(
        matches!(err, GenerationError::ValueProviderTypeMismatch { ref produced, .. } if produced == "u64"),
        "got {err}"
    );
    Ok(())
}

#[rstest]
fn explicit_provider_may_be_unmarked(round: Round) -> Result<()> {
    let kind = round.classify(
        "count",
        TypeDescriptor::named("u64"),
        ParameterDirective::OptionalValueProvider {
            provider: "app::Counter".to_owned(),
        },
    )?;
    ensure!(
        kind == ParameterKind::Provider {
            provider: "app::Counter".to_owned(),
            singleton: false,
        },
        "got {kind:?}"
    );
    Ok(())
}

#[rstest]
fn explicit_provider_must_exist(round: Round) -> Result<()> {
    let err = round.classify_err(
        "city",
        TypeDescriptor::named("String"),
        ParameterDirective::OptionalValueProvider {
            provider: "CityProvider".to_owned(),
        },
    )?;
    ensure!(matches!(err, GenerationError::UnknownProvider { .. }), "got {err}");
    Ok(())
}

#[rstest]
#[case("build")]
#[case("new")]
#[case("renamed")]
fn setter_names_must_be_free(round: Round, #[case] setter: &str) -> Result<()> {
    let parameters = [
        ConstructorParameter::new("first", TypeDescriptor::named("u8"), ParameterDirective::None)
            .with_setter("renamed"),
        ConstructorParameter::new("second", TypeDescriptor::named("u8"), ParameterDirective::None),
        ConstructorParameter::new("third", TypeDescriptor::named("u8"), ParameterDirective::None)
            .with_setter(setter),
    ];
    let err = round
        .classifier()
        .classify_all(&parameters)
        .err()
        .ok_or_else(|| anyhow!("setter `{setter}` should conflict"))?;
    ensure!(matches!(err, GenerationError::SetterNameConflict { .. }), "got {err}");
    Ok(())
}
