//! Tests for the declaration model.

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;

use super::*;

fn param(name: &str) -> ConstructorParameter {
    ConstructorParameter::new(name, TypeDescriptor::named("u32"), ParameterDirective::None)
}

#[rstest]
#[case(None, "ConfigBuilder")]
#[case(Some(""), "ConfigBuilder")]
#[case(Some("  "), "ConfigBuilder")]
#[case(Some("Factory"), "Factory")]
fn resolves_generated_name(#[case] name_override: Option<&str>, #[case] expected: &str) -> Result<()> {
    let mut decl = AggregateDeclaration::new("app", "Config", vec![param("port")]);
    decl.builder_name_override = name_override.map(ToOwned::to_owned);
    ensure!(
        decl.resolve_generated_name() == expected,
        "expected {expected}, got {}",
        decl.resolve_generated_name()
    );
    Ok(())
}

#[rstest]
fn rejects_missing_constructor() -> Result<()> {
    let mut decl = AggregateDeclaration::new("app", "Marker", Vec::new());
    decl.constructors.clear();
    let err = decl
        .constructor_parameters()
        .err()
        .ok_or_else(|| anyhow!("expected NoConstructorFound"))?;
    ensure!(matches!(err, GenerationError::NoConstructorFound { .. }));
    Ok(())
}

#[rstest]
fn rejects_multiple_constructors() -> Result<()> {
    let mut decl = AggregateDeclaration::new("app", "Shape", vec![param("radius")]);
    decl.constructors.push(Constructor {
        path: "Shape::Square".to_owned(),
        parameters: vec![param("side")],
    });
    let err = decl
        .constructor()
        .err()
        .ok_or_else(|| anyhow!("expected AmbiguousConstructor"))?;
    ensure!(
        err == GenerationError::AmbiguousConstructor {
            aggregate: "Shape".to_owned(),
            count: 2,
        },
        "unexpected error: {err}"
    );
    Ok(())
}

#[rstest]
fn rejects_duplicate_parameters() -> Result<()> {
    let decl = AggregateDeclaration::new("app", "Pair", vec![param("a"), param("b"), param("a")]);
    let err = decl
        .constructor_parameters()
        .err()
        .ok_or_else(|| anyhow!("expected DuplicateParameter"))?;
    ensure!(err.parameter() == Some("a"));
    Ok(())
}

#[rstest]
fn keeps_parameter_order() -> Result<()> {
    let decl = AggregateDeclaration::new("app", "Triple", vec![param("z"), param("a"), param("m")]);
    let names: Vec<_> = decl
        .constructor_parameters()?
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    ensure!(names == ["z", "a", "m"], "order changed: {names:?}");
    Ok(())
}

#[rstest]
#[case(TypeDescriptor::named("String"), "String")]
#[case(TypeDescriptor::named("String").into_nullable(), "Option<String>")]
#[case(TypeDescriptor::unit(), "()")]
#[case(
    TypeDescriptor::named("HashMap").with_args(vec![TypeDescriptor::named("String"), TypeDescriptor::named("u8")]),
    "HashMap<String, u8>"
)]
#[case(TypeDescriptor::array(TypeDescriptor::named("u8"), "4"), "[u8; 4]")]
fn renders_types_as_rust(#[case] ty: TypeDescriptor, #[case] expected: &str) -> Result<()> {
    ensure!(ty.to_string() == expected, "rendered {ty}");
    Ok(())
}

#[rstest]
fn type_equality_includes_nullability_and_arguments() -> Result<()> {
    let plain = TypeDescriptor::named("Vec").with_args(vec![TypeDescriptor::named("u8")]);
    ensure!(plain != plain.clone().into_nullable());
    ensure!(plain != TypeDescriptor::named("Vec"));
    ensure!(plain.clone().into_nullable().non_null() == plain);
    Ok(())
}

fn enum_decl(package: &str, name: &str) -> EnumDeclaration {
    EnumDeclaration {
        name: name.to_owned(),
        package: package.to_owned(),
        variants: vec!["Red".to_owned(), "Green".to_owned()],
    }
}

#[rstest]
#[case("Colour", "app", Some("palette"))]
#[case("palette::Colour", "app", Some("palette"))]
#[case("crate::palette::Colour", "app::deep", Some("palette"))]
#[case("mypalette::Colour", "app", None)]
#[case("other::Colour", "app", None)]
#[case("Color", "app", None)]
#[case("Mode", "app::a", Some("app::a"))]
#[case("Mode", "app::b", Some("app::b"))]
#[case("Mode", "app", None)]
#[case("super::b::Mode", "app::a", Some("app::b"))]
#[case("b::Mode", "app", Some("app::b"))]
fn enums_resolve_from_the_using_module(
    #[case] path: &str,
    #[case] package: &str,
    #[case] expected: Option<&str>,
) -> Result<()> {
    let model = DeclarationSet {
        enums: vec![
            enum_decl("palette", "Colour"),
            enum_decl("app::a", "Mode"),
            enum_decl("app::b", "Mode"),
        ],
        ..DeclarationSet::default()
    };
    let found = model.enumeration(&TypeDescriptor::named(path), package);
    ensure!(
        found.map(|decl| decl.package.as_str()) == expected,
        "{path} from {package} resolved to {found:?}"
    );
    Ok(())
}

#[rstest]
fn enum_position_selects_variant() -> Result<()> {
    let decl = EnumDeclaration {
        name: "Level".to_owned(),
        package: String::new(),
        variants: vec!["Low".to_owned(), "Mid".to_owned(), "High".to_owned()],
    };
    ensure!(decl.variant(EnumPosition::First) == Some("Low"));
    ensure!(decl.variant(EnumPosition::Last) == Some("High"));
    Ok(())
}

#[rstest]
fn setter_name_falls_back_to_parameter() -> Result<()> {
    let plain = param("timeout");
    ensure!(plain.setter_name() == "timeout");
    let renamed = param("timeout").with_setter("with_timeout");
    ensure!(renamed.setter_name() == "with_timeout");
    Ok(())
}
