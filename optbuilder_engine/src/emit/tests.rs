//! Tests for Rust emission.

use anyhow::{Result, anyhow, ensure};
use rstest::{fixture, rstest};
use syn::{ImplItem, Item, parse_quote};

use super::*;
use crate::config::GeneratorConfig;
use crate::diagnostics::CollectingSink;
use crate::model::{TypeDescriptor, Visibility};
use crate::round::Generator;
use crate::source::SourceModel;

fn generate(file: &syn::File) -> Result<Vec<SynthesizedBuilderType>> {
    let model = SourceModel::from_items("app", &file.items)?;
    let mut sink = CollectingSink::default();
    let output = Generator::new(GeneratorConfig::default()).run(&model, &mut sink)?;
    ensure!(!sink.has_errors(), "unexpected diagnostics: {:?}", sink.diagnostics());
    Ok(output.builders)
}

fn compact(tokens: &proc_macro2::TokenStream) -> String {
    tokens.to_string().chars().filter(|c| !c.is_whitespace()).collect()
}

fn rendered(builder: &SynthesizedBuilderType) -> Result<syn::File> {
    Ok(syn::parse2(render(builder, "::optbuilder")?)?)
}

fn methods(file: &syn::File) -> Vec<String> {
    file.items
        .iter()
        .filter_map(|item| match item {
            Item::Impl(block) if block.trait_.is_none() => Some(block),
            _ => None,
        })
        .flat_map(|block| &block.items)
        .filter_map(|item| match item {
            ImplItem::Fn(method) => Some(method.sig.ident.to_string()),
            _ => None,
        })
        .collect()
}

fn build_match_arms(file: &syn::File) -> Option<usize> {
    file.items.iter().find_map(|item| {
        let Item::Impl(block) = item else { return None };
        block.items.iter().find_map(|impl_item| {
            let ImplItem::Fn(method) = impl_item else { return None };
            if method.sig.ident != "build" {
                return None;
            }
            method.block.stmts.iter().find_map(|stmt| match stmt {
                syn::Stmt::Expr(syn::Expr::Match(matched), _) => Some(matched.arms.len()),
                _ => None,
            })
        })
    })
}

#[fixture]
fn address() -> syn::File {
    parse_quote! {
        #[provides]
        pub struct StateProvider;

        impl optbuilder::DefaultValueProvider<String> for StateProvider {
            fn get(&self) -> String {
                "NY".to_owned()
            }
        }

        #[builder]
        pub struct Address {
            #[optional]
            street: Option<String>,
            #[optional(default)]
            town: String,
            #[optional(provider = StateProvider)]
            state: String,
        }
    }
}

#[rstest]
fn renders_parseable_items(address: syn::File) -> Result<()> {
    let builders = generate(&address)?;
    let builder = builders.first().ok_or_else(|| anyhow!("no builder generated"))?;
    let file = rendered(builder)?;
    let names = methods(&file);
    for expected in ["from_parts", "new", "create", "street", "town", "state", "build"] {
        ensure!(names.iter().any(|n| n == expected), "missing {expected} in {names:?}");
    }
    ensure!(
        file.items
            .iter()
            .any(|item| matches!(item, Item::Impl(block) if block.trait_.is_some())),
        "Default impl expected when nothing is mandatory"
    );
    Ok(())
}

#[rstest]
fn branched_build_matches_every_subset() -> Result<()> {
    let file: syn::File = parse_quote! {
        #[provides]
        pub struct Names;
        impl DefaultValueProvider<String> for Names {
            fn get(&self) -> String { String::new() }
        }
        #[derive(Default)]
        #[provides]
        pub struct Numbers { seed: u64 }
        impl DefaultValueProvider<u64> for Numbers {
            fn get(&self) -> u64 { self.seed }
        }

        #[builder]
        pub struct Pair {
            #[optional]
            name: String,
            #[optional]
            number: u64,
        }
    };
    let builders = generate(&file)?;
    let builder = builders.first().ok_or_else(|| anyhow!("no builder generated"))?;
    let rendered_file = rendered(builder)?;
    ensure!(build_match_arms(&rendered_file) == Some(4));
    let text = compact(&render(builder, "::optbuilder")?);
    ensure!(text.contains("<Numbersas::core::default::Default>::default()"));
    ensure!(text.contains("::get(&Names)"));
    Ok(())
}

#[rstest]
fn direct_build_has_no_match() -> Result<()> {
    let file: syn::File = parse_quote! {
        #[builder]
        pub struct Counter {
            start: u32,
            #[optional]
            step: u32,
        }
    };
    let builders = generate(&file)?;
    let builder = builders.first().ok_or_else(|| anyhow!("no builder generated"))?;
    let rendered_file = rendered(builder)?;
    ensure!(build_match_arms(&rendered_file).is_none());
    ensure!(
        !rendered_file
            .items
            .iter()
            .any(|item| matches!(item, Item::Impl(block) if block.trait_.as_ref().is_some_and(|(_, path, _)| path.segments.last().is_some_and(|s| s.ident == "Default")))),
        "Default impl must not be generated when a parameter is mandatory"
    );
    Ok(())
}

#[rstest]
#[case::custom_path("my_runtime", "my_runtime::Supplied")]
#[case::absolute("::optbuilder", "::optbuilder::Supplied")]
fn uses_configured_runtime_path(address: syn::File, #[case] path: &str, #[case] expected: &str) -> Result<()> {
    let builders = generate(&address)?;
    let builder = builders.first().ok_or_else(|| anyhow!("no builder generated"))?;
    let text = compact(&render(builder, path)?);
    ensure!(text.contains(expected), "rendered: {text}");
    Ok(())
}

#[rstest]
fn keeps_internal_visibility() -> Result<()> {
    let file: syn::File = parse_quote! {
        #[builder]
        pub(crate) struct Internal {
            #[optional]
            flag: bool,
        }
    };
    let builders = generate(&file)?;
    let builder = builders.first().ok_or_else(|| anyhow!("no builder generated"))?;
    ensure!(
        builder.visibility
            == Visibility::Internal {
                scope: "crate".to_owned()
            }
    );
    let rendered_file = rendered(builder)?;
    let Some(Item::Struct(structure)) = rendered_file.items.first() else {
        return Err(anyhow!("builder struct should come first"));
    };
    ensure!(matches!(structure.vis, syn::Visibility::Restricted(_)));
    Ok(())
}

#[rstest]
fn reports_invalid_default_expressions(address: syn::File) -> Result<()> {
    let builders = generate(&address)?;
    let mut builder = builders
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("no builder generated"))?;
    builder.build = BuildPlan::Direct {
        resolutions: vec![crate::synth::FieldResolution {
            field: "town".to_owned(),
            strategy: Resolution::OrDefault("1 +".to_owned()),
        }],
    };
    let err = render(&builder, "::optbuilder")
        .err()
        .ok_or_else(|| anyhow!("rendering should fail"))?;
    ensure!(matches!(err, EmitError::InvalidExpression { .. }), "got {err}");
    Ok(())
}

#[rstest]
#[case(TypeDescriptor::named("u8"), "u8")]
#[case(TypeDescriptor::named("u8").into_nullable(), "::core::option::Option<u8>")]
#[case(TypeDescriptor::array(TypeDescriptor::named("u8"), "4"), "[u8;4]")]
fn renders_type_tokens(#[case] ty: TypeDescriptor, #[case] expected: &str) -> Result<()> {
    ensure!(compact(&tokens::ty(&ty)?) == expected);
    Ok(())
}
