//! Expansion of `#[optbuilder::generate]`.

use optbuilder_engine::{
    Anchor, CollectingSink, Generator, GeneratorConfig, SourceModel, render,
    strip_markers,
};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Item, ItemMod};

use crate::spans::SpanIndex;
use crate::warnings::warning;

/// Run one round over `module` and return it with builders appended.
///
/// Malformed markers abort the expansion. Generation errors are emitted as
/// `compile_error!` next to the module so the remaining items still compile.
pub(crate) fn expand(config: GeneratorConfig, mut module: ItemMod) -> syn::Result<TokenStream> {
    let root = module.ident.to_string();
    let fallback = module.ident.span();
    let Some((_, items)) = module.content.as_mut() else {
        return Err(syn::Error::new(
            fallback,
            "#[optbuilder::generate] requires an inline module body",
        ));
    };

    let model = SourceModel::from_items(&root, items)?;
    let spans = SpanIndex::new(&root, items, fallback);
    strip_markers(items);

    let generator = Generator::new(config);
    let mut sink = CollectingSink::default();
    let outcome = generator.run(&model, &mut sink);

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    for diagnostic in sink.diagnostics() {
        let span = spans.locate(&diagnostic.anchor);
        if diagnostic.is_error() {
            errors.push(syn::Error::new(span, &diagnostic.message));
        } else {
            warnings.push(warning(span, &diagnostic.message));
        }
    }

    if let Ok(output) = outcome {
        for builder in &output.builders {
            let anchor = Anchor::declaration(&builder.package, &builder.target);
            let generated = render(builder, &generator.config().crate_path)
                .map_err(|err| syn::Error::new(spans.locate(&anchor), err))
                .and_then(syn::parse2::<syn::File>);
            match (generated, items_for(items, &root, &builder.package)) {
                (Ok(file), Some(target)) => target.extend(file.items),
                (Ok(_), None) => errors.push(syn::Error::new(
                    spans.locate(&anchor),
                    format!("no inline module `{}` to place `{}` in", builder.package, builder.name),
                )),
                (Err(err), _) => errors.push(err),
            }
        }
    }

    let compile_errors = errors
        .into_iter()
        .reduce(|mut combined, error| {
            combined.combine(error);
            combined
        })
        .map(syn::Error::into_compile_error);
    Ok(quote! {
        #module
        #(#warnings)*
        #compile_errors
    })
}

/// Items of the nested module named by `package`, relative to `root`.
fn items_for<'a>(items: &'a mut Vec<Item>, root: &str, package: &str) -> Option<&'a mut Vec<Item>> {
    let rest = package.strip_prefix(root)?;
    rest.split("::")
        .filter(|segment| !segment.is_empty())
        .try_fold(items, |current, segment| {
            current.iter_mut().find_map(|item| match item {
                Item::Mod(nested) if nested.ident == segment => {
                    nested.content.as_mut().map(|(_, inner)| inner)
                }
                _ => None,
            })
        })
}
