//! Compile-time warnings.
//!
//! Stable proc macros cannot emit warnings directly, so each warning is an
//! anonymous constant using a deprecated marker type whose note carries the
//! message. The compiler reports it at `span`.

use proc_macro2::{Span, TokenStream};
use quote::quote_spanned;

pub(crate) fn warning(span: Span, message: &str) -> TokenStream {
    let note = format!("optbuilder: {message}");
    quote_spanned! {span=>
        const _: () = {
            #[deprecated(note = #note)]
            struct OptbuilderWarning;
            let _ = OptbuilderWarning;
        };
    }
}
