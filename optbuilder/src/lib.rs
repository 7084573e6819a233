//! Builders with optional, defaulted parameters.
//!
//! Mark an aggregate with `#[builder]` inside a module annotated with
//! [`macro@generate`], mark the parameters that may be omitted with
//! `#[optional]`, and a `<Name>Builder` is generated next to it.
//!
//! ```rust
//! #[optbuilder::generate]
//! mod shapes {
//!     use optbuilder::DefaultValueProvider;
//!
//!     #[provides]
//!     pub struct DefaultLabel;
//!
//!     impl DefaultValueProvider<String> for DefaultLabel {
//!         fn get(&self) -> String {
//!             "unnamed".to_owned()
//!         }
//!     }
//!
//!     #[derive(Debug, PartialEq)]
//!     pub enum Fill { Solid, Hollow }
//!
//!     #[builder]
//!     #[derive(Debug)]
//!     pub struct Circle {
//!         pub radius: f64,
//!         #[optional]
//!         pub label: String,
//!         #[optional(enumerable = "last")]
//!         pub fill: Fill,
//!         #[optional]
//!         pub note: Option<String>,
//!     }
//! }
//!
//! use shapes::{CircleBuilder, Fill};
//!
//! let mut builder = CircleBuilder::new(2.0);
//! builder.note(|| Some("sketch".to_owned()));
//! let circle = builder.build();
//! assert_eq!(circle.label, "unnamed");
//! assert_eq!(circle.fill, Fill::Hollow);
//! assert_eq!(circle.note.as_deref(), Some("sketch"));
//!
//! let labelled = CircleBuilder::create(1.0, |b| {
//!     b.label(|| "unit".to_owned());
//! });
//! assert_eq!(labelled.label, "unit");
//! ```
//!
//! Provider types matched by type are referenced by their simple name, so
//! they must be in scope in the aggregate's module.

pub use optbuilder_macros::{Declare, generate};

mod supplied;

pub use supplied::Supplied;

/// Source of default values of type `T`.
///
/// Unit structs are called without instantiation; other providers are
/// created with [`Default`] each time a value is needed.
pub trait DefaultValueProvider<T> {
    /// Produce a default value.
    fn get(&self) -> T;
}
