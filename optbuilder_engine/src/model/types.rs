//! Host-neutral type descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The base of a [`TypeDescriptor`], ignoring generic arguments and
/// nullability.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum TypeBase {
    /// The unit type `()`.
    Unit,
    /// A path such as `String` or `std::collections::HashMap`.
    Named(String),
    /// A fixed-size array; the element type is the single argument.
    Array {
        /// Array length as written in source.
        len: String,
    },
    /// Anything the model cannot describe structurally, compared textually.
    Opaque(String),
}

/// Structural description of a declared type.
///
/// A nullable type carries `nullable = true` instead of an `Option` wrapper,
/// so `Option<String>` is `String` marked nullable. Equality is exact: path
/// text, arguments, and nullability must all agree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Base type.
    pub base: TypeBase,
    /// Generic arguments in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Self>,
    /// Whether the type admits an absent value.
    #[serde(default)]
    pub nullable: bool,
}

impl TypeDescriptor {
    /// Describe a non-nullable path type without generic arguments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use optbuilder_engine::TypeDescriptor;
    ///
    /// assert_eq!(TypeDescriptor::named("String").to_string(), "String");
    /// ```
    #[must_use]
    pub fn named(path: impl Into<String>) -> Self {
        Self {
            base: TypeBase::Named(path.into()),
            args: Vec::new(),
            nullable: false,
        }
    }

    /// Describe the unit type.
    #[must_use]
    pub const fn unit() -> Self {
        Self {
            base: TypeBase::Unit,
            args: Vec::new(),
            nullable: false,
        }
    }

    /// Describe a fixed-size array of `element`.
    #[must_use]
    pub fn array(element: Self, len: impl Into<String>) -> Self {
        Self {
            base: TypeBase::Array { len: len.into() },
            args: vec![element],
            nullable: false,
        }
    }

    /// Describe a type the model keeps only as text.
    #[must_use]
    pub fn opaque(text: impl Into<String>) -> Self {
        Self {
            base: TypeBase::Opaque(text.into()),
            args: Vec::new(),
            nullable: false,
        }
    }

    /// Replace the generic arguments.
    #[must_use]
    pub fn with_args(mut self, args: Vec<Self>) -> Self {
        self.args = args;
        self
    }

    /// Mark the type as nullable.
    #[must_use]
    pub fn into_nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// The same type with nullability removed.
    #[must_use]
    pub fn non_null(&self) -> Self {
        Self {
            nullable: false,
            ..self.clone()
        }
    }

    /// Last path segment of a named base, e.g. `HashMap` for
    /// `std::collections::HashMap`.
    #[must_use]
    pub fn last_segment(&self) -> Option<&str> {
        match &self.base {
            TypeBase::Named(path) => path.rsplit("::").next().map(str::trim),
            _ => None,
        }
    }

    /// Full path text of a named base.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match &self.base {
            TypeBase::Named(path) => Some(path),
            _ => None,
        }
    }

    fn fmt_inner(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.base {
            TypeBase::Unit => f.write_str("()"),
            TypeBase::Opaque(text) => f.write_str(text),
            TypeBase::Array { len } => {
                f.write_str("[")?;
                match self.args.first() {
                    Some(element) => fmt::Display::fmt(element, f)?,
                    None => f.write_str("_")?,
                }
                write!(f, "; {len}]")
            }
            TypeBase::Named(path) => {
                f.write_str(path)?;
                if self.args.is_empty() {
                    return Ok(());
                }
                f.write_str("<")?;
                for (index, arg) in self.args.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(arg, f)?;
                }
                f.write_str(">")
            }
        }
    }
}

/// Renders the type in Rust syntax, wrapping nullable types in `Option`.
impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            f.write_str("Option<")?;
            self.fmt_inner(f)?;
            f.write_str(">")
        } else {
            self.fmt_inner(f)
        }
    }
}
