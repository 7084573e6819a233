//! Catalogue of types with a canonical zero value.

use serde::{Deserialize, Serialize};

use crate::model::{TypeBase, TypeDescriptor};

const INTEGERS: [&str; 12] = [
    "i8", "u8", "i16", "u16", "i32", "u32", "i64", "u64", "i128", "u128", "isize", "usize",
];
const FLOATS: [&str; 2] = ["f32", "f64"];
const SEQUENCES: [&str; 3] = ["Vec", "VecDeque", "LinkedList"];
const MAPPINGS: [&str; 2] = ["HashMap", "BTreeMap"];
const SETS: [&str; 2] = ["HashSet", "BTreeSet"];

/// Catalogue entry a literal-default parameter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueShape {
    /// `()`.
    Unit,
    /// Any primitive integer.
    Integer,
    /// `f32` or `f64`.
    Float,
    /// `bool`.
    Boolean,
    /// `String`.
    Text,
    /// Ordered sequences.
    Sequence,
    /// Key-value maps.
    Mapping,
    /// Sets.
    Set,
    /// Fixed-size arrays.
    FixedArray,
}

impl ValueShape {
    /// Catalogue entry for `ty`, ignoring generic arguments.
    ///
    /// Nullable types never match; they default to `None` instead. Paths
    /// only match when bare or rooted at `std`, `alloc`, or `core`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use optbuilder_engine::{TypeDescriptor, ValueShape};
    ///
    /// let ty = TypeDescriptor::named("std::collections::HashMap")
    ///     .with_args(vec![TypeDescriptor::named("String"), TypeDescriptor::named("u8")]);
    /// assert_eq!(ValueShape::of(&ty), Some(ValueShape::Mapping));
    /// assert_eq!(ValueShape::of(&TypeDescriptor::named("Instant")), None);
    /// ```
    #[must_use]
    pub fn of(ty: &TypeDescriptor) -> Option<Self> {
        if ty.nullable {
            return None;
        }
        match &ty.base {
            TypeBase::Unit => Some(Self::Unit),
            TypeBase::Array { .. } => Some(Self::FixedArray),
            TypeBase::Opaque(_) => None,
            TypeBase::Named(path) if from_std(path) => ty.last_segment().and_then(Self::of_name),
            TypeBase::Named(_) => None,
        }
    }

    fn of_name(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(Self::Boolean),
            "String" => Some(Self::Text),
            _ if INTEGERS.contains(&name) => Some(Self::Integer),
            _ if FLOATS.contains(&name) => Some(Self::Float),
            _ if SEQUENCES.contains(&name) => Some(Self::Sequence),
            _ if MAPPINGS.contains(&name) => Some(Self::Mapping),
            _ if SETS.contains(&name) => Some(Self::Set),
            _ => None,
        }
    }

    /// Canonical zero-value expression in Rust syntax.
    #[must_use]
    pub const fn zero_value(self) -> &'static str {
        match self {
            Self::Unit => "()",
            Self::Integer => "0",
            Self::Float => "0.0",
            Self::Boolean => "false",
            Self::Text => "::std::string::String::new()",
            Self::Sequence | Self::Mapping | Self::Set => "::core::default::Default::default()",
            Self::FixedArray => "::core::array::from_fn(|_| ::core::default::Default::default())",
        }
    }
}

fn from_std(path: &str) -> bool {
    match path.trim().trim_start_matches("::").split_once("::") {
        None => true,
        Some((root, _)) => matches!(root.trim(), "std" | "alloc" | "core"),
    }
}
