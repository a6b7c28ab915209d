//! Type descriptors
//!
//! Resolves the type row of a sheet into [`TypeDescriptor`]s. The grammar is
//! fixed and small:
//!
//! | Surface form | Shape        |
//! |--------------|--------------|
//! | `P`          | scalar       |
//! | `[]P`        | list         |
//! | `[][]P`      | list of list |
//! | `map[K]V`    | map          |
//!
//! where every primitive is one of `int32`, `int64`, `float32`, `float64`,
//! `string`, `bool`, or a legacy alias (`int`, `float`).
//!
//! ```rust
//! use sheetcfg::core::types::{Primitive, TypeDescriptor};
//!
//! let ty: TypeDescriptor = "map[string]int".parse().unwrap();
//! assert_eq!(ty, TypeDescriptor::Map { key: Primitive::String, value: Primitive::Int32 });
//! assert_eq!(ty.to_string(), "map[string]int32");
//! ```

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::data::keywords::canonical_primitive;

const LIST_PREFIX: &str = "[]";
const NESTED_LIST_PREFIX: &str = "[][]";
const MAP_PREFIX: &str = "map[";

/// Primitive kinds a cell (or container element) can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Bool,
}

impl Primitive {
    /// All primitives, in grammar order
    pub const ALL: [Primitive; 6] = [
        Primitive::Int32,
        Primitive::Int64,
        Primitive::Float32,
        Primitive::Float64,
        Primitive::String,
        Primitive::Bool,
    ];

    /// Canonical name used in type strings
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Int32 => "int32",
            Primitive::Int64 => "int64",
            Primitive::Float32 => "float32",
            Primitive::Float64 => "float64",
            Primitive::String => "string",
            Primitive::Bool => "bool",
        }
    }

    /// Look up a canonical primitive name (aliases are not accepted here)
    fn from_canonical(name: &str) -> Option<Self> {
        Primitive::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Resolve a primitive token, folding legacy aliases
    pub fn resolve(token: &str) -> Result<Self, TypeError> {
        fix_type(token)
            .and_then(Primitive::from_canonical)
            .ok_or_else(|| TypeError::UnknownPrimitive(token.to_string()))
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Container shape of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Scalar,
    List,
    ListOfList,
    Map,
}

/// Resolved, canonical type of one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Scalar(Primitive),
    List(Primitive),
    ListOfList(Primitive),
    Map { key: Primitive, value: Primitive },
}

/// Type string could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("type string is empty")]
    Empty,
    #[error("unknown primitive type {0:?}")]
    UnknownPrimitive(String),
    #[error("malformed container type {0:?}")]
    Malformed(String),
}

/// Fold a primitive token onto its canonical name.
///
/// Applied exactly once per token while a descriptor is resolved; descriptors
/// only ever hold canonical primitives afterwards.
pub fn fix_type(token: &str) -> Option<&'static str> {
    canonical_primitive(token)
}

impl TypeDescriptor {
    /// Resolve a type string into a descriptor.
    ///
    /// Input is trimmed and lowercased; whitespace next to a bracket is
    /// ignored. Container markers are matched before primitive names.
    pub fn resolve(input: &str) -> Result<Self, TypeError> {
        let compact = compact(input);
        if compact.is_empty() {
            return Err(TypeError::Empty);
        }

        if let Some(inner) = compact.strip_prefix(NESTED_LIST_PREFIX) {
            return element(inner, &compact).map(TypeDescriptor::ListOfList);
        }
        if let Some(inner) = compact.strip_prefix(LIST_PREFIX) {
            return element(inner, &compact).map(TypeDescriptor::List);
        }
        if let Some(rest) = compact.strip_prefix(MAP_PREFIX) {
            let (key, value) = rest
                .split_once(']')
                .ok_or_else(|| TypeError::Malformed(compact.clone()))?;
            return Ok(TypeDescriptor::Map {
                key: element(key, &compact)?,
                value: element(value, &compact)?,
            });
        }

        element(&compact, &compact).map(TypeDescriptor::Scalar)
    }

    pub fn shape(&self) -> Shape {
        match self {
            TypeDescriptor::Scalar(_) => Shape::Scalar,
            TypeDescriptor::List(_) => Shape::List,
            TypeDescriptor::ListOfList(_) => Shape::ListOfList,
            TypeDescriptor::Map { .. } => Shape::Map,
        }
    }

    /// Element type (the key type for maps)
    pub fn element_type(&self) -> Primitive {
        match *self {
            TypeDescriptor::Scalar(p) | TypeDescriptor::List(p) | TypeDescriptor::ListOfList(p) => p,
            TypeDescriptor::Map { key, .. } => key,
        }
    }

    /// Value type, present only for maps
    pub fn value_type(&self) -> Option<Primitive> {
        match *self {
            TypeDescriptor::Map { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Check if this is the scalar form of `primitive`
    pub fn is_scalar_of(&self, primitive: Primitive) -> bool {
        *self == TypeDescriptor::Scalar(primitive)
    }
}

/// Trim and lowercase a type string, dropping whitespace that touches `[`
/// or `]`. Whitespace between two other characters is kept, so it still
/// splits a primitive token.
fn compact(input: &str) -> String {
    let is_bracket = |c: Option<char>| matches!(c, Some('[') | Some(']'));
    let mut out = String::with_capacity(input.len());
    let mut chars = input.trim().chars().peekable();
    while let Some(c) = chars.next() {
        if !c.is_whitespace() {
            out.push(c);
            continue;
        }
        let mut run = String::from(c);
        while let Some(&next) = chars.peek() {
            if !next.is_whitespace() {
                break;
            }
            run.push(next);
            chars.next();
        }
        if !is_bracket(out.chars().last()) && !is_bracket(chars.peek().copied()) {
            out.push_str(&run);
        }
    }
    out.to_lowercase()
}

/// Resolve one primitive slot of a type string
fn element(token: &str, whole: &str) -> Result<Primitive, TypeError> {
    if token.is_empty() || token.contains(['[', ']']) {
        return Err(TypeError::Malformed(whole.to_string()));
    }
    Primitive::resolve(token)
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Scalar(p) => write!(f, "{}", p),
            TypeDescriptor::List(p) => write!(f, "{}{}", LIST_PREFIX, p),
            TypeDescriptor::ListOfList(p) => write!(f, "{}{}", NESTED_LIST_PREFIX, p),
            TypeDescriptor::Map { key, value } => write!(f, "{}{}]{}", MAP_PREFIX, key, value),
        }
    }
}

impl FromStr for TypeDescriptor {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeDescriptor::resolve(s)
    }
}
