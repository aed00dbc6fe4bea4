//! Configuration value model
//!
//! Values form a strict tree: scalars at the leaves, lists and pairs
//! as containers. A list carries its declared element kind alongside
//! the items, and pairs hold exactly two sub-values (car/cdr). There
//! is no way to build a cycle, so recursive walks need no guards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag for a configuration value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Int,
    Float,
    String,
    Bool,
    List,
    Pair,
}

impl ValueKind {
    /// Type name as used in the dump format
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Bool => "bool",
            ValueKind::List => "list",
            ValueKind::Pair => "pair",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed configuration value
///
/// Lists are homogeneously typed: the declared element kind is stored
/// with the list and is authoritative even when the list is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ConfValue {
    Int(i32),
    Float(f64),
    String(String),
    Bool(bool),
    List {
        elem: ValueKind,
        items: Vec<ConfValue>,
    },
    Pair {
        car: Box<ConfValue>,
        cdr: Box<ConfValue>,
    },
}

impl ConfValue {
    /// Build a list value with an explicit element kind
    pub fn list(elem: ValueKind, items: Vec<ConfValue>) -> Self {
        ConfValue::List { elem, items }
    }

    /// Build a pair value
    pub fn pair(car: ConfValue, cdr: ConfValue) -> Self {
        ConfValue::Pair {
            car: Box::new(car),
            cdr: Box::new(cdr),
        }
    }

    /// The type tag of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            ConfValue::Int(_) => ValueKind::Int,
            ConfValue::Float(_) => ValueKind::Float,
            ConfValue::String(_) => ValueKind::String,
            ConfValue::Bool(_) => ValueKind::Bool,
            ConfValue::List { .. } => ValueKind::List,
            ConfValue::Pair { .. } => ValueKind::Pair,
        }
    }
}

/// One-line rendering for report output; the dump file uses the
/// structured renderer in the export module instead.
impl fmt::Display for ConfValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfValue::Int(v) => write!(f, "{v}"),
            ConfValue::Float(v) => write!(f, "{v:?}"),
            ConfValue::String(v) => f.write_str(v),
            ConfValue::Bool(v) => write!(f, "{v}"),
            ConfValue::List { items, .. } => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            ConfValue::Pair { car, cdr } => write!(f, "({car},{cdr})"),
        }
    }
}
