use super::mangle::mangle;
use crate::grammer::ast::{AstNode, NodeKind};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Built-in elementary types seeded into the root scope. Size 0 is unspecified.
pub const BUILTINS: &[(&str, u64)] = &[("int", 0), ("uint", 0), ("string", 0)];

/// Type name of procedures without a return value
pub const VOID: &str = "void";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Type {
    pub name: String,
    pub size: u64,
    pub subtypes: IndexMap<String, Type>,
}

impl Type {
    pub fn elementary(name: impl Into<String>, size: u64) -> Self {
        Type {
            name: name.into(),
            size,
            subtypes: IndexMap::new(),
        }
    }

    pub fn is_composite(&self) -> bool {
        !self.subtypes.is_empty()
    }

    /// Explicit size of elementary types, recursive sum for composites
    pub fn size(&self) -> u64 {
        if self.is_composite() {
            self.subtypes.values().map(Type::size).sum()
        } else {
            self.size
        }
    }

    pub fn subtype(&self, field: &str) -> Option<&Type> {
        self.subtypes.get(&mangle(field))
    }

    fn is_string(&self) -> bool {
        !self.is_composite() && self.name == "string"
    }

    fn is_numeric(&self) -> bool {
        !self.is_composite() && matches!(self.name.as_str(), "int" | "uint")
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.size())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compatibility {
    Ok,
    LossOfInformation,
    Illegal,
}

/// Can a value of type `from` be stored in a location of type `to`?
/// A target of size 0 has no declared bound.
pub fn check_assignment(to: &Type, from: &Type) -> Compatibility {
    if from.is_string() && to.is_numeric() {
        return Compatibility::Illegal;
    }
    if to.is_composite() || from.is_composite() {
        return Compatibility::Ok;
    }
    if to.size() != 0 && from.size() > to.size() {
        return Compatibility::LossOfInformation;
    }
    Compatibility::Ok
}

/// Type of a literal value, sized to its textual length.
/// `None` when the type cannot be told without resolving names.
pub fn implicit_type(node: &AstNode) -> Option<Type> {
    if !node.is(NodeKind::Scalar) {
        return None;
    }
    let size = node.value.len() as u64;
    match node.value_type.as_deref() {
        Some("string") => Some(Type::elementary("string", size)),
        Some(_) | None => Some(Type::elementary("int", size)),
    }
}
