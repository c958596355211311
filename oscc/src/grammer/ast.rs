use serde::Serialize;
use std::fmt;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum NodeKind {
    Root,
    Directive,
    Argument,
    Structure,
    Procedure,
    ProcedureCall,
    Type,
    Modifier,
    Field,
    Assignment,
    Declaration,
    Variable,
    Allocation,
    Scalar,
    DynOffset,
    Print,
    Return,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AstNode {
    pub kind: NodeKind,
    pub value: String,
    pub value_type: Option<String>,
    pub value_size: Option<u64>,
    pub is_pointer: bool,
    pub path: Option<String>,
    pub offset: u64,
    pub children: Vec<AstNode>,
}

impl AstNode {
    pub fn new(kind: NodeKind, value: impl Into<String>) -> Self {
        AstNode {
            kind,
            value: value.into(),
            value_type: None,
            value_size: None,
            is_pointer: false,
            path: None,
            offset: 0,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<AstNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_type(mut self, name: impl Into<String>) -> Self {
        self.value_type = Some(name.into());
        self
    }

    /// Copy the type information of a `Type` node onto this node
    pub fn typed_as(mut self, ty: &AstNode) -> Self {
        self.value_type = Some(ty.value.clone());
        self.value_size = ty.value_size;
        self.is_pointer = ty.is_pointer;
        self
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    /// Children of the given kind
    pub fn children_of(&self, kind: NodeKind) -> impl Iterator<Item = &AstNode> {
        self.children.iter().filter(move |child| child.kind == kind)
    }

    /// Children that are not modifiers
    pub fn operands(&self) -> impl Iterator<Item = &AstNode> {
        self.children
            .iter()
            .filter(|child| child.kind != NodeKind::Modifier)
    }

    fn label(&self) -> String {
        let mut label = self.kind.to_string();
        if !self.value.is_empty() {
            label += &format!(" '{}'", self.value);
        }
        if let Some(ty) = &self.value_type {
            label += &format!(" [{}", ty);
            if let Some(size) = self.value_size {
                label += &format!("({})", size);
            }
            if self.is_pointer {
                label += "*";
            }
            label += "]";
        }
        if let Some(path) = &self.path {
            label += &format!(" @{}", path);
        }
        if self.offset != 0 {
            label += &format!(" +{}", self.offset);
        }
        label
    }

    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(f, "{}{}", "  ".repeat(depth), self.label())?;
        for child in &self.children {
            child.fmt_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}
