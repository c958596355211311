pub mod mangle;
pub mod scope;
pub mod types;

use crate::error::{Error, Warning};
use crate::grammer::ast::{AstNode, NodeKind};
use mangle::mangle;
use scope::{Procedure, Scope, ScopeStack, Variable};
use types::{check_assignment, implicit_type, Compatibility, Type, VOID};

/// Result of a successful analysis
#[derive(Debug, Clone)]
pub struct Analysis {
    pub ast: AstNode,
    pub warnings: Vec<Warning>,
    /// Scopes in the order they were left
    pub scopes: Vec<Scope>,
    pub globals: Scope,
}

#[derive(Debug, Default)]
pub struct Analyzer {
    scopes: ScopeStack,
    archive: Vec<Scope>,
    warnings: Vec<Warning>,
    procedure: Option<Procedure>,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scopes currently on the stack
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Warnings raised so far. Kept after a failed run.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn analyze(&mut self, mut ast: AstNode) -> Result<Analysis, Error> {
        self.visit(&mut ast)?;
        Ok(Analysis {
            ast,
            warnings: std::mem::take(&mut self.warnings),
            scopes: std::mem::take(&mut self.archive),
            globals: self.scopes.root().clone(),
        })
    }
}

// ----------------------------------------------------------------------------
// Traversal
// ----------------------------------------------------------------------------

impl Analyzer {
    fn visit(&mut self, node: &mut AstNode) -> Result<(), Error> {
        match node.kind {
            NodeKind::Root | NodeKind::Directive | NodeKind::Field | NodeKind::Print => {
                self.visit_children(node)
            }
            NodeKind::Structure => self.scoped(node, Self::visit_structure),
            NodeKind::Procedure => self.scoped(node, Self::visit_procedure),
            NodeKind::Argument => self.visit_argument(node),
            NodeKind::ProcedureCall => self.visit_call(node),
            NodeKind::Type => self.visit_type(node),
            NodeKind::Modifier | NodeKind::Scalar => Ok(()),
            NodeKind::Assignment => self.visit_assignment(node),
            NodeKind::Declaration => self.visit_declaration(node),
            NodeKind::Variable | NodeKind::DynOffset => self.resolve_reference(node).map(|_| ()),
            NodeKind::Allocation => self.declared_type(node).map(|_| ()),
            NodeKind::Return => self.visit_return(node),
        }
    }

    fn visit_children(&mut self, node: &mut AstNode) -> Result<(), Error> {
        for child in node.children.iter_mut() {
            self.visit(child)?;
        }
        Ok(())
    }

    /// Run `f` inside a fresh scope. The scope is popped on every exit path.
    fn scoped<F>(&mut self, node: &mut AstNode, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Self, &mut AstNode) -> Result<(), Error>,
    {
        self.scopes.push();
        let result = f(self, node);
        if let Some(scope) = self.scopes.pop() {
            self.archive.push(scope);
        }
        result
    }

    fn assign(&mut self, to: &Type, from: &Type) -> Result<(), Error> {
        match check_assignment(to, from) {
            Compatibility::Ok => Ok(()),
            Compatibility::LossOfInformation => {
                self.warnings.push(Warning::LossOfInformation {
                    to: to.to_string(),
                    from: from.to_string(),
                });
                Ok(())
            }
            Compatibility::Illegal => Err(Error::IllegalAssignment {
                to: to.to_string(),
                from: from.to_string(),
            }),
        }
    }

    /// Resolve a type name, applying an explicit size to elementary types
    fn resolve_type(&self, name: &str, size: Option<u64>) -> Result<Type, Error> {
        let mut ty = self
            .scopes
            .resolve_type(name)
            .cloned()
            .ok_or_else(|| Error::UnresolvedType(name.to_string()))?;
        if let Some(size) = size {
            ty.size = size;
        }
        Ok(ty)
    }

    /// Type carried by a typed node (`Variable`, `Argument`, `Allocation`)
    fn declared_type(&self, node: &AstNode) -> Result<Type, Error> {
        let name = node.value_type.as_deref().ok_or_else(|| {
            Error::MalformedNode(node.kind.to_string(), format!("'{}' has no type", node.value))
        })?;
        self.resolve_type(name, node.value_size)
    }
}

// ----------------------------------------------------------------------------
// Declarations
// ----------------------------------------------------------------------------

impl Analyzer {
    fn visit_structure(&mut self, node: &mut AstNode) -> Result<(), Error> {
        self.visit_children(node)?;

        let nested = node.path.as_deref().is_some_and(|path| path.contains("::"));
        if node.value.is_empty() || nested {
            return Ok(());
        }
        let ty = self.structure_type(node)?;
        self.scopes.declare_type(ty)
    }

    fn structure_type(&self, node: &AstNode) -> Result<Type, Error> {
        let mut ty = Type::elementary(node.value.clone(), 0);
        for child in node.operands() {
            let field = match child.kind {
                NodeKind::Field => {
                    let annot = child.children_of(NodeKind::Type).next().ok_or_else(|| {
                        Error::MalformedNode("Field".to_string(), format!("'{}' has no type", child.value))
                    })?;
                    self.resolve_type(&annot.value, annot.value_size)?
                }
                NodeKind::Structure => self.structure_type(child)?,
                _ => continue,
            };
            let key = mangle(&child.value);
            if ty.subtypes.contains_key(&key) {
                return Err(Error::Redeclaration("field", child.value.clone()));
            }
            ty.subtypes.insert(key, field);
        }
        Ok(ty)
    }

    fn visit_procedure(&mut self, node: &mut AstNode) -> Result<(), Error> {
        let returns = match node.children.first() {
            Some(ty) if ty.is(NodeKind::Type) => ty,
            _ => {
                return Err(Error::MalformedNode(
                    "Procedure".to_string(),
                    format!("'{}' has no return type", node.value),
                ))
            }
        };
        let returns = if returns.value.eq_ignore_ascii_case(VOID) {
            None
        } else {
            Some(self.resolve_type(&returns.value, returns.value_size)?)
        };

        let params = node
            .children_of(NodeKind::Argument)
            .map(|arg| {
                let ty = self.declared_type(arg)?;
                Ok(Variable::new(&arg.value, ty, arg.is_pointer))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let statements: Vec<_> = node
            .operands()
            .filter(|child| !child.is(NodeKind::Type) && !child.is(NodeKind::Argument))
            .collect();
        if let Some(pos) = statements.iter().position(|stmt| stmt.is(NodeKind::Return)) {
            if pos + 1 != statements.len() {
                return Err(Error::UnreachableCode(node.value.clone()));
            }
        }

        let proc = Procedure {
            name: node.value.clone(),
            mangled: mangle(&node.value),
            returns,
            params,
        };
        self.scopes.declare_procedure(proc.clone())?;

        let outer = self.procedure.replace(proc);
        let result = self.visit_children(node);
        self.procedure = outer;
        result
    }

    fn visit_argument(&mut self, node: &mut AstNode) -> Result<(), Error> {
        match node.children_of(NodeKind::Type).count() {
            // Directive or call argument
            0 => self.visit_children(node),
            1 => {
                let ty = self.declared_type(node)?;
                self.scopes
                    .declare_variable(Variable::new(&node.value, ty, node.is_pointer))
            }
            _ => Err(Error::MalformedParameter(node.value.clone())),
        }
    }

    fn visit_type(&mut self, node: &mut AstNode) -> Result<(), Error> {
        if node.value.eq_ignore_ascii_case(VOID) || node.value.eq_ignore_ascii_case("struct") {
            return Ok(());
        }
        self.resolve_type(&node.value, node.value_size).map(|_| ())
    }

    fn visit_declaration(&mut self, node: &mut AstNode) -> Result<(), Error> {
        let mut operands = node.children.iter_mut().filter(|c| !c.is(NodeKind::Modifier));
        let (Some(target), Some(value), None) = (operands.next(), operands.next(), operands.next())
        else {
            return Err(Error::MalformedNode(
                "Declaration".to_string(),
                "expected a target and a value".to_string(),
            ));
        };

        // The value cannot see the name it initializes
        self.visit(value)?;

        let mut ty = self.declared_type(target)?;
        if let Some(from) = implicit_type(value) {
            if !ty.is_composite() && ty.size == 0 {
                ty.size = from.size;
            }
            if !target.is_pointer {
                self.assign(&ty, &from)?;
            }
        }
        self.scopes
            .declare_variable(Variable::new(&target.value, ty, target.is_pointer))
    }
}

// ----------------------------------------------------------------------------
// Statements and references
// ----------------------------------------------------------------------------

impl Analyzer {
    fn visit_assignment(&mut self, node: &mut AstNode) -> Result<(), Error> {
        let [target, value] = node.children.as_mut_slice() else {
            return Err(Error::MalformedNode(
                "Assignment".to_string(),
                "expected a target and a value".to_string(),
            ));
        };
        self.visit(value)?;

        // Members of anonymous structures are not variables
        if target.is(NodeKind::Field) {
            return Ok(());
        }
        let to = self.resolve_reference(target)?;
        match implicit_type(value) {
            Some(from) if !target.is_pointer => self.assign(&to, &from),
            _ => Ok(()),
        }
    }

    fn visit_return(&mut self, node: &mut AstNode) -> Result<(), Error> {
        self.visit_children(node)?;
        let Some(proc) = self.procedure.clone() else {
            return Ok(());
        };
        match (&proc.returns, node.children.first()) {
            (None, Some(_)) => Err(Error::UnexpectedReturnValue(proc.name)),
            (Some(_), None) => Err(Error::MissingReturnValue(proc.name)),
            (Some(to), Some(value)) => match implicit_type(value) {
                Some(from) => self.assign(to, &from),
                None => Ok(()),
            },
            (None, None) => Ok(()),
        }
    }

    fn visit_call(&mut self, node: &mut AstNode) -> Result<(), Error> {
        let proc = self
            .scopes
            .resolve_procedure(&node.value)
            .cloned()
            .ok_or_else(|| Error::UnresolvedProcedure(node.value.clone()))?;
        self.visit_children(node)?;

        let args: Vec<_> = node.children_of(NodeKind::Argument).collect();
        if args.len() != proc.params.len() {
            return Err(Error::ArgumentCount(proc.name, proc.params.len(), args.len()));
        }
        for (param, arg) in proc.params.iter().zip(args) {
            let from = arg.children.first().and_then(implicit_type);
            if let Some(from) = from {
                if !param.is_pointer {
                    self.assign(&param.ty, &from)?;
                }
            }
        }
        Ok(())
    }

    /// Resolve a variable or a field path and annotate it with the resolved types.
    /// Returns the type of the last path segment.
    fn resolve_reference(&mut self, node: &mut AstNode) -> Result<Type, Error> {
        let ty = self
            .scopes
            .resolve_variable(&node.value)
            .map(|var| var.ty.clone())
            .ok_or_else(|| Error::UnresolvedVariable(node.value.clone()))?;
        node.value_type = Some(ty.name.clone());
        self.resolve_segments(&ty, node)
    }

    fn resolve_segments(&mut self, parent: &Type, node: &mut AstNode) -> Result<Type, Error> {
        let mut leaf = parent.clone();
        for child in node.children.iter_mut() {
            match child.kind {
                NodeKind::Field => {
                    let ty = parent.subtype(&child.value).cloned().ok_or_else(|| {
                        Error::UnresolvedPath(child.path.clone().unwrap_or_else(|| child.value.clone()))
                    })?;
                    child.value_type = Some(ty.name.clone());
                    leaf = self.resolve_segments(&ty, child)?;
                }
                NodeKind::DynOffset => {
                    self.resolve_reference(child)?;
                }
                _ => self.visit(child)?,
            }
        }
        Ok(leaf)
    }
}
