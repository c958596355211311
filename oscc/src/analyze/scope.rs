use super::mangle::mangle;
use super::types::{Type, BUILTINS};
use crate::error::Error;
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub name: String,
    pub mangled: String,
    pub ty: Type,
    pub is_pointer: bool,
    pub size: u64,
}

impl Variable {
    pub fn new(name: &str, ty: Type, is_pointer: bool) -> Self {
        Variable {
            name: name.to_string(),
            mangled: mangle(name),
            size: ty.size(),
            ty,
            is_pointer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Procedure {
    pub name: String,
    pub mangled: String,
    pub returns: Option<Type>,
    pub params: Vec<Variable>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scope {
    pub depth: usize,
    pub variables: IndexMap<String, Variable>,
    pub types: IndexMap<String, Type>,
    pub procedures: IndexMap<String, Procedure>,
}

impl Scope {
    fn new(depth: usize) -> Self {
        Scope {
            depth,
            ..Default::default()
        }
    }
}

/// Lexical scopes, innermost last. The root scope is never popped.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    pub fn new() -> Self {
        let mut root = Scope::new(0);
        for (name, size) in BUILTINS {
            root.types
                .insert(mangle(name), Type::elementary(*name, *size));
        }
        ScopeStack { scopes: vec![root] }
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Depth of the innermost scope
    pub fn depth(&self) -> usize {
        self.scopes.last().map_or(0, |scope| scope.depth)
    }

    pub fn push(&mut self) {
        let depth = self.depth() + 1;
        self.scopes.push(Scope::new(depth));
    }

    pub fn pop(&mut self) -> Option<Scope> {
        if self.scopes.len() > 1 {
            self.scopes.pop()
        } else {
            None
        }
    }

    pub fn root(&self) -> &Scope {
        &self.scopes[0]
    }

    fn current(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    /// Types and procedures of depth 1 belong to the root scope
    fn hoisted(&mut self) -> &mut Scope {
        if self.depth() == 1 {
            &mut self.scopes[0]
        } else {
            self.current()
        }
    }

    pub fn declare_variable(&mut self, var: Variable) -> Result<(), Error> {
        let scope = self.current();
        if scope.variables.contains_key(&var.mangled) {
            return Err(Error::Redeclaration("variable", var.name));
        }
        scope.variables.insert(var.mangled.clone(), var);
        Ok(())
    }

    pub fn declare_type(&mut self, ty: Type) -> Result<(), Error> {
        let scope = self.hoisted();
        let mangled = mangle(&ty.name);
        if scope.types.contains_key(&mangled) {
            return Err(Error::Redeclaration("type", ty.name));
        }
        scope.types.insert(mangled, ty);
        Ok(())
    }

    pub fn declare_procedure(&mut self, proc: Procedure) -> Result<(), Error> {
        let scope = self.hoisted();
        if scope.procedures.contains_key(&proc.mangled) {
            return Err(Error::Redeclaration("procedure", proc.name));
        }
        scope.procedures.insert(proc.mangled.clone(), proc);
        Ok(())
    }

    pub fn resolve_variable(&self, name: &str) -> Option<&Variable> {
        let mangled = mangle(name);
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.variables.get(&mangled))
    }

    pub fn resolve_type(&self, name: &str) -> Option<&Type> {
        let mangled = mangle(name);
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.types.get(&mangled))
    }

    pub fn resolve_procedure(&self, name: &str) -> Option<&Procedure> {
        let mangled = mangle(name);
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.procedures.get(&mangled))
    }
}
