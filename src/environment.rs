//! Symbol Environment
//!
//! Two flat tables that live for one compilation: variables (name to declared
//! type) and functions (name to signature and body). There is no nesting; a
//! function's parameters and locals share the table with everything else.
//!
//! Both tables keep every binding in insertion order and resolve a name to
//! the *first* binding registered under it.

use std::collections::HashMap;

use crate::ast::Node;
use crate::builder::BuildError;
use crate::types::Type;

#[derive(Debug, Clone, PartialEq)]
pub struct VariableBinding {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBinding {
    pub name: String,
    pub params: Vec<VariableBinding>,
    pub return_type: Type,
    pub body: Node,
    pub return_expr: Node,
}

#[derive(Debug, Default)]
pub struct Environment {
    variables: Vec<VariableBinding>,
    variable_index: HashMap<String, usize>,
    functions: Vec<FunctionBinding>,
    function_index: HashMap<String, usize>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` unless it is already bound. Returns whether the
    /// binding was inserted.
    pub fn declare_variable(&mut self, name: &str, ty: Type) -> bool {
        if self.variable_index.contains_key(name) {
            tracing::debug!(name, %ty, "variable already declared, keeping first binding");
            return false;
        }
        tracing::debug!(name, %ty, "declare variable");
        self.variable_index
            .insert(name.to_string(), self.variables.len());
        self.variables.push(VariableBinding {
            name: name.to_string(),
            ty,
        });
        true
    }

    pub fn lookup_variable(&self, name: &str) -> Result<Type, BuildError> {
        self.variable_type(name)
            .ok_or_else(|| BuildError::UndeclaredIdentifier {
                name: name.to_string(),
            })
    }

    pub fn variable_type(&self, name: &str) -> Option<Type> {
        self.variable_index
            .get(name)
            .map(|&index| self.variables[index].ty)
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variable_index.contains_key(name)
    }

    /// Appends a function binding. Duplicates are kept; lookups see the first.
    pub fn declare_function(&mut self, binding: FunctionBinding) {
        tracing::debug!(
            name = %binding.name,
            params = binding.params.len(),
            return_type = %binding.return_type,
            "declare function"
        );
        self.function_index
            .entry(binding.name.clone())
            .or_insert(self.functions.len());
        self.functions.push(binding);
    }

    pub fn lookup_function(&self, name: &str) -> Option<&FunctionBinding> {
        self.function_index
            .get(name)
            .map(|&index| &self.functions[index])
    }

    pub fn lookup_function_body(&self, name: &str) -> Option<&Node> {
        self.lookup_function(name).map(|function| &function.body)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.function_index.contains_key(name)
    }

    pub fn variables(&self) -> &[VariableBinding] {
        &self.variables
    }

    /// Every registered function in registration order, duplicates included.
    pub fn functions(&self) -> &[FunctionBinding] {
        &self.functions
    }
}
