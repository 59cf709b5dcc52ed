use thiserror::Error;

use crate::ast::{Node, NodeKind};
use crate::config::BuildOptions;
use crate::environment::{Environment, FunctionBinding, VariableBinding};
use crate::types::{binary_result_type, BinOp, Type};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
    #[error("undeclared identifier `{name}`")]
    UndeclaredIdentifier { name: String },
    #[error("operator `{op}` cannot be applied to `{left}` and `{right}`")]
    IncompatibleOperandTypes { op: BinOp, left: Type, right: Type },
    #[error("cannot assign a `{found}` value to `{name}`, declared as `{expected}`")]
    TypeMismatchOnAssign {
        name: String,
        expected: Type,
        found: Type,
    },
    #[error("expected an expression as {context}")]
    NotAnExpression { context: &'static str },
    #[error("parameters of `{function}` must be declarations")]
    InvalidParameter { function: String },
    #[error("unknown operator `{symbol}`")]
    UnknownOperator { symbol: String },
    #[error("call to undeclared function `{name}`")]
    UndeclaredFunction { name: String },
    #[error("`{name}` expects {expected} argument(s), found {found}")]
    ArgumentCountMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("argument {position} of `{name}` should be `{expected}`, found `{found}`")]
    ArgumentTypeMismatch {
        name: String,
        position: usize,
        expected: Type,
        found: Type,
    },
    #[error("`{name}` is already declared")]
    Redeclaration { name: String },
}

impl BuildError {
    /// The identifier or operator the error is about, for pointing into source.
    pub fn subject(&self) -> Option<&str> {
        match self {
            BuildError::UndeclaredIdentifier { name }
            | BuildError::TypeMismatchOnAssign { name, .. }
            | BuildError::UndeclaredFunction { name }
            | BuildError::ArgumentCountMismatch { name, .. }
            | BuildError::ArgumentTypeMismatch { name, .. }
            | BuildError::Redeclaration { name } => Some(name),
            BuildError::InvalidParameter { function } => Some(function),
            BuildError::UnknownOperator { symbol } => Some(symbol),
            BuildError::IncompatibleOperandTypes { op, .. } => Some(op.symbol()),
            BuildError::NotAnExpression { .. } => None,
        }
    }
}

/// Builds typed nodes one construct at a time, checking each against the
/// environment as it goes. The first violation is returned and nothing else is
/// built from it.
#[derive(Debug, Default)]
pub struct AstBuilder {
    env: Environment,
    options: BuildOptions,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BuildOptions) -> Self {
        Self {
            env: Environment::new(),
            options,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn into_environment(self) -> Environment {
        self.env
    }

    // ---------------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------------

    pub fn build_int(&self, value: i64) -> Node {
        tracing::trace!(value, "int literal");
        Node::new(NodeKind::Int(value), Some(Type::Integer))
    }

    pub fn build_float(&self, value: f64) -> Node {
        tracing::trace!(value, "float literal");
        Node::new(NodeKind::Float(value), Some(Type::Float))
    }

    pub fn build_text(&self, value: impl Into<String>) -> Node {
        let value = value.into();
        tracing::trace!(value = %value, "text literal");
        Node::new(NodeKind::Text(value), Some(Type::Text))
    }

    pub fn build_var_ref(&self, name: &str) -> Result<Node, BuildError> {
        let ty = self.env.lookup_variable(name)?;
        tracing::trace!(name, %ty, "variable reference");
        Ok(Node::new(NodeKind::Var(name.to_string()), Some(ty)))
    }

    pub fn build_binary_op(&self, op: BinOp, left: Node, right: Node) -> Result<Node, BuildError> {
        let left_ty = operand_type(&left, "a left operand")?;
        let right_ty = operand_type(&right, "a right operand")?;
        let ty = binary_result_type(op, left_ty, right_ty).ok_or(
            BuildError::IncompatibleOperandTypes {
                op,
                left: left_ty,
                right: right_ty,
            },
        )?;
        tracing::trace!(%op, %left_ty, %right_ty, %ty, "binary operation");
        Ok(Node::new(
            NodeKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            Some(ty),
        ))
    }

    /// Same as [`AstBuilder::build_binary_op`], with the operator given as its token.
    pub fn build_binary(&self, symbol: &str, left: Node, right: Node) -> Result<Node, BuildError> {
        self.build_binary_op(symbol.parse()?, left, right)
    }

    pub fn build_assign(&self, target: &str, value: Node) -> Result<Node, BuildError> {
        let expected = self.env.lookup_variable(target)?;
        let found = operand_type(&value, "an assigned value")?;
        if expected != found {
            return Err(BuildError::TypeMismatchOnAssign {
                name: target.to_string(),
                expected,
                found,
            });
        }
        tracing::trace!(target, ty = %expected, "assignment");
        Ok(Node::new(
            NodeKind::Assign {
                target: target.to_string(),
                value: Box::new(value),
            },
            Some(expected),
        ))
    }

    /// Calls are checked against the callee unless `validate_calls` is off, in
    /// which case they are assembled as-is.
    pub fn build_func_call(&self, name: &str, args: Vec<Node>) -> Result<Node, BuildError> {
        let mut arg_types = Vec::with_capacity(args.len());
        for arg in &args {
            arg_types.push(operand_type(arg, "a call argument")?);
        }

        let callee = self.env.lookup_function(name);
        let ty = if self.options.validate_calls {
            let callee = callee.ok_or_else(|| BuildError::UndeclaredFunction {
                name: name.to_string(),
            })?;
            check_arguments(callee, &arg_types)?;
            callee.return_type
        } else {
            callee.map_or(Type::Integer, |callee| callee.return_type)
        };

        tracing::trace!(name, args = args.len(), %ty, "function call");
        Ok(Node::new(
            NodeKind::Call {
                name: name.to_string(),
                args,
            },
            Some(ty),
        ))
    }

    // ---------------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------------

    pub fn build_print(&self, value: Node) -> Result<Node, BuildError> {
        let ty = operand_type(&value, "the printed value")?;
        tracing::trace!(%ty, "print");
        Ok(Node::new(NodeKind::Print(Box::new(value)), Some(ty)))
    }

    /// The target's type is looked up again when the read is emitted.
    pub fn build_read(&self, name: &str) -> Result<Node, BuildError> {
        self.env.lookup_variable(name)?;
        tracing::trace!(name, "read");
        Ok(Node::new(NodeKind::Read(name.to_string()), None))
    }

    /// Registers the variable. A repeated name keeps its first type unless
    /// `reject_redeclaration` is set.
    pub fn build_decl(&mut self, name: &str, ty: Type) -> Result<Node, BuildError> {
        if self.options.reject_redeclaration && self.env.has_variable(name) {
            return Err(BuildError::Redeclaration {
                name: name.to_string(),
            });
        }
        self.env.declare_variable(name, ty);
        Ok(Node::new(
            NodeKind::Declare {
                name: name.to_string(),
                ty,
            },
            None,
        ))
    }

    /// A function parameter. Registered immediately so the body can use it.
    pub fn build_param(&mut self, name: &str, ty: Type) -> Result<Node, BuildError> {
        self.build_decl(name, ty)
    }

    pub fn build_if(
        &self,
        condition: Node,
        then_branch: Node,
        else_branch: Option<Node>,
    ) -> Result<Node, BuildError> {
        operand_type(&condition, "an if condition")?;
        Ok(Node::new(
            NodeKind::If {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: else_branch.map(Box::new),
            },
            None,
        ))
    }

    pub fn build_while(&self, condition: Node, body: Node) -> Result<Node, BuildError> {
        operand_type(&condition, "a while condition")?;
        Ok(Node::new(
            NodeKind::While {
                condition: Box::new(condition),
                body: Box::new(body),
            },
            None,
        ))
    }

    pub fn build_for(
        &self,
        init: Node,
        condition: Node,
        update: Node,
        body: Node,
    ) -> Result<Node, BuildError> {
        operand_type(&init, "a for initializer")?;
        operand_type(&condition, "a for condition")?;
        operand_type(&update, "a for update")?;
        Ok(Node::new(
            NodeKind::For {
                init: Box::new(init),
                condition: Box::new(condition),
                update: Box::new(update),
                body: Box::new(body),
            },
            None,
        ))
    }

    pub fn build_block(&self, stmts: Vec<Node>) -> Node {
        Node::new(NodeKind::Block(stmts), None)
    }

    pub fn build_return(&self, value: Node) -> Result<Node, BuildError> {
        let ty = operand_type(&value, "a returned value")?;
        Ok(Node::new(NodeKind::Return(Box::new(value)), Some(ty)))
    }

    /// Assembles a function and registers it. Only calls built after this
    /// point can see it, so a function cannot call itself.
    ///
    /// `ret` may be a `Return` node or a bare expression; its type is the
    /// function's return type.
    pub fn build_func_def(
        &mut self,
        name: &str,
        params: Vec<Node>,
        body: Node,
        ret: Node,
    ) -> Result<Node, BuildError> {
        if self.options.reject_redeclaration && self.env.has_function(name) {
            return Err(BuildError::Redeclaration {
                name: name.to_string(),
            });
        }

        let mut bindings = Vec::with_capacity(params.len());
        for param in &params {
            let NodeKind::Declare { name: param_name, ty } = &param.kind else {
                return Err(BuildError::InvalidParameter {
                    function: name.to_string(),
                });
            };
            self.env.declare_variable(param_name, *ty);
            bindings.push(VariableBinding {
                name: param_name.clone(),
                ty: *ty,
            });
        }

        let ret = if matches!(ret.kind, NodeKind::Return(_)) {
            ret
        } else {
            self.build_return(ret)?
        };
        let return_type = ret.ty.unwrap_or(Type::Integer);

        self.env.declare_function(FunctionBinding {
            name: name.to_string(),
            params: bindings,
            return_type,
            body: body.clone(),
            return_expr: ret.clone(),
        });

        Ok(Node::new(
            NodeKind::FunctionDef {
                name: name.to_string(),
                params,
                body: Box::new(body),
                ret: Box::new(ret),
            },
            None,
        ))
    }
}

fn operand_type(node: &Node, context: &'static str) -> Result<Type, BuildError> {
    match node.ty {
        Some(ty) if node.is_expression() => Ok(ty),
        _ => Err(BuildError::NotAnExpression { context }),
    }
}

fn check_arguments(callee: &FunctionBinding, arg_types: &[Type]) -> Result<(), BuildError> {
    if callee.params.len() != arg_types.len() {
        return Err(BuildError::ArgumentCountMismatch {
            name: callee.name.clone(),
            expected: callee.params.len(),
            found: arg_types.len(),
        });
    }
    for (position, (param, &found)) in callee.params.iter().zip(arg_types).enumerate() {
        if param.ty != found {
            return Err(BuildError::ArgumentTypeMismatch {
                name: callee.name.clone(),
                position: position + 1,
                expected: param.ty,
                found,
            });
        }
    }
    Ok(())
}
