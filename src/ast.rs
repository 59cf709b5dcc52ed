use std::fmt;

use crate::types::{BinOp, Type};

/// A node of the typed syntax tree.
///
/// `ty` is the static type computed when the node was built. Expression nodes
/// always carry one; `Print` and `Return` mirror their operand; the remaining
/// statements carry none.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub ty: Option<Type>,
}

/// One variant per language construct.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// An integer literal.
    Int(i64),
    /// A float literal.
    Float(f64),
    /// A text literal, without quotes or escapes.
    Text(String),
    /// A variable reference.
    Var(String),
    /// A binary operation.
    Binary {
        op: BinOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// An assignment. Usable both as a statement and as an expression.
    Assign { target: String, value: Box<Node> },
    /// A print statement.
    Print(Box<Node>),
    /// Reads a value from stdin into a declared variable.
    Read(String),
    /// A variable declaration.
    Declare { name: String, ty: Type },
    /// An if/else statement.
    If {
        condition: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Option<Box<Node>>,
    },
    /// A while loop.
    While { condition: Box<Node>, body: Box<Node> },
    /// A C-style for loop.
    For {
        init: Box<Node>,
        condition: Box<Node>,
        update: Box<Node>,
        body: Box<Node>,
    },
    /// A sequence of statements.
    Block(Vec<Node>),
    /// A function definition. `params` are `Declare` nodes.
    FunctionDef {
        name: String,
        params: Vec<Node>,
        body: Box<Node>,
        ret: Box<Node>,
    },
    /// A function call.
    Call { name: String, args: Vec<Node> },
    /// A return statement.
    Return(Box<Node>),
}

impl Node {
    pub fn new(kind: NodeKind, ty: Option<Type>) -> Self {
        Self { kind, ty }
    }

    pub fn is_expression(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Int(_)
                | NodeKind::Float(_)
                | NodeKind::Text(_)
                | NodeKind::Var(_)
                | NodeKind::Binary { .. }
                | NodeKind::Assign { .. }
                | NodeKind::Call { .. }
        )
    }

    /// `Text + Text`, the one binary form that needs a scratch buffer.
    pub fn is_concat(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Binary { op: BinOp::Add, .. }
        ) && self.ty == Some(Type::Text)
    }

    fn label(&self) -> String {
        match &self.kind {
            NodeKind::Int(value) => format!("Int: {value}"),
            NodeKind::Float(value) => format!("Float: {value:?}"),
            NodeKind::Text(value) => format!("Text: {value:?}"),
            NodeKind::Var(name) => format!("Var: {name}"),
            NodeKind::Binary { op, .. } => format!("Binary: {op}"),
            NodeKind::Assign { target, .. } => format!("Assign: {target}"),
            NodeKind::Print(_) => "Print".to_string(),
            NodeKind::Read(name) => format!("Read: {name}"),
            NodeKind::Declare { name, ty } => format!("Declare: {ty} {name}"),
            NodeKind::If { .. } => "If".to_string(),
            NodeKind::While { .. } => "While".to_string(),
            NodeKind::For { .. } => "For".to_string(),
            NodeKind::Block(_) => "Block".to_string(),
            NodeKind::FunctionDef { name, .. } => format!("FunctionDef: {name}"),
            NodeKind::Call { name, .. } => format!("Call: {name}"),
            NodeKind::Return(_) => "Return".to_string(),
        }
    }

    fn children(&self) -> Vec<&Node> {
        match &self.kind {
            NodeKind::Int(_)
            | NodeKind::Float(_)
            | NodeKind::Text(_)
            | NodeKind::Var(_)
            | NodeKind::Read(_)
            | NodeKind::Declare { .. } => Vec::new(),
            NodeKind::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            NodeKind::Assign { value, .. } => vec![value.as_ref()],
            NodeKind::Print(value) | NodeKind::Return(value) => vec![value.as_ref()],
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let mut children = vec![condition.as_ref(), then_branch.as_ref()];
                children.extend(else_branch.as_deref());
                children
            }
            NodeKind::While { condition, body } => vec![condition.as_ref(), body.as_ref()],
            NodeKind::For {
                init,
                condition,
                update,
                body,
            } => vec![
                init.as_ref(),
                condition.as_ref(),
                update.as_ref(),
                body.as_ref(),
            ],
            NodeKind::Block(stmts) => stmts.iter().collect(),
            NodeKind::FunctionDef {
                params, body, ret, ..
            } => params
                .iter()
                .chain([body.as_ref(), ret.as_ref()])
                .collect(),
            NodeKind::Call { args, .. } => args.iter().collect(),
        }
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:width$}{}", "", self.label(), width = depth * 2)?;
        if let Some(ty) = self.ty {
            write!(f, " : {ty}")?;
        }
        writeln!(f)?;
        for child in self.children() {
            child.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Indented tree dump, one node per line.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}
