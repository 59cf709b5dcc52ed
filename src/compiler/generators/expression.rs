//! Expression Compilation Module
//!
//! Turns expression nodes into C expression text. Two forms exist:
//!
//! - **bare**: the text as it may appear where no operator binds around it
//!   (a statement, an argument, a condition), e.g. `a + 1`;
//! - **wrapped**: safe as an operand of another operator, e.g. `(a + 1)`.
//!
//! Only infix forms differ between the two. Guarded arithmetic and text
//! operations become shim calls and never need parentheses.

use crate::ast::{Node, NodeKind};
use crate::codegen::{CodeGenError, CodeGenerator};
use crate::compiler::runtime::Shim;
use crate::compiler::values;
use crate::types::{BinOp, Type};

/// Compiles an expression in operand position.
pub fn compile_expression(
    generator: &mut CodeGenerator<'_>,
    node: &Node,
) -> Result<String, CodeGenError> {
    let text = compile_bare(generator, node)?;
    if is_infix(node) {
        Ok(format!("({text})"))
    } else {
        Ok(text)
    }
}

/// Compiles an expression where nothing binds around it.
pub fn compile_bare(generator: &mut CodeGenerator<'_>, node: &Node) -> Result<String, CodeGenError> {
    match &node.kind {
        NodeKind::Int(value) => Ok(values::int_literal(*value)),
        NodeKind::Float(value) => {
            let (text, needs_math) = values::float_literal(*value);
            if needs_math {
                generator.runtime.require_math();
            }
            Ok(text)
        }
        NodeKind::Text(value) => Ok(values::text_literal(value)),
        NodeKind::Var(name) => Ok(values::variable_name(name)),
        NodeKind::Binary { op, left, right } => compile_binary(generator, node, *op, left, right),
        NodeKind::Assign { target, value } => {
            let target = values::variable_name(target);
            if node.ty == Some(Type::Text) {
                let copy = generator.runtime.require(Shim::TextCopy);
                let value = compile_bare(generator, value)?;
                Ok(format!(
                    "{copy}({target}, {value}, {})",
                    generator.options.text_capacity()
                ))
            } else {
                let value = compile_bare(generator, value)?;
                Ok(format!("{target} = {value}"))
            }
        }
        NodeKind::Call { name, args } => {
            let mut compiled = Vec::with_capacity(args.len() + 1);
            if node.ty == Some(Type::Text) {
                // Each call gets its own result buffer, alive until the end of
                // the enclosing block.
                compiled.push(format!("(char[{}]){{0}}", generator.options.text_capacity()));
            }
            for arg in args {
                compiled.push(compile_bare(generator, arg)?);
            }
            Ok(format!("{}({})", values::function_name(name), compiled.join(", ")))
        }
        _ => Err(CodeGenError::UnexpectedStatement {
            context: "an expression",
        }),
    }
}

/// Compiles a branch or loop condition. Numbers are true when non-zero, text
/// when non-empty.
pub fn compile_condition(
    generator: &mut CodeGenerator<'_>,
    node: &Node,
) -> Result<String, CodeGenError> {
    if node.ty == Some(Type::Text) {
        let text = compile_expression(generator, node)?;
        Ok(format!("{text}[0] != '\\0'"))
    } else {
        compile_bare(generator, node)
    }
}

fn compile_binary(
    generator: &mut CodeGenerator<'_>,
    node: &Node,
    op: BinOp,
    left: &Node,
    right: &Node,
) -> Result<String, CodeGenError> {
    if node.is_concat() {
        let concat = generator.runtime.require(Shim::TextConcat);
        let left = compile_bare(generator, left)?;
        let right = compile_bare(generator, right)?;
        let cap = generator.options.concat_capacity();
        return Ok(format!("{concat}((char[{cap}]){{0}}, {cap}, {left}, {right})"));
    }

    if op.is_comparison() && left.ty == Some(Type::Text) {
        let left = compile_bare(generator, left)?;
        let right = compile_bare(generator, right)?;
        return Ok(format!("strcmp({left}, {right}) {op} 0"));
    }

    if op.is_guarded() {
        let shim = match (op, node.ty) {
            (BinOp::Div, Some(Type::Float)) => Shim::DivFloat,
            (BinOp::Mod, Some(Type::Float)) => Shim::ModFloat,
            (BinOp::Div, _) => Shim::DivInt,
            _ => Shim::ModInt,
        };
        let guard = generator.runtime.require(shim);
        let left = compile_bare(generator, left)?;
        let right = compile_bare(generator, right)?;
        return Ok(format!("{guard}({left}, {right})"));
    }

    let left = compile_expression(generator, left)?;
    let right = compile_expression(generator, right)?;
    Ok(format!("{left} {op} {right}"))
}

/// Whether the bare form of `node` is an infix expression.
fn is_infix(node: &Node) -> bool {
    match &node.kind {
        NodeKind::Binary { op, .. } => !op.is_guarded() && !node.is_concat(),
        NodeKind::Assign { .. } => node.ty != Some(Type::Text),
        _ => false,
    }
}
