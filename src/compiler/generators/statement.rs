//! Statement Compilation Module
//!
//! Emits C statements for each statement node. Each function takes
//! `&mut CodeGenerator` to reach the output buffer, the options and the
//! environment.
//!
//! Declarations and function definitions found in the tree emit nothing here:
//! the generator writes every variable of the environment at file scope and
//! every function from its function table before `main`.

use crate::ast::{Node, NodeKind};
use crate::codegen::{CodeGenError, CodeGenerator, RESULT_BUFFER};
use crate::compiler::generators::expression::{compile_bare, compile_condition, compile_expression};
use crate::compiler::runtime::Shim;
use crate::compiler::values;
use crate::types::Type;

pub fn compile_statement(generator: &mut CodeGenerator<'_>, node: &Node) -> Result<(), CodeGenError> {
    match &node.kind {
        NodeKind::Declare { .. } | NodeKind::FunctionDef { .. } => Ok(()),
        NodeKind::Assign { target, value } => compile_assign(generator, target, value),
        NodeKind::Print(value) => compile_print(generator, value),
        NodeKind::Read(name) => compile_read(generator, name),
        NodeKind::If {
            condition,
            then_branch,
            else_branch,
        } => compile_if(generator, condition, then_branch, else_branch.as_deref()),
        NodeKind::While { condition, body } => compile_while(generator, condition, body),
        NodeKind::For {
            init,
            condition,
            update,
            body,
        } => compile_for(generator, init, condition, update, body),
        NodeKind::Block(stmts) => {
            for stmt in stmts {
                compile_statement(generator, stmt)?;
            }
            Ok(())
        }
        NodeKind::Return(value) => compile_return(generator, value),
        _ => compile_expr_stmt(generator, node),
    }
}

/// Compiles an assignment statement.
///
/// Text targets are never assigned with `=`: the value is copied into the
/// target buffer, and a concatenation is first assembled in a scratch buffer.
pub fn compile_assign(
    generator: &mut CodeGenerator<'_>,
    target: &str,
    value: &Node,
) -> Result<(), CodeGenError> {
    let target = values::variable_name(target);
    if value.ty != Some(Type::Text) {
        let value = compile_bare(generator, value)?;
        generator.line(&format!("{target} = {value};"));
        return Ok(());
    }

    let copy = generator.runtime.require(Shim::TextCopy);
    let capacity = generator.options.text_capacity();

    if let NodeKind::Binary { left, right, .. } = &value.kind {
        if value.is_concat() {
            let left = compile_bare(generator, left)?;
            let right = compile_bare(generator, right)?;
            let scratch = generator.options.concat_capacity();
            generator.line("{");
            generator.indent();
            generator.line(&format!("char rt_concat[{scratch}];"));
            generator.line(&format!("{copy}(rt_concat, {left}, sizeof rt_concat);"));
            generator.line(&format!(
                "strncat(rt_concat, {right}, sizeof rt_concat - strlen(rt_concat) - 1);"
            ));
            generator.line(&format!("{copy}({target}, rt_concat, {capacity});"));
            generator.dedent();
            generator.line("}");
            return Ok(());
        }
    }

    let value = compile_bare(generator, value)?;
    generator.line(&format!("{copy}({target}, {value}, {capacity});"));
    Ok(())
}

/// Compiles a print statement, choosing the conversion from the value's type.
pub fn compile_print(generator: &mut CodeGenerator<'_>, value: &Node) -> Result<(), CodeGenError> {
    let ty = value.ty.ok_or(CodeGenError::UnexpectedStatement {
        context: "a printed value",
    })?;
    let format = values::print_format(ty);
    let argument = match &value.kind {
        // A comparison is `int` in C; `%lld` needs `long long`.
        NodeKind::Binary { op, .. } if op.is_comparison() => {
            format!("(long long){}", compile_expression(generator, value)?)
        }
        _ => compile_bare(generator, value)?,
    };
    generator.line(&format!("printf(\"{format}\", {argument});"));
    Ok(())
}

/// Compiles a read. The target's type comes from the environment now, not
/// from the node.
pub fn compile_read(generator: &mut CodeGenerator<'_>, name: &str) -> Result<(), CodeGenError> {
    let ty = generator
        .env
        .variable_type(name)
        .ok_or_else(|| CodeGenError::UnknownReadTarget {
            name: name.to_string(),
        })?;
    let format = values::scan_format(ty, &generator.options);
    let variable = values::variable_name(name);
    let target = match ty {
        Type::Integer | Type::Float => format!("&{variable}"),
        Type::Text => variable,
    };
    generator.line(&format!("scanf(\"{format}\", {target});"));
    Ok(())
}

pub fn compile_if(
    generator: &mut CodeGenerator<'_>,
    condition: &Node,
    then_branch: &Node,
    else_branch: Option<&Node>,
) -> Result<(), CodeGenError> {
    let condition = compile_condition(generator, condition)?;
    generator.line(&format!("if ({condition}) {{"));
    compile_body(generator, then_branch)?;
    if let Some(else_branch) = else_branch {
        generator.line("} else {");
        compile_body(generator, else_branch)?;
    }
    generator.line("}");
    Ok(())
}

pub fn compile_while(
    generator: &mut CodeGenerator<'_>,
    condition: &Node,
    body: &Node,
) -> Result<(), CodeGenError> {
    let condition = compile_condition(generator, condition)?;
    generator.line(&format!("while ({condition}) {{"));
    compile_body(generator, body)?;
    generator.line("}");
    Ok(())
}

/// `for (init; cond; update) body` becomes `init; while (cond) { body update; }`.
pub fn compile_for(
    generator: &mut CodeGenerator<'_>,
    init: &Node,
    condition: &Node,
    update: &Node,
    body: &Node,
) -> Result<(), CodeGenError> {
    compile_statement(generator, init)?;
    let condition = compile_condition(generator, condition)?;
    generator.line(&format!("while ({condition}) {{"));
    compile_body(generator, body)?;
    generator.indent();
    compile_statement(generator, update)?;
    generator.dedent();
    generator.line("}");
    Ok(())
}

/// Compiles a return statement. Text results are copied into the buffer the
/// caller passed in, so the caller never sees a dead local and two calls never
/// share storage.
pub fn compile_return(generator: &mut CodeGenerator<'_>, value: &Node) -> Result<(), CodeGenError> {
    let returns_text = generator
        .frame
        .as_ref()
        .is_some_and(|frame| frame.return_type == Type::Text);
    let value = compile_bare(generator, value)?;
    if returns_text {
        let copy = generator.runtime.require(Shim::TextCopy);
        generator.line(&format!(
            "return {copy}({RESULT_BUFFER}, {value}, {});",
            generator.options.text_capacity()
        ));
    } else {
        generator.line(&format!("return {value};"));
    }
    Ok(())
}

/// Compiles an expression evaluated for its side effects.
pub fn compile_expr_stmt(generator: &mut CodeGenerator<'_>, expr: &Node) -> Result<(), CodeGenError> {
    let expr = compile_bare(generator, expr)?;
    generator.line(&format!("{expr};"));
    Ok(())
}

/// Emits the statements of a branch or loop body one level deeper.
fn compile_body(generator: &mut CodeGenerator<'_>, body: &Node) -> Result<(), CodeGenError> {
    generator.indent();
    compile_statement(generator, body)?;
    generator.dedent();
    Ok(())
}
