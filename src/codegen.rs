use std::collections::HashSet;

use thiserror::Error;

use crate::ast::Node;
use crate::compiler::generators::statement;
use crate::compiler::runtime::{Runtime, Shim};
use crate::compiler::values;
use crate::config::EmitOptions;
use crate::environment::{Environment, FunctionBinding};
use crate::types::Type;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodeGenError {
    #[error("cannot read into `{name}`: no declared type")]
    UnknownReadTarget { name: String },
    #[error("statement found where {context} was expected")]
    UnexpectedStatement { context: &'static str },
}

/// The function whose body is currently being emitted.
#[derive(Debug, Clone)]
pub(crate) struct FunctionFrame {
    pub return_type: Type,
}

/// Hidden first parameter of a text-returning function: a buffer owned by the
/// caller, `text_capacity` bytes long, that receives the result.
pub(crate) const RESULT_BUFFER: &str = "rt_out";

/// Emits a C translation unit from a built tree and the environment it was
/// built against. Neither is modified, so emitting twice gives the same text.
pub struct CodeGenerator<'a> {
    pub(crate) env: &'a Environment,
    pub(crate) options: EmitOptions,
    pub(crate) runtime: Runtime,
    pub(crate) frame: Option<FunctionFrame>,
    out: String,
    depth: usize,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(env: &'a Environment) -> Self {
        Self::with_options(env, EmitOptions::default())
    }

    pub fn with_options(env: &'a Environment, options: EmitOptions) -> Self {
        Self {
            env,
            options,
            runtime: Runtime::new(),
            frame: None,
            out: String::new(),
            depth: 0,
        }
    }

    /// Emits every registered variable at file scope, every registered
    /// function, then `main` holding `root`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn compile_program(mut self, root: &Node) -> Result<String, CodeGenError> {
        let env = self.env;

        // The variable table is flat, so every binding is visible to `main`
        // and to every function alike.
        let globals: Vec<String> = env
            .variables()
            .iter()
            .map(|binding| values::global_declaration(binding.ty, &binding.name, &self.options))
            .collect();

        // First binding per name wins, matching lookup.
        let mut seen = HashSet::new();
        let mut functions = Vec::new();
        for function in env.functions() {
            if !seen.insert(function.name.as_str()) {
                tracing::debug!(name = %function.name, "skipping duplicate function definition");
                continue;
            }
            functions.push(self.compile_function(function)?);
        }

        let main = self.compile_main(root)?;

        let mut program = String::new();
        for include in self.runtime.includes() {
            program.push_str(&format!("#include <{include}>\n"));
        }
        program.push('\n');
        for definition in self.runtime.definitions() {
            program.push_str(definition);
            program.push_str("\n\n");
        }
        if !globals.is_empty() {
            for global in &globals {
                program.push_str(global);
                program.push('\n');
            }
            program.push('\n');
        }
        for function in functions {
            program.push_str(&function);
            program.push('\n');
        }
        program.push_str(&main);
        Ok(program)
    }

    fn compile_function(&mut self, function: &FunctionBinding) -> Result<String, CodeGenError> {
        tracing::debug!(name = %function.name, "emitting function");
        let mut params = Vec::with_capacity(function.params.len() + 1);
        if function.return_type == Type::Text {
            params.push(format!("char *{RESULT_BUFFER}"));
        }
        params.extend(
            function
                .params
                .iter()
                .map(|param| values::parameter(param.ty, &param.name)),
        );
        let params = if params.is_empty() {
            "void".to_string()
        } else {
            params.join(", ")
        };

        self.frame = Some(FunctionFrame {
            return_type: function.return_type,
        });
        self.line(&format!(
            "{}({params}) {{",
            values::typed_name(function.return_type, &values::function_name(&function.name))
        ));
        self.indent();
        for param in function.params.iter().filter(|param| param.ty == Type::Text) {
            let copy = self.runtime.require(Shim::TextCopy);
            let local = values::variable_name(&param.name);
            self.line(&format!("char {local}[{}];", self.options.text_capacity()));
            self.line(&format!(
                "{copy}({local}, {}, sizeof {local});",
                values::argument_name(&param.name)
            ));
        }
        statement::compile_statement(self, &function.body)?;
        statement::compile_statement(self, &function.return_expr)?;
        self.dedent();
        self.line("}");
        self.frame = None;

        Ok(std::mem::take(&mut self.out))
    }

    fn compile_main(&mut self, root: &Node) -> Result<String, CodeGenError> {
        self.line("int main(void) {");
        self.indent();
        statement::compile_statement(self, root)?;
        self.line("return 0;");
        self.dedent();
        self.line("}");
        Ok(std::mem::take(&mut self.out))
    }

    /// Appends one line at the current nesting depth.
    pub(crate) fn line(&mut self, text: &str) {
        let width = self.depth * self.options.indent_width();
        self.out.push_str(&format!("{:width$}{text}\n", ""));
    }

    pub(crate) fn indent(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// Emits C for `root` using the environment it was built against.
pub fn generate_program(root: &Node, env: &Environment) -> Result<String, CodeGenError> {
    CodeGenerator::new(env).compile_program(root)
}
