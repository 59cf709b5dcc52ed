pub mod ast;
pub mod builder;
pub mod codegen;
pub mod compiler;
pub mod config;
pub mod environment;
pub mod error;
pub mod types;

use std::sync::Once;

use crate::ast::Node;
use crate::builder::{AstBuilder, BuildError};
use crate::codegen::CodeGenerator;
use crate::config::CompilerOptions;
use crate::error::CompileError;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=minic=debug` or
/// `RUST_LOG=minic=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Runs `build` against a fresh builder, then emits C for the tree it returns.
///
/// `build` plays the parser: it calls the builder's constructors in source
/// order and hands back the program root.
pub fn compile<F>(build: F) -> Result<String, CompileError>
where
    F: FnOnce(&mut AstBuilder) -> Result<Node, BuildError>,
{
    compile_with(&CompilerOptions::default(), build)
}

/// [`compile`] with explicit options.
#[tracing::instrument(level = "debug", skip_all)]
pub fn compile_with<F>(options: &CompilerOptions, build: F) -> Result<String, CompileError>
where
    F: FnOnce(&mut AstBuilder) -> Result<Node, BuildError>,
{
    let mut builder = AstBuilder::with_options(options.build.clone());
    let root = build(&mut builder)?;
    tracing::debug!("tree built");
    let env = builder.into_environment();
    let program = CodeGenerator::with_options(&env, options.emit.clone()).compile_program(&root)?;
    tracing::debug!(bytes = program.len(), "program emitted");
    Ok(program)
}
