use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::builder::BuildError;
use crate::codegen::CodeGenError;

/// Any failure of the build-then-emit pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompileError {
    #[error("type error: {0}")]
    Build(#[from] BuildError),
    #[error("code generation error: {0}")]
    CodeGen(#[from] CodeGenError),
}

impl CompileError {
    fn title(&self) -> &'static str {
        match self {
            CompileError::Build(_) => "Type error",
            CompileError::CodeGen(_) => "Code generation error",
        }
    }

    fn detail(&self) -> String {
        match self {
            CompileError::Build(error) => error.to_string(),
            CompileError::CodeGen(error) => error.to_string(),
        }
    }

    fn subject(&self) -> Option<&str> {
        match self {
            CompileError::Build(error) => error.subject(),
            CompileError::CodeGen(CodeGenError::UnknownReadTarget { name }) => Some(name),
            CompileError::CodeGen(CodeGenError::UnexpectedStatement { .. }) => None,
        }
    }
}

/// Where to point in `source`: the first occurrence of the offending name,
/// or the start of the file.
fn error_span(source: &str, error: &CompileError) -> std::ops::Range<usize> {
    error
        .subject()
        .and_then(|subject| {
            source
                .find(subject)
                .map(|start| start..start + subject.len())
        })
        .unwrap_or(0..source.len().min(1))
}

fn build_report<'a>(
    source: &str,
    filename: &'a str,
    error: &CompileError,
    color: bool,
) -> Report<'static, (&'a str, std::ops::Range<usize>)> {
    let span = error_span(source, error);
    Report::build(ReportKind::Error, filename, span.start)
        .with_config(Config::default().with_color(color))
        .with_message(error.title())
        .with_label(
            Label::new((filename, span))
                .with_message(error.detail())
                .with_color(Color::Red),
        )
        .finish()
}

/// Renders a plain-text report of `error` against `source`.
pub fn render_compile_error(source: &str, filename: &str, error: &CompileError) -> String {
    let mut buffer = Vec::new();
    let written = build_report(source, filename, error, false)
        .write((filename, Source::from(source)), &mut buffer);
    match written {
        Ok(()) => String::from_utf8_lossy(&buffer).into_owned(),
        Err(_) => format!("{}: {}", error.title(), error.detail()),
    }
}

/// Display a compile error with ariadne formatting
pub fn display_compile_error(source: &str, filename: &str, error: &CompileError) {
    let printed = build_report(source, filename, error, true)
        .eprint((filename, Source::from(source)));
    if printed.is_err() {
        eprintln!("{}: {}", error.title(), error.detail());
    }
}
