//! Compiler Module
//!
//! Building blocks of the C code generator in `codegen`.
//!
//! ## Architecture
//! - `values`: how each primitive type is declared, printed, read and written as a literal
//! - `runtime`: C shims the generated program needs (guards, bounded text operations)
//! - `generators`: per-kind emission of expressions and statements

pub mod generators;
pub mod runtime;
pub mod values;
