//! Code Generators Module
//!
//! Per-kind emission helpers used by `CodeGenerator`:
//! - `expression`: literals, variables, operators, calls, assignment in operand position
//! - `statement`: declarations, assignment, I/O, control flow, returns

pub mod expression;
pub mod statement;
