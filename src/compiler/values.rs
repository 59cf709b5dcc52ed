//! C Value Representation
//!
//! How each primitive type is spelled in the generated C:
//!
//! | Type    | Variable (file scope)        | Parameter         | Return      | printf | scanf       |
//! |---------|------------------------------|-------------------|-------------|--------|-------------|
//! | Integer | `static long long v_x = 0;`  | `long long v_x`   | `long long` | `%lld` | `%lld`      |
//! | Float   | `static double v_x = 0.0;`   | `double v_x`      | `double`    | `%f`   | `%lf`       |
//! | Text    | `static char v_x[CAP] = "";` | `const char *a_x` | `char *`    | `%s`   | `%{CAP-1}s` |
//!
//! Text variables are fixed-capacity buffers; nothing in the generated program
//! grows a string. A text parameter is copied into a local buffer of the same
//! name on entry, so the callee never writes to the caller's storage.
//!
//! Source names never reach the C output as-is. Variables take a `v_` prefix,
//! functions `f_` and incoming text arguments `a_`, which keeps them apart from
//! C keywords, library names and the `rt_` runtime helpers.

use crate::config::EmitOptions;
use crate::types::Type;

pub fn variable_name(name: &str) -> String {
    format!("v_{name}")
}

pub fn function_name(name: &str) -> String {
    format!("f_{name}")
}

/// The incoming pointer of a text parameter, before it is copied.
pub fn argument_name(name: &str) -> String {
    format!("a_{name}")
}

/// `long long f_total`, `char *f_greet`: a type applied to an already
/// prefixed name, as used in function headers.
pub fn typed_name(ty: Type, c_name: &str) -> String {
    match ty {
        Type::Integer => format!("long long {c_name}"),
        Type::Float => format!("double {c_name}"),
        Type::Text => format!("char *{c_name}"),
    }
}

/// One entry of a function's parameter list.
pub fn parameter(ty: Type, name: &str) -> String {
    match ty {
        Type::Text => format!("const char *{}", argument_name(name)),
        _ => typed_name(ty, &variable_name(name)),
    }
}

/// A zero-initialized file-scope variable.
pub fn global_declaration(ty: Type, name: &str, options: &EmitOptions) -> String {
    let name = variable_name(name);
    match ty {
        Type::Integer => format!("static long long {name} = 0;"),
        Type::Float => format!("static double {name} = 0.0;"),
        Type::Text => format!("static char {name}[{}] = \"\";", options.text_capacity()),
    }
}

/// printf conversion for one value followed by a newline, as C literal text.
pub fn print_format(ty: Type) -> &'static str {
    match ty {
        Type::Integer => "%lld\\n",
        Type::Float => "%f\\n",
        Type::Text => "%s\\n",
    }
}

/// scanf conversion. Text input is bounded by the buffer capacity.
pub fn scan_format(ty: Type, options: &EmitOptions) -> String {
    match ty {
        Type::Integer => "%lld".to_string(),
        Type::Float => "%lf".to_string(),
        Type::Text => format!("%{}s", options.text_capacity() - 1),
    }
}

/// Every integer literal carries `LL` so arithmetic on literals happens in
/// `long long`, never in `int`.
pub fn int_literal(value: i64) -> String {
    if value == i64::MIN {
        return "(-9223372036854775807LL - 1)".to_string();
    }
    if value < 0 {
        format!("({value}LL)")
    } else {
        format!("{value}LL")
    }
}

/// Float literal text, and whether it needs `<math.h>`.
pub fn float_literal(value: f64) -> (String, bool) {
    if value.is_nan() {
        return ("NAN".to_string(), true);
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "INFINITY" } else { "(-INFINITY)" };
        return (text.to_string(), true);
    }
    // `{:?}` always keeps a decimal point or an exponent, so C reads a double.
    let text = format!("{value:?}");
    if value.is_sign_negative() {
        (format!("({text})"), false)
    } else {
        (text, false)
    }
}

/// A C string literal holding exactly `value`.
pub fn text_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for ch in value.chars() {
        match ch {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\t' => literal.push_str("\\t"),
            '\r' => literal.push_str("\\r"),
            '?' => literal.push_str("\\?"),
            c if c.is_ascii_control() => literal.push_str(&format!("\\{:03o}", c as u32)),
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}
