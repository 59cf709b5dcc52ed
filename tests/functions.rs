use minic::ast::{Node, NodeKind};
use minic::builder::{AstBuilder, BuildError};
use minic::config::{BuildOptions, CompilerOptions};
use minic::error::CompileError;
use minic::types::Type;
use pretty_assertions::assert_eq;

/// function add(int a, int b) { return a + b; }
fn define_add(b: &mut AstBuilder) -> Result<Node, BuildError> {
    let pa = b.build_param("a", Type::Integer)?;
    let pb = b.build_param("b", Type::Integer)?;
    let sum = b.build_binary("+", b.build_var_ref("a")?, b.build_var_ref("b")?)?;
    let ret = b.build_return(sum)?;
    b.build_func_def("add", vec![pa, pb], b.build_block(vec![]), ret)
}

#[test]
fn test_function_is_emitted_before_main() {
    let program = minic::compile(|b| {
        let def = define_add(b)?;
        let call = b.build_func_call("add", vec![b.build_int(1), b.build_int(2)])?;
        let print = b.build_print(call)?;
        Ok(b.build_block(vec![def, print]))
    })
    .unwrap();

    assert_eq!(
        program,
        r#"#include <stdio.h>
#include <stdlib.h>
#include <string.h>

static long long v_a = 0;
static long long v_b = 0;

long long f_add(long long v_a, long long v_b) {
    return v_a + v_b;
}

int main(void) {
    printf("%lld\n", f_add(1LL, 2LL));
    return 0;
}
"#
    );
}

#[test]
fn test_function_registration() {
    let mut b = AstBuilder::new();
    let def = define_add(&mut b).unwrap();
    assert!(matches!(def.kind, NodeKind::FunctionDef { ref name, .. } if name == "add"));

    let env = b.environment();
    let binding = env.lookup_function("add").unwrap();
    assert_eq!(binding.return_type, Type::Integer);
    assert_eq!(binding.params.len(), 2);
    assert_eq!(binding.params[1].name, "b");
    // Parameters live in the flat variable table.
    assert_eq!(env.lookup_variable("a"), Ok(Type::Integer));
    assert!(env.lookup_function_body("add").is_some());
}

#[test]
fn test_bare_return_expression_is_wrapped() {
    let mut b = AstBuilder::new();
    let def = b
        .build_func_def("pi", vec![], b.build_block(vec![]), b.build_float(3.5))
        .unwrap();
    let NodeKind::FunctionDef { ret, .. } = def.kind else {
        panic!("expected a function definition");
    };
    assert!(matches!(ret.kind, NodeKind::Return(_)));
    assert_eq!(ret.ty, Some(Type::Float));
    assert_eq!(
        b.environment().lookup_function("pi").unwrap().return_type,
        Type::Float
    );
}

#[test]
fn test_text_function_returns_through_static_buffer() {
    let program = minic::compile(|b| {
        let name = b.build_param("name", Type::Text)?;
        let greeting = b.build_binary("+", b.build_text("hi "), b.build_var_ref("name")?)?;
        let ret = b.build_return(greeting)?;
        let def = b.build_func_def("greet", vec![name], b.build_block(vec![]), ret)?;
        let print = b.build_print(b.build_func_call("greet", vec![b.build_text("bob")])?)?;
        Ok(b.build_block(vec![def, print]))
    })
    .unwrap();

    assert!(
        program.contains(
            "char *f_greet(char *rt_out, const char *a_name) {
    char v_name[100];
    rt_text_copy(v_name, a_name, sizeof v_name);
    return rt_text_copy(rt_out, rt_text_concat((char[200]){0}, 200, \"hi \", v_name), 100);
}
"
        ),
        "{program}"
    );
    assert!(
        program.contains("printf(\"%s\\n\", f_greet((char[100]){0}, \"bob\"));"),
        "{program}"
    );
}

#[test]
fn test_function_body_and_locals() {
    let program = minic::compile(|b| {
        let n = b.build_param("n", Type::Float)?;
        let half = b.build_decl("half", Type::Float)?;
        let value = b.build_binary("/", b.build_var_ref("n")?, b.build_float(2.0))?;
        let assign = b.build_assign("half", value)?;
        let body = b.build_block(vec![half, assign]);
        let ret = b.build_return(b.build_var_ref("half")?)?;
        let def = b.build_func_def("halve", vec![n], body, ret)?;
        let call = b.build_func_call("halve", vec![b.build_float(3.0)])?;
        let stmt = b.build_print(call)?;
        Ok(b.build_block(vec![def, stmt]))
    })
    .unwrap();

    assert!(
        program.contains(
            "double f_halve(double v_n) {
    v_half = rt_div_float(v_n, 2.0);
    return v_half;
}
"
        ),
        "{program}"
    );
    assert!(program.contains("static double v_half = 0.0;\n"), "{program}");
}

#[test]
fn test_call_as_statement_and_no_params() {
    let program = minic::compile(|b| {
        let def = b.build_func_def("one", vec![], b.build_block(vec![]), b.build_int(1))?;
        let call = b.build_func_call("one", vec![])?;
        Ok(b.build_block(vec![def, call]))
    })
    .unwrap();
    assert!(program.contains("long long f_one(void) {\n    return 1LL;\n}\n"), "{program}");
    assert!(program.contains("    f_one();\n"), "{program}");
}

#[test]
fn test_functions_follow_table_order() {
    let program = minic::compile(|b| {
        let first = b.build_func_def("first", vec![], b.build_block(vec![]), b.build_int(1))?;
        let second = b.build_func_def("second", vec![], b.build_block(vec![]), b.build_int(2))?;
        Ok(b.build_block(vec![second, first]))
    })
    .unwrap();
    let first_at = program.find("long long f_first(void)").unwrap();
    let second_at = program.find("long long f_second(void)").unwrap();
    let main_at = program.find("int main(void)").unwrap();
    assert!(first_at < second_at && second_at < main_at);
}

#[test]
fn test_duplicate_function_emitted_once() {
    let program = minic::compile(|b| {
        let first = b.build_func_def("f", vec![], b.build_block(vec![]), b.build_int(1))?;
        let second = b.build_func_def("f", vec![], b.build_block(vec![]), b.build_int(2))?;
        Ok(b.build_block(vec![first, second]))
    })
    .unwrap();
    assert_eq!(program.matches("long long f_f(void)").count(), 1);
    assert!(program.contains("return 1LL;"));
    assert!(!program.contains("return 2LL;"));
}

#[test]
fn test_call_to_unknown_function() {
    let result = minic::compile(|b| b.build_func_call("nope", vec![]));
    assert_eq!(
        result,
        Err(CompileError::Build(BuildError::UndeclaredFunction {
            name: "nope".to_string()
        }))
    );
}

#[test]
fn test_call_argument_count_is_checked() {
    let result = minic::compile(|b| {
        let def = define_add(b)?;
        let call = b.build_func_call("add", vec![b.build_int(1)])?;
        Ok(b.build_block(vec![def, call]))
    });
    assert_eq!(
        result,
        Err(CompileError::Build(BuildError::ArgumentCountMismatch {
            name: "add".to_string(),
            expected: 2,
            found: 1,
        }))
    );
}

#[test]
fn test_call_argument_types_are_checked() {
    let result = minic::compile(|b| {
        let def = define_add(b)?;
        let call = b.build_func_call("add", vec![b.build_int(1), b.build_text("2")])?;
        Ok(b.build_block(vec![def, call]))
    });
    assert_eq!(
        result,
        Err(CompileError::Build(BuildError::ArgumentTypeMismatch {
            name: "add".to_string(),
            position: 2,
            expected: Type::Integer,
            found: Type::Text,
        }))
    );
}

#[test]
fn test_unchecked_calls_when_validation_is_off() {
    let options = CompilerOptions::default()
        .with_build(BuildOptions::default().with_validate_calls(false));
    let program = minic::compile_with(&options, |b| {
        let def = define_add(b)?;
        let wrong = b.build_func_call("add", vec![b.build_text("x")])?;
        let unknown = b.build_func_call("later", vec![])?;
        assert_eq!(wrong.ty, Some(Type::Integer));
        assert_eq!(unknown.ty, Some(Type::Integer));
        Ok(b.build_block(vec![def, wrong, unknown]))
    })
    .unwrap();
    assert!(program.contains("    f_add(\"x\");\n"), "{program}");
    assert!(program.contains("    f_later();\n"), "{program}");
}

#[test]
fn test_function_cannot_call_itself() {
    // Registration happens after the body is built.
    let result = minic::compile(|b| {
        let n = b.build_param("n", Type::Integer)?;
        let recurse = b.build_func_call("loop_forever", vec![b.build_var_ref("n")?])?;
        b.build_func_def("loop_forever", vec![n], b.build_block(vec![]), recurse)
    });
    assert!(matches!(
        result,
        Err(CompileError::Build(BuildError::UndeclaredFunction { .. }))
    ));
}

#[test]
fn test_parameters_must_be_declarations() {
    let result = minic::compile(|b| {
        b.build_func_def("bad", vec![b.build_int(1)], b.build_block(vec![]), b.build_int(0))
    });
    assert_eq!(
        result,
        Err(CompileError::Build(BuildError::InvalidParameter {
            function: "bad".to_string()
        }))
    );
}

#[test]
fn test_strict_mode_rejects_duplicate_function() {
    let options = CompilerOptions::default()
        .with_build(BuildOptions::default().with_reject_redeclaration(true));
    let result = minic::compile_with(&options, |b| {
        let first = b.build_func_def("f", vec![], b.build_block(vec![]), b.build_int(1))?;
        let second = b.build_func_def("f", vec![], b.build_block(vec![]), b.build_int(2))?;
        Ok(b.build_block(vec![first, second]))
    });
    assert_eq!(
        result,
        Err(CompileError::Build(BuildError::Redeclaration {
            name: "f".to_string()
        }))
    );
}

#[test]
fn test_text_parameter_is_copied_on_entry() {
    // function touch(string s) { s = "changed"; return 1; }
    let program = minic::compile(|b| {
        let s = b.build_param("s", Type::Text)?;
        let body = b.build_assign("s", b.build_text("changed"))?;
        let def = b.build_func_def("touch", vec![s], body, b.build_int(1))?;
        let call = b.build_func_call("touch", vec![b.build_text("abc")])?;
        Ok(b.build_block(vec![def, call]))
    })
    .unwrap();
    assert!(
        program.contains(
            "long long f_touch(const char *a_s) {
    char v_s[100];
    rt_text_copy(v_s, a_s, sizeof v_s);
    rt_text_copy(v_s, \"changed\", 100);
    return 1LL;
}
"
        ),
        "{program}"
    );
}

#[test]
fn test_each_text_call_gets_its_own_result_buffer() {
    let program = minic::compile(|b| {
        let s = b.build_param("s", Type::Text)?;
        let def = b.build_func_def("echo", vec![s], b.build_block(vec![]), b.build_var_ref("s")?)?;
        let first = b.build_func_call("echo", vec![b.build_text("a")])?;
        let second = b.build_func_call("echo", vec![b.build_text("b")])?;
        let print = b.build_print(b.build_binary("+", first, second)?)?;
        Ok(b.build_block(vec![def, print]))
    })
    .unwrap();
    assert!(
        program.contains(
            "rt_text_concat((char[200]){0}, 200, f_echo((char[100]){0}, \"a\"), f_echo((char[100]){0}, \"b\"))"
        ),
        "{program}"
    );
    assert!(!program.contains("static char rt_"), "{program}");
}

#[test]
fn test_function_reads_variable_declared_in_main() {
    let program = minic::compile(|b| {
        let a = b.build_decl("a", Type::Integer)?;
        let def = b.build_func_def("get", vec![], b.build_block(vec![]), b.build_var_ref("a")?)?;
        let assign = b.build_assign("a", b.build_int(7))?;
        let print = b.build_print(b.build_func_call("get", vec![])?)?;
        Ok(b.build_block(vec![a, def, assign, print]))
    })
    .unwrap();
    let global_at = program.find("static long long v_a = 0;\n").unwrap();
    let function_at = program.find("long long f_get(void) {\n    return v_a;\n}\n").unwrap();
    assert!(global_at < function_at, "{program}");
}

#[test]
fn test_main_uses_parameter_name_after_definition() {
    let program = minic::compile(|b| {
        let def = define_add(b)?;
        let assign = b.build_assign("a", b.build_int(5))?;
        Ok(b.build_block(vec![def, assign]))
    })
    .unwrap();
    assert!(program.contains("static long long v_a = 0;\n"), "{program}");
    assert!(program.contains("int main(void) {\n    v_a = 5LL;\n"), "{program}");
}
