use minic::builder::{AstBuilder, BuildError};
use minic::ast::Node;
use minic::error::display_compile_error;
use minic::types::Type;

const SOURCE: &str = r#"int a;
float ratio;
string greeting;
function scale(int n, float k) {
    float r;
    r = n * k;
    return r / 2;
}
a = 2 + 3;
print a;
ratio = scale(a, 1.5);
print ratio;
greeting = "hello, " + "world";
print greeting;
"#;

/// Builds the program in `SOURCE` the way a parser would, in source order.
fn build(b: &mut AstBuilder) -> Result<Node, BuildError> {
    let mut stmts = vec![
        b.build_decl("a", Type::Integer)?,
        b.build_decl("ratio", Type::Float)?,
        b.build_decl("greeting", Type::Text)?,
    ];

    let n = b.build_param("n", Type::Integer)?;
    let k = b.build_param("k", Type::Float)?;
    let r = b.build_decl("r", Type::Float)?;
    let product = b.build_binary("*", b.build_var_ref("n")?, b.build_var_ref("k")?)?;
    let assign_r = b.build_assign("r", product)?;
    let body = b.build_block(vec![r, assign_r]);
    let half = b.build_binary("/", b.build_var_ref("r")?, b.build_int(2))?;
    let ret = b.build_return(half)?;
    stmts.push(b.build_func_def("scale", vec![n, k], body, ret)?);

    let sum = b.build_binary("+", b.build_int(2), b.build_int(3))?;
    stmts.push(b.build_assign("a", sum)?);
    stmts.push(b.build_print(b.build_var_ref("a")?)?);

    let call = b.build_func_call("scale", vec![b.build_var_ref("a")?, b.build_float(1.5)])?;
    stmts.push(b.build_assign("ratio", call)?);
    stmts.push(b.build_print(b.build_var_ref("ratio")?)?);

    let greeting = b.build_binary("+", b.build_text("hello, "), b.build_text("world"))?;
    stmts.push(b.build_assign("greeting", greeting)?);
    stmts.push(b.build_print(b.build_var_ref("greeting")?)?);

    Ok(b.build_block(stmts))
}

fn main() {
    minic::init_tracing();

    println!("Compiling:\n{}", SOURCE);

    match minic::compile(build) {
        Ok(program) => {
            println!("Successfully generated C:");
            println!("{}", program);
        }
        Err(e) => {
            display_compile_error(SOURCE, "<demo>", &e);
            std::process::exit(1);
        }
    }
}
