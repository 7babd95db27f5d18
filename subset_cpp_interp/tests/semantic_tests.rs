//! Semantic rejection coverage: one test per rule family, driven
//! through the session so the check-before-execute contract is also
//! exercised.

use subset_cpp_interp::{api, InterpreterError, ReplSession};

fn fails(source: &str) -> InterpreterError {
    let outcome = api::run_script(source);
    outcome
        .error
        .unwrap_or_else(|| panic!("expected failure for:\n{source}"))
}

fn semantic_message(source: &str) -> String {
    match fails(source) {
        err @ InterpreterError::Semantic(_) => err.to_string(),
        other => panic!("expected a semantic error, got: {other}"),
    }
}

#[test]
fn no_derived_promotion_at_initialization() {
    let msg = semantic_message(
        "class A { } class B : public A { }\nB b;\nA a = b;\n",
    );
    assert!(
        msg.contains("initializer type mismatch"),
        "unexpected message: {msg}"
    );
}

#[test]
fn base_into_derived_assignment_rejected() {
    // The mirror of slicing is a type error, not a coercion.
    let err = fails("class A { } class B : public A { }\nA a;\nB b;\nb = a;\n");
    insta::assert_snapshot!(
        err.to_string(),
        @"semantic error: assignment type mismatch: expected B, got A"
    );
}

#[test]
fn conditions_reject_class_and_reference_types() {
    let msg = semantic_message("class A { }\nA a;\nif (a) print_int(1);\n");
    assert!(msg.contains("condition not convertible to bool"), "{msg}");

    let msg = semantic_message("int x = 1;\nint& r = x;\nif (r) print_int(1);\n");
    assert!(msg.contains("condition not convertible to bool"), "{msg}");
}

#[test]
fn conditions_accept_all_four_primitives() {
    let outcome = api::run_script(
        "int main(){
            if (1) print_int(1);
            if (true) print_int(2);
            if ('x') print_int(3);
            if (\"s\") print_int(4);
            if (0) print_int(5);
            return 0;
         }
         main();",
    );
    assert!(outcome.success(), "unexpected error: {:?}", outcome.error);
    assert_eq!(outcome.printed(), vec!["1", "2", "3", "4"]);
}

#[test]
fn unknown_names_are_reported() {
    assert!(semantic_message("y;").contains("unknown variable: y"));
    assert!(semantic_message("nope();").contains("unknown function: nope"));
    assert!(
        semantic_message("class A { }\nA a;\na.ghost;").contains("unknown field: A.ghost")
    );
    assert!(semantic_message("class A { }\nA a;\na.ghost();")
        .contains("no matching overload for method: ghost"));
}

#[test]
fn return_checks() {
    assert!(semantic_message("void f(){ return 1; }").contains("return with value in void"));
    assert!(semantic_message("int f(){ return; }").contains("missing return value"));
    let msg = semantic_message("int f(){ return true; }");
    assert!(msg.contains("return type mismatch"), "{msg}");
}

#[test]
fn reference_declarations_need_lvalue_initializers() {
    assert!(
        semantic_message("int& r = 5;").contains("cannot bind reference")
    );
    assert!(
        semantic_message("int& r;").contains("reference variable must be initialized")
    );
    // Base type must match too.
    assert!(
        semantic_message("bool b = true;\nint& r = b;").contains("cannot bind reference")
    );
}

#[test]
fn operator_typing() {
    assert!(semantic_message("true + 1;").contains("arithmetic expects int"));
    assert!(semantic_message("1 == 'a';").contains("'=='/'!=' expect matching"));
    assert!(semantic_message("\"a\" < \"b\";").contains("relational operator not supported"));
    assert!(semantic_message("!3;").contains("'!' expects a bool"));
    assert!(semantic_message("-true;").contains("unary '+'/'-' expects an int"));
    assert!(semantic_message("1 && true;").contains("'&&'/'||' expect bool"));
}

#[test]
fn void_is_not_a_value_type() {
    assert!(semantic_message("void v;").contains("void"));
    assert!(semantic_message("int f(void v){ return 0; }").contains("void"));
}

#[test]
fn failed_definition_leaves_durable_program_intact() {
    let mut session = ReplSession::new();
    assert!(session.eval("int good(){ return 1; }").success());

    // The second submission fails analysis (unknown variable in body).
    let outcome = session.eval("int bad(){ return ghost; }");
    assert!(matches!(
        outcome.error,
        Some(InterpreterError::Semantic(_))
    ));

    // `good` still works, `bad` was never committed.
    assert_eq!(session.eval("print_int(good());").printed(), vec!["1"]);
    let err = session.eval("bad();").error.expect("bad must be unknown");
    assert!(err.to_string().contains("unknown function: bad"), "{err}");
}

#[test]
fn overload_redefinition_rejected() {
    let err = fails("int f(int x){ return 1; }\nbool f(int x){ return true; }\n");
    assert!(
        err.to_string().contains("function overload redefinition: f"),
        "{err}"
    );
}

#[test]
fn override_return_type_mismatch_rejected() {
    let msg = semantic_message(
        "class A { virtual int who(){ return 1; } }
         class B : public A { bool who(){ return true; } }",
    );
    assert!(msg.contains("override return type mismatch"), "{msg}");
}

#[test]
fn inheritance_validation() {
    assert!(semantic_message("class A : public Ghost { }").contains("unknown base class"));
    let msg = semantic_message(
        "class A { A(int v){ } }
         class B : public A { }",
    );
    assert!(msg.contains("no default constructor"), "{msg}");
}

#[test]
fn invalid_main_signature_rejected() {
    let msg = semantic_message("int main(int argc){ return 0; }");
    assert!(msg.contains("invalid main signature"), "{msg}");
}

#[test]
fn method_argument_mismatch_is_an_error() {
    let msg = semantic_message(
        "class A { int f(int x){ return x; } }
         A a;
         a.f(true);",
    );
    assert!(msg.contains("no matching overload for method: f"), "{msg}");
}
