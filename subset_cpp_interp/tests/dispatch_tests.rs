//! Method dispatch, constructor chains and the copy discipline at call
//! boundaries.

use pretty_assertions::assert_eq;
use subset_cpp_interp::api;

fn printed(source: &str) -> Vec<String> {
    let outcome = api::run_script(source);
    assert!(outcome.success(), "script failed: {:?}", outcome.error);
    outcome.printed().iter().map(|s| s.to_string()).collect()
}

#[test]
fn static_dispatch_on_value_receivers() {
    let script = "
class A { virtual int who(){ return 1; } }
class B : public A { int who(){ return 2; } }
int main(){ A a; B b; print_int(a.who()); print_int(b.who()); return 0; }
main();
";
    assert_eq!(printed(script), vec!["1", "2"]);
}

#[test]
fn non_virtual_calls_ignore_dynamic_class() {
    let script = "
class A { int who(){ return 1; } }
class B : public A { int who(){ return 2; } }
int pick(A& r){ return r.who(); }
int main(){ B b; print_int(pick(b)); return 0; }
main();
";
    assert_eq!(printed(script), vec!["1"]);
}

#[test]
fn virtual_flag_propagates_down_the_chain() {
    // Neither B::who nor C::who is declared virtual; A::who makes the
    // whole chain virtual.
    let script = "
class A { virtual int who(){ return 1; } }
class B : public A { int who(){ return 2; } }
class C : public B { int who(){ return 3; } }
int pick(A& r){ return r.who(); }
int main(){ C c; B b; print_int(pick(c)); print_int(pick(b)); return 0; }
main();
";
    assert_eq!(printed(script), vec!["3", "2"]);
}

#[test]
fn reference_to_intermediate_class_dispatches_dynamically() {
    let script = "
class A { virtual int who(){ return 1; } }
class B : public A { int who(){ return 2; } }
class C : public B { int who(){ return 3; } }
int main(){ C c; B& r = c; print_int(r.who()); return 0; }
main();
";
    assert_eq!(printed(script), vec!["3"]);
}

#[test]
fn overload_falls_back_up_the_chain_when_not_viable() {
    // B reuses the name with a char overload only; an int argument is
    // viable in A alone.
    let script = "
class A { int f(int x){ return 10 + x; } }
class B : public A { int f(char c){ return 99; } }
int main(){ B b; print_int(b.f(1)); return 0; }
main();
";
    assert_eq!(printed(script), vec!["11"]);
}

#[test]
fn viable_overload_in_derived_hides_base() {
    let script = "
class A { int f(int x){ return 1; } }
class B : public A { int f(int x){ return 2; } }
int main(){ B b; print_int(b.f(0)); return 0; }
main();
";
    assert_eq!(printed(script), vec!["2"]);
}

#[test]
fn base_default_constructors_run_before_the_selected_body() {
    let script = "
class A { int x; A(){ x=1; } }
class B : public A { int y; B(int v){ y=v; } }
int main(){ B b = B(5); print_int(b.x); print_int(b.y); return 0; }
main();
";
    assert_eq!(printed(script), vec!["1", "5"]);
}

#[test]
fn constructor_overloads_prefer_reference_for_lvalues() {
    let script = "
class P {
    int x;
    P(int& v){ x=1; }
    P(int v){ x=2; }
}
int main(){ int k=3; P a = P(k); P b = P(3); print_int(a.x); print_int(b.x); return 0; }
main();
";
    assert_eq!(printed(script), vec!["1", "2"]);
}

#[test]
fn methods_write_receiver_fields_through_bindings() {
    let script = "
class Counter {
    int n;
    void add(int k){ n = n + k; }
    int get(){ return n; }
}
int main(){ Counter c; c.add(2); c.add(3); print_int(c.get()); return 0; }
main();
";
    assert_eq!(printed(script), vec!["5"]);
}

#[test]
fn reference_parameter_binds_to_object_field() {
    let script = "
class P { int x; P(int v){ x=v; } }
void bump(int& n){ n = n + 10; }
int main(){ P p = P(5); bump(p.x); print_int(p.x); return 0; }
main();
";
    assert_eq!(printed(script), vec!["15"]);
}

#[test]
fn value_parameters_copy_and_slice() {
    let script = "
class A { int x; A(){ x=1; } }
class B : public A { int y; B(){ x=10; y=20; } }
int read(A a){ a.x = 99; return a.x; }
int probe(A& r){ return read(r); }
int main(){
    B b;
    A& r = b;
    print_int(probe(r));
    print_int(b.x);
    return 0;
}
main();
";
    // The parameter saw the sliced copy and its write stayed local.
    assert_eq!(printed(script), vec!["99", "10"]);
}

#[test]
fn returned_objects_are_materialized_at_the_destination() {
    let script = "
class P { int x; P(int v){ x=v; } }
P make(){ P p = P(9); return p; }
int main(){ P a = make(); print_int(a.x); return 0; }
main();
";
    assert_eq!(printed(script), vec!["9"]);
}

#[test]
fn class_field_assignment_slices_to_field_type() {
    let script = "
class A { int x; A(){ x=1; } virtual int who(){ return 1; } }
class B : public A { int y; B(){ x=10; y=20; } int who(){ return 2; } }
class Holder { A inner; }
int main(){
    Holder h;
    B b;
    h.inner = b;
    print_int(h.inner.x);
    print_int(h.inner.who());
    return 0;
}
main();
";
    // Sliced to A: derived fields gone, dynamic class narrowed.
    assert_eq!(printed(script), vec!["10", "1"]);
}

#[test]
fn derived_reference_argument_binds_to_base_reference_parameter() {
    let script = "
class A { virtual int who(){ return 1; } }
class B : public A { int who(){ return 2; } }
class C : public B { int who(){ return 3; } }
int pick(A& r){ return r.who(); }
int main(){ C c; B& mid = c; print_int(pick(mid)); return 0; }
main();
";
    assert_eq!(printed(script), vec!["3"]);
}
