//! Every failure aborts the whole unit.

use rstest::rstest;

use crate::helpers::compile_helpers::*;
use spot::{CompileError, EmitOptions, LineIndex, compile_file, read_source};

#[test]
fn test_duplicate_class() {
    let err = compile_err("class Vehicle {}\nclass Vehicle {}");
    assert!(matches!(err, CompileError::DuplicateClass { ref name, .. } if name == "Vehicle"));
    assert_eq!(err.to_string(), "class 'Vehicle' is already declared");
}

#[test]
fn test_duplicate_members() {
    let field = compile_err("class A { int x; int x; }");
    assert!(matches!(field, CompileError::DuplicateField { .. }));

    let method = compile_err("class A { function f(); function f(); }");
    assert!(matches!(method, CompileError::DuplicateMethod { .. }));
}

#[test]
fn test_field_and_method_may_share_a_name() {
    let output = compile_ok("class A { int size; function size(); }");
    assert!(output.contains("\tsize\n"));
    assert!(output.contains("Class_A@size("));
}

#[test]
fn test_class_named_after_builtin_type() {
    let err = compile_err(
        "class float { int x; function f() {} }\nclass A { float speed; function g(float v) { v.f(); } }",
    );
    assert!(matches!(err, CompileError::BuiltinClassName { ref name, .. } if name == "float"));
    assert_eq!(err.to_string(), "class 'float' redeclares the built-in type 'float'");
    assert!(err.range().is_some());
}

#[test]
fn test_class_containing_itself() {
    let err = compile_err("class Node { Node next; int v; }");
    assert_eq!(err.to_string(), "class layout contains itself: Node -> Node");
    assert!(err.range().is_some());
}

#[test]
fn test_mutually_containing_classes() {
    let err = compile_err("class A { B b; }\nclass B { A a; }");
    assert!(matches!(err, CompileError::RecursiveLayout { ref cycle, .. } if *cycle == ["A", "B", "A"]));
}

#[rstest]
#[case::field("class V { int new; int sizeof; }", "'new' is a reserved word and cannot name a field")]
#[case::parameter("class V { function f(float state) {} }", "'state' is a reserved word and cannot name a parameter")]
fn test_reserved_names(#[case] source: &str, #[case] message: &str) {
    let err = compile_err(source);
    assert!(matches!(err, CompileError::ReservedName { .. }));
    assert_eq!(err.to_string(), message);
}

#[test]
fn test_unresolved_parent() {
    let err = compile_err("class Dog : Animal {}");
    assert_eq!(err.to_string(), "class 'Dog' extends unknown class 'Animal'");
}

#[test]
fn test_cycle_is_reported_with_its_path() {
    let err = compile_err("class A : C {}\nclass B : A {}\nclass C : B {}");
    match err {
        CompileError::CyclicInheritance { cycle, .. } => {
            assert_eq!(cycle.first(), cycle.last());
            assert_eq!(cycle.len(), 4);
        }
        other => panic!("expected CyclicInheritance, got {other:?}"),
    }
}

#[test]
fn test_self_parent_is_a_cycle() {
    let err = compile_err("class A : A {}");
    assert!(matches!(err, CompileError::CyclicInheritance { .. }));
}

#[test]
fn test_multiple_parents_rejected() {
    let err = compile_err("class A {}\nclass B {}\nclass C : A, B {}");
    assert!(matches!(err, CompileError::MultipleInheritance { ref parents, .. } if parents.len() == 2));
}

#[rstest]
#[case::missing_brace("class A int x; }")]
#[case::bad_member("class A { 42; }")]
#[case::unterminated_class("class A { function f() { return 1; }")]
fn test_syntax_errors(#[case] source: &str) {
    let err = compile_err(source);
    assert!(matches!(err, CompileError::Syntax { ref errors } if !errors.is_empty()));
    assert!(err.to_string().starts_with("syntax error: "));
}

#[test]
fn test_unresolved_reference_location() {
    let source = "class A {\n    function f() {\n        other.x = 1;\n    }\n}";
    let err = compile_err(source);
    assert_eq!(
        err.to_string(),
        "cannot resolve 'other' in A.f: receiver has no class type"
    );
    let range = err.range().unwrap();
    let position = LineIndex::new(source).line_col(range.start());
    assert_eq!((position.line, position.col), (2, 8));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = compile_file(dir.path().join("missing.spot"), &EmitOptions::default()).unwrap_err();
    assert!(matches!(err, CompileError::Io { .. }));
    assert!(err.range().is_none());
}

#[test]
fn test_read_source_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.spot");
    let err = read_source(&path).unwrap_err();
    assert!(matches!(err, CompileError::Io { path: ref failed, .. } if failed == &path));
}

#[test]
fn test_read_source_returns_text() {
    let (_dir, path) = source_file("unit.spot", "class A {}\n");
    assert_eq!(read_source(&path).unwrap(), "class A {}\n");
}
