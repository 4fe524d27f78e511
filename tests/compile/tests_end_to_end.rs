//! Whole-unit compilation: class layout, inheritance and body rewriting.

use crate::helpers::compile_helpers::*;
use crate::helpers::source_fixtures::*;
use spot::{EmitOptions, compile, compile_file};

#[test]
fn test_animals_compile_to_expected_pawn() {
    assert_eq!(compile_ok(ANIMALS), ANIMALS_PAWN);
}

#[test]
fn test_same_method_in_unrelated_classes_does_not_collide() {
    let output = compile_ok("class Car { function update(); }\nclass Bike { function update(); }");
    assert!(output.contains("stock Class_Car@update(this[Class_Car])"));
    assert!(output.contains("stock Class_Bike@update(this[Class_Bike])"));
}

#[test]
fn test_vehicles_passthrough_is_preserved() {
    let output = compile_ok(VEHICLES);
    assert!(output.starts_with("#include <a_samp>\n\nenum Class_Vehicle\n{\n"));
    assert!(output.ends_with("\n\nmain()\n{\n    print(\"ready\");\n}\n"));
}

#[test]
fn test_vehicles_subclass_layout() {
    let output = compile_ok(VEHICLES);
    assert!(output.contains("enum Class_Car\n{\n\tFloat:speed,\n\twheels,\n\tbool:boosted\n}"));
    assert!(output.contains(
        "stock Class_Car@@init(this[Class_Car])\n{\n\tthis[speed] = 0.0;\n\tthis[wheels] = 4;\n}"
    ));
}

#[test]
fn test_vehicles_override_calls_parent_function() {
    let output = compile_ok(VEHICLES);
    let expected = "stock Class_Car@update(this[Class_Car], Float:dt)
{
    Class_Vehicle@update(this, dt);
    if (this[boosted]) {
        new Float:extra = dt * 2.0;
        Class_Vehicle@update(this, extra);
    }
}";
    assert!(output.contains(expected), "missing Car.update in:\n{output}");
    assert!(output.contains(
        "stock Class_Bike@update(this[Class_Bike], Float:dt)\n{\n    Class_Vehicle@update(this, dt / 2.0);\n}"
    ));
}

#[test]
fn test_vehicles_inherited_method_emitted_per_subclass() {
    let output = compile_ok(VEHICLES);
    for class in ["Vehicle", "Car", "Bike"] {
        let expected = format!(
            "stock Float:Class_{class}@getSpeed(this[Class_{class}])\n{{\n    return this[speed];\n}}"
        );
        assert!(output.contains(&expected), "missing {class}.getSpeed");
    }
}

#[test]
fn test_forward_declared_parent() {
    let output = compile_ok(FORWARD_PARENT);
    assert!(output.starts_with("enum Class_Square\n{\n\tsides,\n\tsize\n}"));
}

#[test]
fn test_deep_chain_flattens_root_to_leaf() {
    let source = "class A { int a; }\nclass B : A { int b; }\nclass C : B { int c; int a; }";
    let output = compile_ok(source);
    assert!(output.ends_with("enum Class_C\n{\n\ta,\n\tb,\n\tc\n}"));
}

#[test]
fn test_compilation_units_are_independent() {
    let first = compile_ok("class A { int x; }");
    let second = compile_ok("class A { int y; }");
    assert!(first.contains("\tx\n"));
    assert!(!second.contains("\tx\n"));
}

#[test]
fn test_compile_file_reads_source() {
    let (_dir, path) = source_file("animals.spot", ANIMALS);
    let output = compile_file(&path, &EmitOptions::default()).unwrap();
    assert_eq!(output, ANIMALS_PAWN);
}

#[test]
fn test_compile_without_stock() {
    let options = EmitOptions {
        stock: false,
        ..EmitOptions::default()
    };
    let output = compile(ANIMALS, &options).unwrap();
    assert!(output.contains("\n\nClass_Dog@speak(this[Class_Dog])\n"));
    assert!(!output.contains("stock"));
}
