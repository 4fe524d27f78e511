use crate::helpers::compile_helpers::*;
use crate::helpers::source_fixtures::*;

fn path_arg(path: &std::path::Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_compiles_to_stdout() {
    let (_dir, path) = source_file("animals.spot", ANIMALS);
    let output = spotc(&[path_arg(&path)]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), ANIMALS_PAWN);
    assert!(output.stderr.is_empty());
}

#[test]
fn test_writes_output_file() {
    let (dir, path) = source_file("animals.spot", ANIMALS);
    let out = dir.path().join("animals.pwn");
    let output = spotc(&[path_arg(&path), "-o", path_arg(&out)]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert_eq!(std::fs::read_to_string(&out).unwrap(), ANIMALS_PAWN);
}

#[test]
fn test_formatting_flags() {
    let (_dir, path) = source_file("animals.spot", ANIMALS);
    let output = spotc(&[path_arg(&path), "--no-stock", "--indent-spaces", "4", "--banner"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("// Generated by spotc\nenum Class_Animal\n{\n    health\n}"));
    assert!(stdout.contains("\n\nClass_Dog@speak(this[Class_Dog])\n"));
    assert!(!stdout.contains("stock"));
}

#[test]
fn test_compile_error_reports_location() {
    let (_dir, path) = source_file("bad.spot", "class A {}\nclass A {}\n");
    let output = spotc(&[path_arg(&path)]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: "), "stderr: {stderr}");
    assert!(stderr.contains("bad.spot:2:1"), "stderr: {stderr}");
    assert!(stderr.contains("class 'A' is already declared"), "stderr: {stderr}");
}

#[test]
fn test_missing_input_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.spot");
    let output = spotc(&[path_arg(&missing)]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read"));
}
