//! Helpers for compiling sources and files in tests.

use std::path::PathBuf;
use std::process::{Command, Output};

use spot::{CompileError, EmitOptions, compile};
use tempfile::TempDir;

/// Compiles with default options, panicking on error.
pub fn compile_ok(source: &str) -> String {
    match compile(source, &EmitOptions::default()) {
        Ok(output) => output,
        Err(err) => panic!("compilation failed: {err}"),
    }
}

/// Compiles with default options, panicking on success.
pub fn compile_err(source: &str) -> CompileError {
    match compile(source, &EmitOptions::default()) {
        Ok(output) => panic!("expected an error, got output:\n{output}"),
        Err(err) => err,
    }
}

/// Writes `content` to `name` inside a fresh temporary directory.
pub fn source_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("source should be written");
    (dir, path)
}

/// Runs the `spotc` binary with `args`.
pub fn spotc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_spotc"))
        .args(args)
        .env_remove("SPOTC_LOG")
        .output()
        .expect("spotc should run")
}
