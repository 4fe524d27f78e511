//! Tests for the `spotc` binary.

pub mod tests_cli;
