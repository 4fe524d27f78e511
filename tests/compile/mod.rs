//! End-to-end compilation tests through the public API.

pub mod tests_end_to_end;
pub mod tests_errors;
