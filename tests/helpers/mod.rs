#![allow(dead_code)]

pub mod compile_helpers;
pub mod source_fixtures;
