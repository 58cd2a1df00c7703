//! Command implementations for the litmus CLI
//!
//! Each command module provides a `run` function that executes the command logic.

pub mod dialects;
pub mod languages;
pub mod scan;
