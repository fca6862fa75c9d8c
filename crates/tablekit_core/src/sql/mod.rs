//! SQL text synthesis.

pub mod command;
