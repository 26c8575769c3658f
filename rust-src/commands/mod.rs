//! CLI command implementations.

pub mod editors;
pub mod rollup;
pub mod seed;
pub mod serve;
pub mod token;
