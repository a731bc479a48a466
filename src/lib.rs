//! Make rule and document dependency generation for a static document corpus.

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;
