// src/cli/handlers/mod.rs

//! Handlers for the command line actions.

pub mod generate;
