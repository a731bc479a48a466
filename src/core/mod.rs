// src/core/mod.rs

//! The generation pipeline.

pub mod arglist;
pub mod assembler;
pub mod config;
pub mod cycles;
pub mod extractor;
pub mod id_index;
pub mod layout;
pub mod metadata;
pub mod resolver;
pub mod rule_gen;
