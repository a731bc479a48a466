//! # System Interaction Layer
//!
//! Process-level setup that sits outside the generation logic.
//!
//! - **`logging`**: configures `env_logger` from the `--verbose` and `--log` flags.

pub mod logging;
