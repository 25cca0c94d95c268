//! ui
//!
//! Terminal output for the command-line interface.
//!
//! Logging goes through `tracing`; this module is for what commands print
//! to the user.

pub mod output;
