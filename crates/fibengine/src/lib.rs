//! fibengine library: application logic for the command-line exerciser.

pub mod app;
pub mod config;
pub mod errors;
