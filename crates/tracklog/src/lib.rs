//! tracklog library
//!
//! This module exports the core functionality of tracklog for use in
//! integration tests and as a library.

pub mod config;
pub mod extract;
pub mod process;
pub mod run;

pub use run::run;
