//! Bookly application library
//!
//! The `books` module and the bootstrap that wires settings, the database,
//! and the HTTP server together.

pub mod app;
pub mod modules;

pub use modules::*;
