//! Line protocol spoken over stdin/stdout
pub mod command;
pub mod handler;
