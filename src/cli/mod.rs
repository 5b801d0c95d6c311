//! Command-line interface components
//!
//! Argument parsing and the command dispatcher. Both are independent of the
//! process: `main` feeds them `std::env::args()` and a real transport, tests
//! feed them literal vectors and a stub.

pub mod args;
pub mod commands;

pub use args::{Invocation, NamedArgs};
pub use commands::{help_data, Command, CommandSpec, Dispatcher, LocalCommand, RemoteCommand, COMMANDS};
