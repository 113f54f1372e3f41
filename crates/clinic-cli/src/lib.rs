//! Library components of the clinic report CLI.

pub mod cli;
pub mod commands;
pub mod filter_arg;
pub mod logging;
pub mod summary;
