#![deny(clippy::print_stdout)]

pub mod assembler;
pub mod command_line;
pub mod dictionary;
pub mod schemes;
pub mod table;
pub mod toolkit;
