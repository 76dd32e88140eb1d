pub mod commands;
pub mod parser;

pub use commands::*;
pub use parser::*;
