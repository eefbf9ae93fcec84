pub mod parser;
pub mod statement;

pub use parser::*;
pub use statement::*;
