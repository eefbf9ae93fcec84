mod check;
mod compile;
mod tree;

pub use check::handle_check;
pub use compile::{handle_compile, CompileOverrides};
pub use tree::handle_tree;
