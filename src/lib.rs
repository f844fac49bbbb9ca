// PENG Language Interpreter Library
//
// Core of the PENG interpreter: a position-tracking lexer, a
// recursive-descent parser and a tree-walking evaluator for a small
// English-like language (`x is 5`, `say x + 1`).

// Public modules
pub mod ast;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod value;

// Re-export commonly used items
pub use ast::{Expr, Program, Stmt};
pub use error::{ErrorKind, PengError, Position, ReportStyle, RunError, Span};
pub use evaluator::{Evaluator, Scope};
pub use lexer::{Lexer, Literal, Token, TokenType};
pub use parser::Parser;
pub use value::Value;

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::run;
