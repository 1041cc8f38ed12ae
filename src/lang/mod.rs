/*!
# Script Language Module

Lexical analysis and parsing of the prefix-notation script language.
Every line is compiled once, when it is entered, into a `Command` tree
that the machine evaluates.

*/

#[macro_use]
mod error;
mod lex;
mod line;
mod modifier;
mod op;
mod parse;
mod token;

pub use error::Error;
pub use error::ErrorCode;
pub use lex::lex;
pub use line::Line;
pub use modifier::Mod;
pub use op::{Kind, Op, PatOp};
pub use parse::parse;
pub use token::{Literal, Special, Token, Var};

pub mod ast;

/// Character span of a token within its line.
pub type Column = std::ops::Range<usize>;

/// Longest script line, in characters.
pub const MAX_LINE_LEN: usize = 64;
