//! Message syntax parser.
//!
//! [`parse_cst`] turns source text into a concrete syntax tree that keeps
//! exact source ranges. The parser is total: it never fails, and reports
//! malformed input as [`SyntaxError`]s next to [`cst::Junk`] nodes.

pub mod cst;
pub mod error;
mod lexer;
mod message;

pub use error::{Span, SyntaxError, SyntaxErrorKind};
pub use lexer::{is_unquoted_literal, is_valid_name};
pub use message::parse_cst;
