#![warn(clippy::disallowed_types)]

pub use error::{EnumerationError, LexError, ParseError};
pub use parser::{parse, BinaryOperator, ParsedStatement, Statement};
pub use symbols::Variable;
pub use truth::{Assignment, Assignments, VariableIndex};
pub use truth_table::{CharSet, Classification, OutputFilter, RenderOptions, TruthTable};

pub mod error;
pub mod lexer;
pub mod parser;
pub mod parser_io;
pub mod symbols;
pub mod truth;

mod truth_table;
