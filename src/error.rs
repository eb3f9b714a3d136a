//! Error types for tokenizing, parsing and enumerating statements.

use crate::lexer::{Expected, LexemeKind};
use thiserror::Error;

/// A character-level syntax error. Tokenizing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected char '{found}' at position {position}; expected {expected}")]
    UnexpectedChar {
        found: char,
        /// Character offset in the original input, whitespace included.
        position: usize,
        expected: Expected,
    },

    #[error("unexpected closing parenthesis at position {position}: no corresponding opening parenthesis")]
    UnmatchedClose { position: usize },

    #[error("too many nested groups at position {position}; at most {limit} groups may be open")]
    TooDeep { position: usize, limit: usize },

    #[error("unexpected end of input; expected {expected}")]
    UnexpectedEnd {
        expected: Expected,
        /// Number of groups still open when the input ended.
        open_groups: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    /// Two binary operators at the same grouping level.
    #[error("unexpected operator '{operator}' at position {position}; binary statements must be parenthesized")]
    ChainedOperator { operator: char, position: usize },

    #[error("unexpected {found} at position {position}")]
    UnexpectedLexeme { found: LexemeKind, position: usize },

    #[error("unexpected end of input")]
    UnexpectedEnd,
}

impl ParseError {
    /// Whether this error was raised by the tokenizer rather than the parser.
    pub const fn is_lexical(&self) -> bool {
        matches!(self, Self::Lex(_))
    }

    /// Character offset of the offending input, if the error points at one.
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::Lex(LexError::UnexpectedChar { position, .. })
            | Self::Lex(LexError::UnmatchedClose { position })
            | Self::Lex(LexError::TooDeep { position, .. })
            | Self::ChainedOperator { position, .. }
            | Self::UnexpectedLexeme { position, .. } => Some(*position),
            Self::Lex(LexError::UnexpectedEnd { .. }) | Self::UnexpectedEnd => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnumerationError {
    #[error("cannot enumerate assignments of a statement without variables")]
    NoVariables,
}
