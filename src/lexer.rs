use crate::error::LexError;
use crate::symbols::*;
use log::trace;
use std::fmt;
use std::iter::{Enumerate, Filter};
use std::str::Chars;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexemeKind {
    False,
    True,
    Negate,
    Operator,
    OpenGroup,
    CloseGroup,
    Variable,
}

impl fmt::Display for LexemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::False => "false constant",
            Self::True => "true constant",
            Self::Negate => "negation",
            Self::Operator => "operator",
            Self::OpenGroup => "opening parenthesis",
            Self::CloseGroup => "closing parenthesis",
            Self::Variable => "variable",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme {
    pub kind: LexemeKind,
    /// The character this lexeme was read from.
    pub symbol: char,
    /// Character offset in the original input, whitespace included.
    pub position: usize,
}

impl Lexeme {
    const fn new(kind: LexemeKind, symbol: char, position: usize) -> Self {
        Self {
            kind,
            symbol,
            position,
        }
    }
}

/// What the tokenizer accepts next; doubles as the expected set in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// `!`, `(`, `0`, `1` or a letter.
    Value,
    /// `)` or one of the binary operators.
    OperatorOrClose,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value => write!(f, "'{NEGATE}', '{OPEN}', '{FALSE}', '{TRUE}', or a statement"),
            Self::OperatorOrClose => write!(
                f,
                "'{CLOSE}', '{AND}', '{OR}', '{XOR}', '{IMPLIES}', or '{IFF}'"
            ),
        }
    }
}

/// Deepest nesting of groups the tokenizer lets through.
///
/// Parsing, evaluating, rendering and dropping a statement all recurse once per group.
pub const MAX_DEPTH: usize = 256;

type Source<'a> = Filter<Enumerate<Chars<'a>>, fn(&(usize, char)) -> bool>;

/// Pull-based tokenizer.
///
/// Whitespace is skipped, every other character yields exactly one lexeme. The first error
/// is yielded as `Some(Err(..))`, after which the iterator is exhausted. A clean end of input
/// (no open groups, not directly after `!` or an operator) is a plain `None`. Opening more
/// than [`MAX_DEPTH`] nested groups is an error.
pub struct Lexer<'a> {
    source: Source<'a>,
    state: Expected,
    depth: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let not_whitespace: fn(&(usize, char)) -> bool = |&(_, c)| !c.is_whitespace();

        Self {
            source: input.chars().enumerate().filter(not_whitespace),
            state: Expected::Value,
            depth: 0,
            done: false,
        }
    }

    fn lex_value(&mut self, c: char, position: usize) -> Result<Lexeme, LexError> {
        let kind = match c {
            NEGATE => return Ok(Lexeme::new(LexemeKind::Negate, c, position)),
            OPEN => {
                if self.depth == MAX_DEPTH {
                    return Err(LexError::TooDeep {
                        position,
                        limit: MAX_DEPTH,
                    });
                }
                self.depth += 1;
                return Ok(Lexeme::new(LexemeKind::OpenGroup, c, position));
            }
            FALSE => LexemeKind::False,
            TRUE => LexemeKind::True,
            c if c.is_ascii_alphabetic() => LexemeKind::Variable,
            found => {
                return Err(LexError::UnexpectedChar {
                    found,
                    position,
                    expected: Expected::Value,
                })
            }
        };

        self.state = Expected::OperatorOrClose;
        Ok(Lexeme::new(kind, c, position))
    }

    fn lex_operator(&mut self, c: char, position: usize) -> Result<Lexeme, LexError> {
        match c {
            CLOSE => {
                if self.depth == 0 {
                    return Err(LexError::UnmatchedClose { position });
                }
                self.depth -= 1;
                Ok(Lexeme::new(LexemeKind::CloseGroup, c, position))
            }
            AND | OR | XOR | IMPLIES | IFF => {
                self.state = Expected::Value;
                Ok(Lexeme::new(LexemeKind::Operator, c, position))
            }
            found => Err(LexError::UnexpectedChar {
                found,
                position,
                expected: Expected::OperatorOrClose,
            }),
        }
    }

    fn end_of_input(&self) -> Option<LexError> {
        if self.state == Expected::OperatorOrClose && self.depth == 0 {
            None
        } else {
            Some(LexError::UnexpectedEnd {
                expected: self.state,
                open_groups: self.depth,
            })
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Lexeme, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let Some((position, c)) = self.source.next() else {
            self.done = true;
            return self.end_of_input().map(Err);
        };

        let result = match self.state {
            Expected::Value => self.lex_value(c, position),
            Expected::OperatorOrClose => self.lex_operator(c, position),
        };

        match &result {
            Ok(lexeme) => trace!("lexeme {:?} '{}' at {}", lexeme.kind, lexeme.symbol, position),
            Err(_) => self.done = true,
        }

        Some(result)
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lex(input: &str) -> Result<Vec<(LexemeKind, char)>, LexError> {
        Lexer::new(input)
            .map(|r| r.map(|l| (l.kind, l.symbol)))
            .collect()
    }

    #[test]
    fn test_single_variable() {
        assert_eq!(lex("a"), Ok(vec![(LexemeKind::Variable, 'a')]));
    }

    #[test]
    fn test_whitespace_is_ignored() {
        use LexemeKind::{CloseGroup, OpenGroup, Operator, True, Variable};

        assert_eq!(
            lex("  (  a       >b)   &   1 "),
            Ok(vec![
                (OpenGroup, '('),
                (Variable, 'a'),
                (Operator, '>'),
                (Variable, 'b'),
                (CloseGroup, ')'),
                (Operator, '&'),
                (True, '1'),
            ])
        );
        assert_eq!(lex("a\t&\u{00a0}\nb"), lex("a&b"));
    }

    #[test]
    fn test_nested_groups() {
        use LexemeKind::{CloseGroup, False, Negate, OpenGroup, Operator, Variable};

        assert_eq!(
            lex("!(!(a = b) | !0) > (c ^ d)"),
            Ok(vec![
                (Negate, '!'),
                (OpenGroup, '('),
                (Negate, '!'),
                (OpenGroup, '('),
                (Variable, 'a'),
                (Operator, '='),
                (Variable, 'b'),
                (CloseGroup, ')'),
                (Operator, '|'),
                (Negate, '!'),
                (False, '0'),
                (CloseGroup, ')'),
                (Operator, '>'),
                (OpenGroup, '('),
                (Variable, 'c'),
                (Operator, '^'),
                (Variable, 'd'),
                (CloseGroup, ')'),
            ])
        );
    }

    #[test]
    fn test_positions_count_whitespace() {
        let positions: Vec<usize> = Lexer::new(" a &  b")
            .map(|r| r.map(|l| l.position))
            .collect::<Result<_, _>>()
            .expect("valid input");
        assert_eq!(positions, vec![1, 3, 6]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            lex(""),
            Err(LexError::UnexpectedEnd {
                expected: Expected::Value,
                open_groups: 0
            })
        );
        assert_eq!(lex(" \n\t"), lex(""));
    }

    #[test]
    fn test_unexpected_char() {
        assert_eq!(
            lex("^a"),
            Err(LexError::UnexpectedChar {
                found: '^',
                position: 0,
                expected: Expected::Value
            })
        );
        assert_eq!(
            lex("ab"),
            Err(LexError::UnexpectedChar {
                found: 'b',
                position: 1,
                expected: Expected::OperatorOrClose
            })
        );
        assert_eq!(
            lex("a & é"),
            Err(LexError::UnexpectedChar {
                found: 'é',
                position: 4,
                expected: Expected::Value
            })
        );
        assert_eq!(
            lex("()"),
            Err(LexError::UnexpectedChar {
                found: ')',
                position: 1,
                expected: Expected::Value
            })
        );
    }

    #[test]
    fn test_unmatched_close() {
        assert_eq!(
            lex(")"),
            Err(LexError::UnexpectedChar {
                found: ')',
                position: 0,
                expected: Expected::Value
            })
        );
        assert_eq!(lex("a)"), Err(LexError::UnmatchedClose { position: 1 }));
        assert_eq!(lex("(a))"), Err(LexError::UnmatchedClose { position: 3 }));
    }

    #[test]
    fn test_invalid_end_of_input() {
        assert_eq!(
            lex("("),
            Err(LexError::UnexpectedEnd {
                expected: Expected::Value,
                open_groups: 1
            })
        );
        assert_eq!(
            lex("((a)"),
            Err(LexError::UnexpectedEnd {
                expected: Expected::OperatorOrClose,
                open_groups: 1
            })
        );
        assert_eq!(
            lex("a>"),
            Err(LexError::UnexpectedEnd {
                expected: Expected::Value,
                open_groups: 0
            })
        );
        assert_eq!(
            lex("!"),
            Err(LexError::UnexpectedEnd {
                expected: Expected::Value,
                open_groups: 0
            })
        );
    }

    #[test]
    fn test_stops_after_first_error() {
        let mut lexer = Lexer::new("a)b&c");
        assert!(matches!(lexer.next(), Some(Ok(_))));
        assert!(matches!(lexer.next(), Some(Err(LexError::UnmatchedClose { .. }))));
        assert_eq!(lexer.next(), None);
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_depth_tracks_groups() {
        let mut lexer = Lexer::new("((a)");
        lexer.next();
        lexer.next();
        assert_eq!(lexer.depth, 2);
        lexer.next();
        lexer.next();
        assert_eq!(lexer.depth, 1);
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}a{}", "(".repeat(depth), ")".repeat(depth));

        assert!(lex(&nested(MAX_DEPTH)).is_ok());
        assert_eq!(
            lex(&nested(MAX_DEPTH + 1)),
            Err(LexError::TooDeep {
                position: MAX_DEPTH,
                limit: MAX_DEPTH
            })
        );
        assert_eq!(
            lex(&"!(".repeat(20_000)),
            Err(LexError::TooDeep {
                position: 2 * MAX_DEPTH + 1,
                limit: MAX_DEPTH
            })
        );
    }

    #[test]
    fn test_closing_groups_frees_depth() {
        let sibling = format!("{}a{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(lex(&format!("{sibling} & {sibling}")).is_ok());
    }
}
