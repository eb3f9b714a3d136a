use crate::error::ParseError;
use crate::lexer::{Lexeme, LexemeKind, Lexer};
use crate::symbols::{self, Variable};
use crate::truth::{Assignment, VariableIndex};
use log::{debug, trace};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    And,
    Or,
    Xor,
    Implies,
    Iff,
}

impl BinaryOperator {
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            symbols::AND => Some(Self::And),
            symbols::OR => Some(Self::Or),
            symbols::XOR => Some(Self::Xor),
            symbols::IMPLIES => Some(Self::Implies),
            symbols::IFF => Some(Self::Iff),
            _ => None,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::And => symbols::AND,
            Self::Or => symbols::OR,
            Self::Xor => symbols::XOR,
            Self::Implies => symbols::IMPLIES,
            Self::Iff => symbols::IFF,
        }
    }

    pub const fn apply(self, left: bool, right: bool) -> bool {
        match self {
            Self::And => left & right,
            Self::Or => left | right,
            Self::Xor => left ^ right,
            Self::Implies => !left | right,
            Self::Iff => left == right,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.symbol(), f)
    }
}

/// A propositional statement.
///
/// The tree is built by [`parse`]; every node owns its children. Evaluation is a pure fold
/// over the tree, so one statement can be evaluated against any number of assignments,
/// from any number of threads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Statement {
    False,
    True,
    Var(Variable),
    Not(Box<Statement>),
    BinaryOp(BinaryOperator, Box<Statement>, Box<Statement>),
}

impl Statement {
    pub fn evaluate(&self, assignment: &Assignment<'_>) -> bool {
        match self {
            Self::False => false,
            Self::True => true,
            Self::Var(v) => assignment.get(*v),
            Self::Not(s) => !s.evaluate(assignment),
            Self::BinaryOp(op, l, r) => {
                // both operands are always evaluated
                let l = l.evaluate(assignment);
                let r = r.evaluate(assignment);
                op.apply(l, r)
            }
        }
    }

    /// Canonical textual form, see the [`Display`](fmt::Display) implementation.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Occurrence set of the variables in this statement.
    pub fn variables(&self) -> u64 {
        match self {
            Self::False | Self::True => 0,
            Self::Var(v) => v.bit(),
            Self::Not(s) => s.variables(),
            Self::BinaryOp(_, l, r) => l.variables() | r.variables(),
        }
    }

    const fn is_binary(&self) -> bool {
        matches!(self, Self::BinaryOp(..))
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_binary() {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

/// Renders the statement in canonical form: constants as `0`/`1`, a single space around
/// binary operators, and parentheses only around binary operands.
impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::False => write!(f, "{}", symbols::FALSE),
            Self::True => write!(f, "{}", symbols::TRUE),
            Self::Var(v) => write!(f, "{v}"),
            Self::Not(s) => {
                write!(f, "{}", symbols::NEGATE)?;
                s.fmt_operand(f)
            }
            Self::BinaryOp(op, l, r) => {
                l.fmt_operand(f)?;
                write!(f, " {op} ")?;
                r.fmt_operand(f)
            }
        }
    }
}

impl FromStr for Statement {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s).map(|parsed| parsed.statement)
    }
}

/// A parsed statement together with the index of the variables occurring in it.
#[derive(Debug, Clone)]
pub struct ParsedStatement {
    pub statement: Statement,
    pub variables: VariableIndex,
}

impl ParsedStatement {
    pub fn new(input: &str) -> Result<Self, ParseError> {
        parse(input)
    }

    pub fn into_parts(self) -> (Statement, VariableIndex) {
        (self.statement, self.variables)
    }

    /// Evaluates the statement at the assignment numbered `value`, if it is in range.
    pub fn evaluate(&self, value: u64) -> Option<bool> {
        self.variables
            .assignment(value)
            .map(|assignment| self.statement.evaluate(&assignment))
    }
}

impl fmt::Display for ParsedStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.statement, f)
    }
}

/// Parses `input` into a statement and the index of its variables.
pub fn parse(input: &str) -> Result<ParsedStatement, ParseError> {
    debug!("parsing {input:?}");

    let mut parser = Parser {
        lexemes: Lexer::new(input),
    };
    let (statement, occurrences) = parser.parse_top_level()?;
    let variables = VariableIndex::new(occurrences);

    debug!(
        "parsed {statement} with {} variable(s)",
        variables.names().len()
    );

    Ok(ParsedStatement {
        statement,
        variables,
    })
}

/// One operand of a group, collecting negations until its statement is known.
#[derive(Default)]
struct StatementBuilder {
    inner: Option<Statement>,
    negated: bool,
}

impl StatementBuilder {
    fn negate(&mut self) {
        self.negated = !self.negated;
    }

    fn build(self) -> Result<Statement, ParseError> {
        let inner = self.inner.ok_or(ParseError::UnexpectedEnd)?;

        Ok(match (self.negated, inner) {
            (false, inner) => inner,
            // negation parity carries through groups: !(!a) is a
            (true, Statement::Not(inner)) => *inner,
            (true, inner) => Statement::Not(Box::new(inner)),
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ParseState {
    ExpectStatement,
    ExpectOperatorOrClose,
    ExpectClose,
}

/// How a group ended.
#[derive(PartialEq, Eq)]
enum Terminator {
    Close,
    End,
}

struct Parser<'a> {
    lexemes: Lexer<'a>,
}

impl Parser<'_> {
    fn parse_top_level(&mut self) -> Result<(Statement, u64), ParseError> {
        let (statement, occurrences, terminator) = self.parse_group()?;

        match terminator {
            Terminator::End => Ok((statement, occurrences)),
            // only reachable if the lexer let an unmatched ')' through
            Terminator::Close => Err(self.pending()),
        }
    }

    fn pending(&mut self) -> ParseError {
        match self.lexemes.next() {
            Some(Ok(Lexeme { kind, position, .. })) => ParseError::UnexpectedLexeme {
                found: kind,
                position,
            },
            Some(Err(e)) => e.into(),
            None => ParseError::UnexpectedEnd,
        }
    }

    /// Parses up to the closing parenthesis of the current group, or the end of input.
    fn parse_group(&mut self) -> Result<(Statement, u64, Terminator), ParseError> {
        let mut state = ParseState::ExpectStatement;
        let mut left = StatementBuilder::default();
        let mut right = StatementBuilder::default();
        let mut op: Option<BinaryOperator> = None;
        let mut occurrences = 0u64;
        let mut terminator = Terminator::End;

        while let Some(lexeme) = self.lexemes.next() {
            let lexeme = lexeme?;
            let slot = if op.is_none() { &mut left } else { &mut right };

            match state {
                ParseState::ExpectStatement => {
                    let inner = match lexeme.kind {
                        LexemeKind::False => Statement::False,
                        LexemeKind::True => Statement::True,
                        LexemeKind::Negate => {
                            slot.negate();
                            continue;
                        }
                        LexemeKind::OpenGroup => {
                            trace!("entering group at {}", lexeme.position);
                            let (inner, inner_occurrences, closed_by) = self.parse_group()?;
                            if closed_by != Terminator::Close {
                                return Err(ParseError::UnexpectedEnd);
                            }
                            occurrences |= inner_occurrences;
                            inner
                        }
                        LexemeKind::Variable => {
                            let v = Variable::new(lexeme.symbol).ok_or(
                                ParseError::UnexpectedLexeme {
                                    found: lexeme.kind,
                                    position: lexeme.position,
                                },
                            )?;
                            occurrences |= v.bit();
                            Statement::Var(v)
                        }
                        LexemeKind::Operator | LexemeKind::CloseGroup => {
                            return Err(unexpected(lexeme));
                        }
                    };

                    slot.inner = Some(inner);
                    state = if op.is_none() {
                        ParseState::ExpectOperatorOrClose
                    } else {
                        ParseState::ExpectClose
                    };
                }
                ParseState::ExpectOperatorOrClose => match lexeme.kind {
                    LexemeKind::Operator => {
                        op = Some(
                            BinaryOperator::from_symbol(lexeme.symbol)
                                .ok_or_else(|| unexpected(lexeme))?,
                        );
                        state = ParseState::ExpectStatement;
                    }
                    LexemeKind::CloseGroup => {
                        terminator = Terminator::Close;
                        break;
                    }
                    _ => return Err(unexpected(lexeme)),
                },
                ParseState::ExpectClose => match lexeme.kind {
                    LexemeKind::CloseGroup => {
                        terminator = Terminator::Close;
                        break;
                    }
                    LexemeKind::Operator => {
                        return Err(ParseError::ChainedOperator {
                            operator: lexeme.symbol,
                            position: lexeme.position,
                        })
                    }
                    _ => return Err(unexpected(lexeme)),
                },
            }
        }

        if state == ParseState::ExpectStatement {
            return Err(ParseError::UnexpectedEnd);
        }

        let statement = match op {
            None => left.build()?,
            Some(op) => Statement::BinaryOp(op, Box::new(left.build()?), Box::new(right.build()?)),
        };

        Ok((statement, occurrences, terminator))
    }
}

const fn unexpected(lexeme: Lexeme) -> ParseError {
    ParseError::UnexpectedLexeme {
        found: lexeme.kind,
        position: lexeme.position,
    }
}
