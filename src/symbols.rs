use std::fmt;

/// Number of distinct variables: `A..=Z` followed by `a..=z`.
pub const VARIABLE_COUNT: usize = 52;

pub const NEGATE: char = '!';
pub const AND: char = '&';
pub const OR: char = '|';
pub const XOR: char = '^';
pub const IMPLIES: char = '>';
pub const IFF: char = '=';
pub const OPEN: char = '(';
pub const CLOSE: char = ')';
pub const FALSE: char = '0';
pub const TRUE: char = '1';

/// An atomic statement, named by a single ASCII letter.
///
/// Variables are ordered by their canonical index: uppercase letters come first
/// (`A` = 0 through `Z` = 25), followed by lowercase letters (`a` = 26 through `z` = 51).
/// Upper- and lowercase letters are distinct variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(u8);

impl Variable {
    /// Returns the variable named by `name`, or `None` if `name` is not an ASCII letter.
    pub const fn new(name: char) -> Option<Self> {
        if name.is_ascii_alphabetic() {
            Some(Self(Self::index_of(name as u8)))
        } else {
            None
        }
    }

    /// Returns the variable at canonical index `index`, or `None` if `index >= 52`.
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < VARIABLE_COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    const fn index_of(ascii: u8) -> u8 {
        if ascii >= b'a' {
            ascii - b'a' + 26
        } else {
            ascii - b'A'
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Single bit of the occurrence set representing this variable.
    pub const fn bit(self) -> u64 {
        1 << self.0
    }

    pub const fn name(self) -> char {
        if self.0 >= 26 {
            (self.0 - 26 + b'a') as char
        } else {
            (self.0 + b'A') as char
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.name(), f)
    }
}

impl From<Variable> for usize {
    fn from(v: Variable) -> Self {
        v.index()
    }
}

/// Iterates the variables whose bits are set in `occurrences`, in canonical order.
pub fn occurring(occurrences: u64) -> impl Iterator<Item = Variable> {
    (0..VARIABLE_COUNT)
        .filter(move |&i| occurrences & (1 << i) != 0)
        .filter_map(Variable::from_index)
}
