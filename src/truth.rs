use crate::error::EnumerationError;
use crate::symbols::{self, Variable, VARIABLE_COUNT};
use rayon::prelude::*;
use std::fmt;

/// Dense bit positions for the variables occurring in one statement.
///
/// Only the `k` variables that occurred get a position; they are assigned shifts `0..k` in
/// canonical order, so shift 0 always belongs to the canonical-first variable. An
/// [`Assignment`] numbered `value` gives variable `v` the truth value of bit
/// `shift(v)` of `value`, which makes counting from `0` to `2^k - 1` visit every
/// combination exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableIndex {
    occurrences: u64,
    shifts: [Option<u8>; VARIABLE_COUNT],
    names: Vec<char>,
}

impl VariableIndex {
    /// Builds the index for an occurrence set; bits above 51 are ignored.
    pub fn new(occurrences: u64) -> Self {
        let mut shifts = [None; VARIABLE_COUNT];
        let mut names = Vec::with_capacity(occurrences.count_ones() as usize);
        let mut mask = 0;

        for (shift, v) in symbols::occurring(occurrences).enumerate() {
            shifts[v.index()] = Some(shift as u8);
            names.push(v.name());
            mask |= v.bit();
        }

        Self {
            occurrences: mask,
            shifts,
            names,
        }
    }

    pub const fn occurrences(&self) -> u64 {
        self.occurrences
    }

    /// Names of the occurring variables in canonical order; `names()[s]` has shift `s`.
    pub fn names(&self) -> &[char] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn shift(&self, v: Variable) -> Option<u8> {
        self.shifts[v.index()]
    }

    /// Variables in shift order.
    pub fn variables(&self) -> impl Iterator<Item = Variable> + '_ {
        symbols::occurring(self.occurrences)
    }

    /// Number of distinct assignments, `2^k`.
    pub fn assignment_count(&self) -> u64 {
        1 << self.len()
    }

    /// The assignment numbered `value`, or `None` if `value >= 2^k`.
    pub fn assignment(&self, value: u64) -> Option<Assignment<'_>> {
        (value < self.assignment_count()).then_some(Assignment { value, index: self })
    }

    /// All `2^k` assignments in increasing order of their value.
    pub fn assignments(&self) -> Result<Assignments<'_>, EnumerationError> {
        if self.is_empty() {
            return Err(EnumerationError::NoVariables);
        }

        Ok(Assignments {
            index: self,
            next: 0,
            end: self.assignment_count(),
        })
    }

    /// Parallel counterpart of [`assignments`](Self::assignments).
    pub fn par_assignments(
        &self,
    ) -> Result<impl ParallelIterator<Item = Assignment<'_>> + '_, EnumerationError> {
        if self.is_empty() {
            return Err(EnumerationError::NoVariables);
        }

        Ok((0..self.assignment_count())
            .into_par_iter()
            .map(move |value| Assignment { value, index: self }))
    }
}

/// One combination of truth values for the variables of a [`VariableIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment<'a> {
    value: u64,
    index: &'a VariableIndex,
}

impl<'a> Assignment<'a> {
    pub const fn value(&self) -> u64 {
        self.value
    }

    pub fn names(&self) -> &'a [char] {
        self.index.names()
    }

    /// Truth value of `v`; variables absent from the index are false.
    pub fn get(&self, v: Variable) -> bool {
        self.index
            .shift(v)
            .is_some_and(|shift| self.value & (1 << shift) != 0)
    }

    /// Truth values in shift order.
    pub fn values(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.index.len()).map(move |shift| self.value & (1 << shift) != 0)
    }
}

impl fmt::Display for Assignment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.names().iter().zip(self.values()).enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{name}:{}", u8::from(value))?;
        }
        write!(f, "}}")
    }
}

/// Iterator over every assignment of a [`VariableIndex`], counting up from zero.
#[derive(Debug, Clone)]
pub struct Assignments<'a> {
    index: &'a VariableIndex,
    next: u64,
    end: u64,
}

impl Assignments<'_> {
    /// Restarts the sweep from value zero.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

impl<'a> Iterator for Assignments<'a> {
    type Item = Assignment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }

        let value = self.next;
        self.next += 1;

        Some(Assignment {
            value,
            index: self.index,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.end - self.next).ok();
        (remaining.unwrap_or(usize::MAX), remaining)
    }
}

impl std::iter::FusedIterator for Assignments<'_> {}
