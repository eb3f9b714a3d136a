use std::{
    fmt::{self, Display},
    io::{self, Write},
    str::FromStr,
};

use itertools::Itertools;
use log::debug;
use rayon::prelude::*;

use crate::error::EnumerationError;
use crate::parser::ParsedStatement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Row selection for a rendered truth table.
///
/// [`True`] keeps the rows where the statement holds, [`False`] the rows where it does not,
/// and [`Any`] keeps every row.
///
/// [`Any`]: OutputFilter::Any
/// [`True`]: OutputFilter::True
/// [`False`]: OutputFilter::False
pub enum OutputFilter {
    True,
    False,
    #[default]
    Any,
}

impl OutputFilter {
    const fn variants<'a>() -> &'a [Self] {
        &[Self::True, Self::False, Self::Any]
    }

    fn matches(&self, s: &str) -> bool {
        match self {
            Self::True => matches!(s, "true" | "True" | "t" | "T" | "1"),
            Self::False => matches!(s, "false" | "False" | "f" | "F" | "0"),
            Self::Any => matches!(s, "any" | "Any" | "a" | "A" | "*"),
        }
    }

    pub const fn admits(self, output: bool) -> bool {
        match self {
            Self::True => output,
            Self::False => !output,
            Self::Any => true,
        }
    }
}

impl Display for OutputFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::True => "True",
            Self::False => "False",
            Self::Any => "Any",
        })
    }
}

impl FromStr for OutputFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::variants()
            .iter()
            .find(|variant| variant.matches(s))
            .ok_or_else(|| anyhow::anyhow!("cannot parse {s} as output filter"))
            .copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// True under every assignment.
    Tautology,
    /// False under every assignment.
    Contradiction,
    /// True under some assignments and false under others.
    Contingent,
}

impl Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Tautology => "tautology",
            Self::Contradiction => "contradiction",
            Self::Contingent => "contingent",
        })
    }
}

/// Glyphs used to draw a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharSet {
    pub row_sep: &'static str,
    pub col_sep: &'static str,
    pub center: &'static str,
    pub top_t: &'static str,
    pub bottom_t: &'static str,
    pub left_t: &'static str,
    pub right_t: &'static str,
    pub tl_corner: &'static str,
    pub tr_corner: &'static str,
    pub bl_corner: &'static str,
    pub br_corner: &'static str,
}

impl CharSet {
    pub const PRETTY: Self = Self {
        row_sep: "─",
        col_sep: "│",
        center: "┼",
        top_t: "┬",
        bottom_t: "┴",
        left_t: "├",
        right_t: "┤",
        tl_corner: "┌",
        tr_corner: "┐",
        bl_corner: "└",
        br_corner: "┘",
    };

    pub const ASCII: Self = Self {
        row_sep: "-",
        col_sep: "|",
        center: "+",
        top_t: "+",
        bottom_t: "+",
        left_t: "+",
        right_t: "+",
        tl_corner: "+",
        tr_corner: "+",
        bl_corner: "+",
        br_corner: "+",
    };
}

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Rendering options for [`TruthTable::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub charset: CharSet,
    pub colorize: bool,
    pub filter: OutputFilter,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            charset: CharSet::PRETTY,
            colorize: false,
            filter: OutputFilter::Any,
        }
    }
}

/// A statement evaluated under every assignment of its variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable {
    names: Vec<char>,
    statement: String,
    outputs: Vec<bool>,
}

impl TruthTable {
    pub fn new(parsed: &ParsedStatement) -> Result<Self, EnumerationError> {
        let outputs: Vec<bool> = parsed
            .variables
            .par_assignments()?
            .map(|assignment| parsed.statement.evaluate(&assignment))
            .collect();

        debug!("evaluated {} rows of {}", outputs.len(), parsed.statement);

        Ok(Self {
            names: parsed.variables.names().to_vec(),
            statement: parsed.statement.render(),
            outputs,
        })
    }

    pub fn names(&self) -> &[char] {
        &self.names
    }

    /// The rendered statement used as the output column header.
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// Output of the statement for every assignment, indexed by assignment value.
    pub fn outputs(&self) -> &[bool] {
        &self.outputs
    }

    /// Rows admitted by `filter`, as `(assignment value, output)`.
    pub fn rows(&self, filter: OutputFilter) -> impl Iterator<Item = (u64, bool)> + '_ {
        (0u64..)
            .zip(self.outputs.iter().copied())
            .filter(move |&(_, output)| filter.admits(output))
    }

    pub fn classify(&self) -> Classification {
        if self.outputs.iter().all(|&o| o) {
            Classification::Tautology
        } else if self.outputs.iter().all(|&o| !o) {
            Classification::Contradiction
        } else {
            Classification::Contingent
        }
    }

    /// Input bits of row `value`, most significant first, so that rows read as binary numbers.
    fn bits(&self, value: u64) -> impl Iterator<Item = bool> {
        (0..self.names.len())
            .rev()
            .map(move |shift| value & (1 << shift) != 0)
    }

    /// Variable names in column order, matching [`bits`](Self::bits).
    fn columns(&self) -> impl Iterator<Item = &char> {
        self.names.iter().rev()
    }

    /// Draws the table with box glyphs: one column per variable, the canonical-last variable first,
    /// then the output column.
    pub fn render<W: Write>(&self, writer: &mut W, options: &RenderOptions) -> io::Result<()> {
        let cs = &options.charset;
        let output_width = self.statement.chars().count();

        self.write_line(writer, cs.row_sep, cs.tl_corner, cs.top_t, cs.tr_corner, output_width)?;
        let header = self.columns().join("  ");
        write_row(writer, cs, &header, &self.statement)?;
        self.write_line(writer, cs.row_sep, cs.left_t, cs.center, cs.right_t, output_width)?;

        for (value, output) in self.rows(options.filter) {
            let inputs = self
                .bits(value)
                .map(|bit| digit(bit, options.colorize, 1))
                .join("  ");
            let output = digit(output, options.colorize, output_width);
            write_row(writer, cs, &inputs, &output)?;
        }

        self.write_line(writer, cs.row_sep, cs.bl_corner, cs.bottom_t, cs.br_corner, output_width)
    }

    /// Writes the table as CSV: one column per variable in the same order as
    /// [`render`](Self::render), then the statement.
    pub fn write_csv<W: Write>(&self, writer: W, filter: OutputFilter) -> csv::Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let header = self
            .columns()
            .map(char::to_string)
            .chain([self.statement.clone()]);
        csv_writer.write_record(header)?;

        for (value, output) in self.rows(filter) {
            let record = self
                .bits(value)
                .chain([output])
                .map(|b| if b { "1" } else { "0" });
            csv_writer.write_record(record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    fn input_width(&self) -> usize {
        let n = self.names.len();
        n + 2 * n.saturating_sub(1)
    }

    fn write_line<W: Write>(
        &self,
        writer: &mut W,
        fill: &str,
        left: &str,
        middle: &str,
        right: &str,
        output_width: usize,
    ) -> io::Result<()> {
        writeln!(
            writer,
            "{left}{}{middle}{}{right}",
            fill.repeat(self.input_width()),
            fill.repeat(output_width)
        )
    }
}

fn write_row<W: Write>(writer: &mut W, cs: &CharSet, input: &str, output: &str) -> io::Result<()> {
    writeln!(writer, "{0}{input}{0}{output}{0}", cs.col_sep)
}

/// `1` or `0` centered in `width` columns, optionally colored.
fn digit(value: bool, colorize: bool, width: usize) -> String {
    let text = if value { "1" } else { "0" };
    let left = width.saturating_sub(1) / 2;
    let centered = format!("{:>left$}{:<right$}", "", text, right = width - left);

    if colorize {
        let color = if value { GREEN } else { RED };
        format!("{color}{centered}{RESET}")
    } else {
        centered
    }
}
