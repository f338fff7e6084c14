//! # Ruled - Fixed-Width Table Rows for the Terminal
//!
//! A tiny row printer for command line listings: each row is a sequence of
//! displayable cells laid out on fixed column positions, optionally followed
//! by a full-width rule line.
//!
//! ## Layout
//!
//! Columns are described by their **right edge**, as a fraction of the total
//! line width. `[0.33, 1.0]` on a 60 column line gives a first column spanning
//! columns 0..20 and a second one filling 20..60.
//!
//! ```rust
//! use ruled::{render_row, Layout, Rule};
//!
//! let layout = Layout::new(20, vec![0.5, 1.0]).unwrap();
//! let out = render_row(&["name", "value"], Rule::Light, &layout);
//! assert_eq!(out, "name      value\n--------------------\n");
//! ```
//!
//! Cells are space-filled to their column width using the Unicode display
//! width of the text. A cell wider than its column is **never truncated**: it
//! overflows and pushes the following columns to the right, separated by a
//! single space.
//!
//! ## Rules
//!
//! [`Rule::Light`] draws `-`, [`Rule::Heavy`] draws `=`, both across the full
//! line width. [`Table`] uses [`lookahead`] to put light rules between rows and
//! a heavy rule under the last one.
//!
//! ## Empty input
//!
//! Nothing here errors on empty input. An empty row renders as a blank line,
//! an empty table renders just its header, and `lookahead` over an empty or
//! absent sequence yields nothing.

use console::{Style, Term};
use std::fmt::Display;
use std::io::{self, Write};
use std::iter::{Flatten, FusedIterator};
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

/// Line width used when the terminal size cannot be detected.
pub const DEFAULT_WIDTH: usize = 100;

const LIGHT_RULE: char = '-';
const HEAVY_RULE: char = '=';

/// Separator drawn under a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    None,
    Light,
    Heavy,
}

impl Rule {
    fn glyph(self) -> Option<char> {
        match self {
            Rule::None => None,
            Rule::Light => Some(LIGHT_RULE),
            Rule::Heavy => Some(HEAVY_RULE),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("column fraction {0} is outside (0, 1]")]
    OutOfRange(f32),

    #[error("column fractions must be strictly increasing ({prev} then {next})")]
    NotIncreasing { prev: f32, next: f32 },
}

/// Line width plus the right edge of every column.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    width: usize,
    columns: Vec<f32>,
}

impl Layout {
    pub fn new(width: usize, columns: Vec<f32>) -> Result<Self, LayoutError> {
        let mut prev: Option<f32> = None;
        for &fraction in &columns {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(LayoutError::OutOfRange(fraction));
            }
            if let Some(p) = prev {
                if fraction <= p {
                    return Err(LayoutError::NotIncreasing {
                        prev: p,
                        next: fraction,
                    });
                }
            }
            prev = Some(fraction);
        }
        Ok(Self { width, columns })
    }

    /// Absolute right edge of each column.
    fn edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.columns
            .iter()
            .map(move |f| (f * self.width as f32).round() as usize)
    }
}

/// Width of the attached terminal, or [`DEFAULT_WIDTH`] when it cannot be detected.
pub fn terminal_width() -> usize {
    Term::stdout()
        .size_checked()
        .map(|(_rows, cols)| cols as usize)
        .filter(|cols| *cols > 0)
        .unwrap_or(DEFAULT_WIDTH)
}

/// Renders one row, plus its rule line, as text terminated by `\n`.
pub fn render_row<D: Display>(cells: &[D], rule: Rule, layout: &Layout) -> String {
    let mut line = String::new();
    let mut used = 0;
    let mut edges = layout.edges();

    for cell in cells {
        let text = cell.to_string();
        match edges.next() {
            Some(edge) => {
                line.push_str(&text);
                used += text.width();
                if used < edge {
                    line.push_str(&" ".repeat(edge - used));
                    used = edge;
                } else {
                    // overflow: keep the whole cell, shift the next column
                    line.push(' ');
                    used += 1;
                }
            }
            None => {
                if used > 0 && !line.ends_with(' ') {
                    line.push(' ');
                }
                line.push_str(&text);
                used += text.width() + 1;
            }
        }
    }

    let mut out = line.trim_end().to_string();
    out.push('\n');
    if let Some(glyph) = rule.glyph() {
        out.extend(std::iter::repeat(glyph).take(layout.width));
        out.push('\n');
    }
    out
}

pub fn write_row<W: Write, D: Display>(
    out: &mut W,
    cells: &[D],
    rule: Rule,
    layout: &Layout,
) -> io::Result<()> {
    out.write_all(render_row(cells, rule, layout).as_bytes())
}

/// Writes a row to stdout.
pub fn print_row<D: Display>(cells: &[D], rule: Rule, layout: &Layout) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_row(&mut handle, cells, rule, layout)
}

/// A header row followed by data rows, light rules between rows and a heavy
/// rule closing the table.
pub struct Table {
    layout: Layout,
    header: Vec<String>,
    header_style: Option<Style>,
}

impl Table {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            header: Vec::new(),
            header_style: None,
        }
    }

    pub fn header<D: Display>(mut self, cells: &[D]) -> Self {
        self.header = cells.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn header_style(mut self, style: Style) -> Self {
        self.header_style = Some(style);
        self
    }

    pub fn render<R, D>(&self, rows: R) -> String
    where
        R: IntoIterator<Item = Vec<D>>,
        D: Display,
    {
        let mut out = String::new();
        if !self.header.is_empty() {
            let header = render_row(&self.header, Rule::None, &self.layout);
            match &self.header_style {
                Some(style) => {
                    out.push_str(&style.apply_to(header.trim_end()).to_string());
                    out.push('\n');
                }
                None => out.push_str(&header),
            }
            out.extend(std::iter::repeat(HEAVY_RULE).take(self.layout.width));
            out.push('\n');
        }
        for (row, has_next) in lookahead(rows) {
            let rule = if has_next { Rule::Light } else { Rule::Heavy };
            out.push_str(&render_row(&row, rule, &self.layout));
        }
        out
    }

    pub fn write<W, R, D>(&self, out: &mut W, rows: R) -> io::Result<()>
    where
        W: Write,
        R: IntoIterator<Item = Vec<D>>,
        D: Display,
    {
        out.write_all(self.render(rows).as_bytes())
    }

    pub fn print<R, D>(&self, rows: R) -> io::Result<()>
    where
        R: IntoIterator<Item = Vec<D>>,
        D: Display,
    {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.write(&mut handle, rows)
    }
}

/// Iterator adapter pairing each element with whether another one follows.
///
/// Holds at most one element ahead of the caller.
pub struct Lookahead<I: Iterator> {
    iter: I,
    pending: Option<I::Item>,
    primed: bool,
}

impl<I: Iterator> Iterator for Lookahead<I> {
    type Item = (I::Item, bool);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.primed {
            self.primed = true;
            self.pending = self.iter.next();
        }
        let current = self.pending.take()?;
        self.pending = self.iter.next();
        Some((current, self.pending.is_some()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let buffered = usize::from(self.pending.is_some());
        if self.primed && buffered == 0 {
            return (0, Some(0));
        }
        let (lo, hi) = self.iter.size_hint();
        (
            lo.saturating_add(buffered),
            hi.and_then(|h| h.checked_add(buffered)),
        )
    }
}

impl<I: FusedIterator> FusedIterator for Lookahead<I> {}

/// `[a, b, c]` becomes `(a, true), (b, true), (c, false)`.
pub fn lookahead<I: IntoIterator>(seq: I) -> Lookahead<I::IntoIter> {
    Lookahead {
        iter: seq.into_iter(),
        pending: None,
        primed: false,
    }
}

/// Like [`lookahead`], treating an absent sequence as an empty one.
pub fn lookahead_opt<I: IntoIterator>(
    seq: Option<I>,
) -> Lookahead<Flatten<std::option::IntoIter<I>>> {
    lookahead(seq.into_iter().flatten())
}
