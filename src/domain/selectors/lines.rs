//! Line selection by ranges of line numbers
//!
//! ```text
//! include::some-file.adoc[lines=1;3..4;6..-1]
//! ```

use super::LinesSelector;
use std::collections::BTreeMap;

/// A closed range of 1-based line numbers; `to == None` runs to the end of file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub from: i64,
    pub to: Option<i64>,
}

impl LineRange {
    pub fn new(from: i64, to: Option<i64>) -> Self {
        Self { from, to }
    }

    fn ends_before(&self, lineno: i64) -> bool {
        matches!(self.to, Some(to) if to < lineno)
    }

    pub fn contains(&self, lineno: i64) -> bool {
        lineno >= self.from && !self.ends_before(lineno)
    }
}

/// Selects lines covered by any of the ranges in a `lines` attribute.
///
/// Single use: [`LinesSelector::includes`] must be called with non-decreasing
/// line numbers. Ranges are consumed from the end of a list sorted by `from`
/// in descending order, and a range is dropped for good once the current line
/// is past its end.
#[derive(Debug, Clone)]
pub struct LineRangeSelector {
    ranges: Vec<LineRange>,
    first_included_lineno: Option<usize>,
}

impl LineRangeSelector {
    /// Whether the directive attributes ask for line ranges
    pub fn handles(attributes: &BTreeMap<String, String>) -> bool {
        attributes.contains_key("lines")
    }

    pub fn new(lines_def: &str) -> Self {
        let ranges = parse_lines(lines_def);
        let first_included_lineno = ranges
            .last()
            .and_then(|r| usize::try_from(r.from).ok());

        Self {
            ranges,
            first_included_lineno,
        }
    }

    pub fn from_attributes(attributes: &BTreeMap<String, String>) -> Self {
        Self::new(attributes.get("lines").map_or("", String::as_str))
    }

    /// Remaining ranges, sorted by `from` descending
    pub fn ranges(&self) -> &[LineRange] {
        &self.ranges
    }
}

impl LinesSelector for LineRangeSelector {
    fn includes(&mut self, _line: &str, lineno: usize) -> bool {
        let lineno = lineno as i64;

        while self.ranges.last().is_some_and(|r| r.ends_before(lineno)) {
            self.ranges.pop();
        }

        self.ranges.last().is_some_and(|r| r.contains(lineno))
    }

    fn first_included_lineno(&self) -> Option<usize> {
        self.first_included_lineno
    }
}

/// Parse comma or semicolon separated line numbers and `from..to` ranges.
///
/// `to` of `-1` means "to the end". The result is sorted by `from` descending.
pub fn parse_lines(lines_def: &str) -> Vec<LineRange> {
    let mut ranges: Vec<LineRange> = lines_def
        .split([',', ';'])
        .map(str::trim)
        .filter(|atom| !atom.is_empty())
        .map(|atom| {
            let (from, to) = match atom.split_once("..") {
                Some((from, to)) => (leading_int(from), leading_int(to)),
                None => {
                    let n = leading_int(atom);
                    (n, n)
                }
            };
            LineRange::new(from, if to == -1 { None } else { Some(to) })
        })
        .collect();

    ranges.sort_by(|a, b| b.from.cmp(&a.from));
    ranges
}

/// Integer prefix of `s`, or 0 when there is none.
fn leading_int(s: &str) -> i64 {
    let s = s.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end].parse::<i64>().map_or(0, |n| sign * n)
}
