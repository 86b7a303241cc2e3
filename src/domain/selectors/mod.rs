//! Line selectors for partial includes

pub mod lines;
pub mod tags;

pub use lines::{LineRange, LineRangeSelector};
pub use tags::TagRegionSelector;

use crate::domain::diagnostic::Diagnostics;
use crate::domain::directive::Directive;

/// Decides, line by line, which lines of an include target are kept.
///
/// Selectors carry state across calls and serve exactly one directive.
pub trait LinesSelector {
    /// `lineno` is 1-based and must not decrease between calls.
    fn includes(&mut self, line: &str, lineno: usize) -> bool;

    /// Line number of the first kept line, if known
    fn first_included_lineno(&self) -> Option<usize>;
}

/// Keeps every line.
#[derive(Debug, Default, Clone, Copy)]
pub struct SelectAll;

impl LinesSelector for SelectAll {
    fn includes(&mut self, _line: &str, _lineno: usize) -> bool {
        true
    }

    fn first_included_lineno(&self) -> Option<usize> {
        Some(1)
    }
}

/// Pick the selector for a directive: `lines` first, then `tag`/`tags`,
/// otherwise everything.
pub fn selector_for<'a>(
    directive: &Directive,
    diagnostics: &'a dyn Diagnostics,
) -> Box<dyn LinesSelector + 'a> {
    if LineRangeSelector::handles(&directive.attributes) {
        Box::new(LineRangeSelector::from_attributes(&directive.attributes))
    } else if TagRegionSelector::handles(&directive.attributes) {
        Box::new(TagRegionSelector::from_attributes(
            &directive.target,
            &directive.attributes,
            diagnostics,
        ))
    } else {
        Box::new(SelectAll)
    }
}

/// Run `selector` over `lines` in a single pass and keep the selected ones.
pub fn select_lines<S>(selector: &mut S, lines: &[String]) -> Vec<String>
where
    S: LinesSelector + ?Sized,
{
    lines
        .iter()
        .enumerate()
        .filter(|(idx, line)| selector.includes(line, idx + 1))
        .map(|(_, line)| line.clone())
        .collect()
}
