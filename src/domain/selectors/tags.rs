//! Line selection by tagged regions
//!
//! Regions are delimited by `tag::<name>[]` and `end::<name>[]` markers,
//! usually placed in comments of the included file:
//!
//! ```text
//! include::some-file.rb[tag=snippets]
//! include::some-file.rb[tags=snippets;!snippet-b]
//! ```
//!
//! Two names are reserved in the `tags` attribute: `*` sets the state of
//! every region not named explicitly, `**` sets the state of untagged lines
//! (and of `*` when that one is absent).

use super::LinesSelector;
use crate::domain::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::OnceLock;

const WILDCARD: &str = "*";
const DOUBLE_WILDCARD: &str = "**";

fn tag_marker_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\b(?:tag|(end))::(\S+)\[\](?:$| )").unwrap())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Marker {
    Start(String),
    End(String),
}

fn parse_marker(line: &str) -> Option<Marker> {
    let caps = tag_marker_regex().captures(line)?;
    let name = caps[2].to_string();
    if caps.get(1).is_some() {
        Some(Marker::End(name))
    } else {
        Some(Marker::Start(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Region {
    /// `None` only for the root entry
    name: Option<String>,
    state: bool,
}

/// Selects lines inside (or outside) the tagged regions named by a `tag` or
/// `tags` attribute.
///
/// Single use: feed it every line of one include target, in order.
pub struct TagRegionSelector<'a> {
    target: String,
    diagnostics: &'a dyn Diagnostics,
    tag_flags: HashMap<String, bool>,
    wildcard: Option<bool>,

    stack: Vec<Region>,
    state: bool,
    /// Open regions nobody asked about, by name
    untracked: HashMap<String, usize>,
    used_tags: BTreeSet<String>,
    first_included_lineno: Option<usize>,
}

impl<'a> TagRegionSelector<'a> {
    /// Whether the directive attributes ask for tagged regions
    pub fn handles(attributes: &BTreeMap<String, String>) -> bool {
        attributes.contains_key("tag") || attributes.contains_key("tags")
    }

    /// Build from directive attributes. `tag` wins over `tags`.
    pub fn from_attributes(
        target: &str,
        attributes: &BTreeMap<String, String>,
        diagnostics: &'a dyn Diagnostics,
    ) -> Self {
        let tag_flags = match attributes.get("tag") {
            Some(tag) => parse_tags(tag, true),
            None => parse_tags(attributes.get("tags").map_or("", String::as_str), false),
        };
        Self::new(target, tag_flags, diagnostics)
    }

    pub fn new(
        target: &str,
        mut tag_flags: HashMap<String, bool>,
        diagnostics: &'a dyn Diagnostics,
    ) -> Self {
        let mut wildcard = tag_flags.remove(WILDCARD);
        let default_state = match tag_flags.remove(DOUBLE_WILDCARD) {
            Some(state) => {
                wildcard.get_or_insert(state);
                state
            }
            None => !tag_flags.values().any(|&flag| flag),
        };

        Self {
            target: target.to_string(),
            diagnostics,
            tag_flags,
            wildcard,
            stack: vec![Region {
                name: None,
                state: default_state,
            }],
            state: default_state,
            untracked: HashMap::new(),
            used_tags: BTreeSet::new(),
            first_included_lineno: None,
        }
    }

    /// Configured tags whose start marker was seen so far
    pub fn used_tags(&self) -> &BTreeSet<String> {
        &self.used_tags
    }

    /// Configured tags whose start marker was never seen
    pub fn unused_tags(&self) -> Vec<String> {
        let mut unused: Vec<String> = self
            .tag_flags
            .keys()
            .filter(|tag| !self.used_tags.contains(*tag))
            .cloned()
            .collect();
        unused.sort();
        unused
    }

    fn active_tag(&self) -> Option<&str> {
        self.stack.last().and_then(|r| r.name.as_deref())
    }

    fn enter_region(&mut self, name: String) {
        if let Some(&flag) = self.tag_flags.get(&name) {
            self.used_tags.insert(name.clone());
            self.state = flag;
        } else if let Some(wildcard) = self.wildcard {
            // a wildcard cannot re-include content of an excluded region
            self.state = if self.active_tag().is_some() && !self.state {
                false
            } else {
                wildcard
            };
        } else {
            *self.untracked.entry(name).or_insert(0) += 1;
            return;
        }

        self.stack.push(Region {
            name: Some(name),
            state: self.state,
        });
    }

    fn exit_region(&mut self, name: String, lineno: usize) {
        if self.active_tag() == Some(name.as_str()) {
            self.stack.pop();
            self.state = self.stack.last().map_or(self.state, |r| r.state);
            return;
        }

        let position = self
            .stack
            .iter()
            .rposition(|r| r.name.as_deref() == Some(name.as_str()));

        if self.tag_flags.contains_key(&name) {
            match position {
                Some(idx) => {
                    self.stack.remove(idx);
                    let message = format!(
                        "mismatched end tag include: expected {}, found {}",
                        self.active_tag().unwrap_or(""),
                        name
                    );
                    self.warn(DiagnosticKind::MismatchedEndTag, lineno, message);
                }
                None => self.warn(
                    DiagnosticKind::UnexpectedEndTag,
                    lineno,
                    format!("unexpected end tag in include: {}", name),
                ),
            }
            return;
        }

        // wildcard regions closed out of order stay on the stack
        if position.is_some() {
            return;
        }

        match self.untracked.get_mut(&name) {
            Some(open) if *open > 0 => *open -= 1,
            _ => self.warn(
                DiagnosticKind::UnexpectedEndTag,
                lineno,
                format!("unexpected end tag in include: {}", name),
            ),
        }
    }

    fn warn(&self, kind: DiagnosticKind, lineno: usize, message: String) {
        self.diagnostics
            .report(Diagnostic::warning(kind, self.target.as_str(), lineno, message));
    }
}

impl LinesSelector for TagRegionSelector<'_> {
    fn includes(&mut self, line: &str, lineno: usize) -> bool {
        match parse_marker(line) {
            Some(Marker::Start(name)) => {
                self.enter_region(name);
                false
            }
            Some(Marker::End(name)) => {
                self.exit_region(name, lineno);
                false
            }
            None => {
                if self.state && self.first_included_lineno.is_none() {
                    self.first_included_lineno = Some(lineno);
                }
                self.state
            }
        }
    }

    fn first_included_lineno(&self) -> Option<usize> {
        self.first_included_lineno
    }
}

/// Parse a `tag` (`single == true`) or `tags` attribute value into tag flags.
///
/// `!name` excludes a region; a lone `!` is ignored.
pub fn parse_tags(tags_def: &str, single: bool) -> HashMap<String, bool> {
    let atoms: Vec<&str> = if single {
        vec![tags_def]
    } else {
        tags_def.split([',', ';']).collect()
    };

    let mut tags = HashMap::new();
    for atom in atoms {
        if let Some(name) = atom.strip_prefix('!') {
            if !name.is_empty() {
                tags.insert(name.to_string(), false);
            }
        } else if !atom.is_empty() {
            tags.insert(atom.to_string(), true);
        }
    }
    tags
}
