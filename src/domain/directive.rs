//! `include::<target>[<attributes>]` directive parsing

use crate::error::{IncludeError, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Attribute set by `opts=optional`.
pub const OPTIONAL_OPTION: &str = "optional-option";

fn directive_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^(\\)?include::([^\s\[](?:[^\[]*[^\s\[])?)\[(.*)\]$").unwrap()
    })
}

/// Where a directive was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub path: String,
    /// 1-based
    pub lineno: usize,
}

impl SourceLocation {
    pub fn new(path: impl Into<String>, lineno: usize) -> Self {
        Self {
            path: path.into(),
            lineno,
        }
    }
}

/// A parsed include directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub target: String,
    pub attributes: BTreeMap<String, String>,
    pub location: SourceLocation,
}

/// Result of matching a source line against the directive syntax
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveLine {
    Include(Directive),
    /// `\include::...[]`, to be emitted as-is minus the backslash
    Escaped(String),
}

impl Directive {
    pub fn new(target: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            target: target.into(),
            attributes: BTreeMap::new(),
            location,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Match a single source line. Returns `None` for ordinary lines.
    pub fn match_line(line: &str, location: SourceLocation) -> Option<DirectiveLine> {
        if !line.contains("include::") || !line.ends_with(']') {
            return None;
        }
        let caps = directive_regex().captures(line)?;

        if caps.get(1).is_some() {
            return Some(DirectiveLine::Escaped(line[1..].to_string()));
        }

        let target = caps[2].to_string();
        let attributes = parse_attributes(caps.get(3).map_or("", |m| m.as_str()));

        Some(DirectiveLine::Include(Directive {
            target,
            attributes,
            location,
        }))
    }

    /// Parse a line that must be an (unescaped) include directive.
    pub fn parse(line: &str, location: SourceLocation) -> Result<Self> {
        match Self::match_line(line, location) {
            Some(DirectiveLine::Include(directive)) => Ok(directive),
            _ => Err(IncludeError::InvalidDirective(line.to_string())),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Missing targets of optional directives are dropped silently.
    pub fn is_optional(&self) -> bool {
        self.has_attribute(OPTIONAL_OPTION)
    }

    /// The directive as written, without attributes
    pub fn to_source(&self) -> String {
        format!("include::{}[]", self.target)
    }
}

/// Parse an attribute list such as `lines="1..3,5", opts=optional`.
///
/// Entries are separated by commas outside of quotes. Entries without `=` are
/// positional and ignored. Each option in `opts`/`options` becomes an
/// `<name>-option` attribute with an empty value.
pub fn parse_attributes(attrlist: &str) -> BTreeMap<String, String> {
    let mut attributes = BTreeMap::new();

    for entry in split_entries(attrlist) {
        let Some((key, value)) = entry.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = unquote(value.trim());

        if key == "opts" || key == "options" {
            for opt in value.split(',').map(str::trim).filter(|o| !o.is_empty()) {
                attributes.insert(format!("{}-option", opt), String::new());
            }
        } else {
            attributes.insert(key.to_string(), value.to_string());
        }
    }

    attributes
}

fn split_entries(attrlist: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (idx, c) in attrlist.char_indices() {
        match (quote, c) {
            (None, '"') | (None, '\'') => quote = Some(c),
            (Some(q), c) if q == c => quote = None,
            (None, ',') => {
                entries.push(&attrlist[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    entries.push(&attrlist[start..]);

    entries
        .into_iter()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .collect()
}

fn unquote(value: &str) -> &str {
    for q in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(q) && value.ends_with(q) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::new("doc.adoc", 3)
    }

    #[test]
    fn test_plain_line_is_not_a_directive() {
        assert_eq!(Directive::match_line("Some text", loc()), None);
        assert_eq!(Directive::match_line("see include::a.adoc[] here", loc()), None);
    }

    #[test]
    fn test_match_simple_directive() {
        let directive = Directive::parse("include::chapter.adoc[]", loc()).unwrap();
        assert_eq!(directive.target, "chapter.adoc");
        assert!(directive.attributes.is_empty());
        assert_eq!(directive.location, loc());
    }

    #[test]
    fn test_escaped_directive() {
        let matched = Directive::match_line(r"\include::chapter.adoc[]", loc());
        assert_eq!(
            matched,
            Some(DirectiveLine::Escaped("include::chapter.adoc[]".to_string()))
        );
    }

    #[test]
    fn test_target_must_not_start_with_space() {
        assert_eq!(Directive::match_line("include:: a.adoc[]", loc()), None);
        assert!(Directive::parse("include::[]", loc()).is_err());
    }

    #[test]
    fn test_lines_and_tags_attributes() {
        let directive =
            Directive::parse("include::a.rb[lines=1;3..4;6..-1, tags=snippets;!snippet-b]", loc())
                .unwrap();
        assert_eq!(directive.attribute("lines"), Some("1;3..4;6..-1"));
        assert_eq!(directive.attribute("tags"), Some("snippets;!snippet-b"));
    }

    #[test]
    fn test_quoted_value_may_contain_commas() {
        let attrs = parse_attributes(r#"lines="1,3..4",tag='a'"#);
        assert_eq!(attrs.get("lines").map(String::as_str), Some("1,3..4"));
        assert_eq!(attrs.get("tag").map(String::as_str), Some("a"));
    }

    #[test]
    fn test_opts_optional() {
        let directive = Directive::parse("include::missing.adoc[opts=optional]", loc()).unwrap();
        assert!(directive.is_optional());

        let directive =
            Directive::parse(r#"include::missing.adoc[options="optional,other"]"#, loc()).unwrap();
        assert!(directive.is_optional());
        assert!(directive.has_attribute("other-option"));
    }

    #[test]
    fn test_positional_entries_are_ignored() {
        let attrs = parse_attributes("leveloffset, lines=2");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("lines").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_empty_lines_value_is_kept() {
        let attrs = parse_attributes(r#"lines="""#);
        assert_eq!(attrs.get("lines").map(String::as_str), Some(""));
    }

    #[test]
    fn test_to_source() {
        let directive = Directive::new("http://example.org/a.adoc", loc()).with_attribute("lines", "1");
        assert_eq!(directive.to_source(), "include::http://example.org/a.adoc[]");
    }
}
