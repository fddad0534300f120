//! Culprit statement extraction
//!
//! Detective solutions name their answer in a `MAIN CULPRIT(S)` section. Models
//! write it either as a tagged span or as a plain heading followed by a block
//! of text, so extraction tries one strategy per form, in a fixed order.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use super::parser::{OutputParser, ParseError, ParseResult};

/// `<MAIN CULPRIT(S)> ... </MAIN CULPRIT(S)>`, shortest span, may cross lines.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<MAIN\s+CULPRIT\(S\)>(.*?)</MAIN\s+CULPRIT\(S\)>").unwrap()
});

/// `MAIN CULPRIT(S)` followed by a newline, anywhere in the text. The block
/// ends at a blank line followed by a letter, at the next `...(S)` heading line,
/// or at end of input. The whole pattern is case-insensitive, terminators
/// included, so a blank line before a lower-case paragraph also ends the block.
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)MAIN\s+CULPRIT\(S\)\s*\n(.*?)(?:\n\n[A-Z]|\n[A-Z][A-Z\s]*\(S\)|\z)")
        .unwrap()
});

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)MAIN\s+CULPRIT\(S\)").unwrap());

/// One way of locating the culprit statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CulpritStrategy {
    /// `<MAIN CULPRIT(S)>` ... `</MAIN CULPRIT(S)>`
    DelimitedTag,
    /// A `MAIN CULPRIT(S)` line followed by the answer block
    Heading,
}

impl CulpritStrategy {
    /// Strategies in the order they are tried.
    pub const ORDER: [CulpritStrategy; 2] = [CulpritStrategy::DelimitedTag, CulpritStrategy::Heading];

    /// Run this strategy alone. Returns the trimmed capture, which may be empty.
    pub fn apply(self, text: &str) -> Option<String> {
        let re = match self {
            CulpritStrategy::DelimitedTag => &*TAG_RE,
            CulpritStrategy::Heading => &*HEADING_RE,
        };
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    }

    pub fn name(self) -> &'static str {
        match self {
            CulpritStrategy::DelimitedTag => "delimited_tag",
            CulpritStrategy::Heading => "heading",
        }
    }
}

/// Extract the main culprit statement from a written solution.
///
/// The first strategy that matches decides the result; a match with nothing
/// but whitespace inside counts as absent rather than falling through.
pub fn extract_main_culprit(text: &str) -> Option<String> {
    locate(text).map(|(_, culprit)| culprit)
}

/// Same as [`extract_main_culprit`] for a raw JSON field. Anything other than a
/// string yields `None`.
pub fn extract_main_culprit_value(value: &Value) -> Option<String> {
    value.as_str().and_then(extract_main_culprit)
}

fn locate(text: &str) -> Option<(CulpritStrategy, String)> {
    if text.trim().is_empty() {
        return None;
    }

    CulpritStrategy::ORDER
        .into_iter()
        .find_map(|strategy| strategy.apply(text).map(|culprit| (strategy, culprit)))
        .filter(|(_, culprit)| !culprit.is_empty())
}

/// [`OutputParser`] front-end for culprit extraction.
///
/// Reports why nothing was found instead of collapsing it into `None`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CulpritParser;

impl CulpritParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse and also report which strategy produced the answer.
    pub fn parse_with_strategy(&self, raw: &str) -> ParseResult<(CulpritStrategy, String)> {
        if raw.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }

        locate(raw).ok_or_else(|| {
            ParseError::InvalidFormat("No MAIN CULPRIT(S) statement found".to_string())
        })
    }
}

impl OutputParser for CulpritParser {
    type Output = String;

    fn parse(&self, raw: &str) -> ParseResult<Self::Output> {
        self.parse_with_strategy(raw).map(|(_, culprit)| culprit)
    }

    fn can_parse(&self, raw: &str) -> bool {
        MENTION_RE.is_match(raw)
    }

    fn name(&self) -> &'static str {
        "culprit"
    }
}
