//! Yes/No verdict normalization for judge completions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::parser::ParseError;

/// A judge's answer to "was the detective correct?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Yes,
    No,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Yes => "Yes",
            Verdict::No => "No",
        }
    }

    pub fn is_correct(self) -> bool {
        self == Verdict::Yes
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse: only the literal tokens `Yes` and `No`.
impl FromStr for Verdict {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Yes" => Ok(Verdict::Yes),
            "No" => Ok(Verdict::No),
            "" => Err(ParseError::EmptyInput),
            other => Err(ParseError::InvalidFormat(format!(
                "expected Yes or No, got {other:?}"
            ))),
        }
    }
}

/// How a verdict was recovered from the raw completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictMatch {
    /// The trimmed completion was exactly `Yes` or `No`
    Exact(Verdict),
    /// Recovered by substring search
    Normalized(Verdict),
}

impl VerdictMatch {
    pub fn verdict(self) -> Verdict {
        match self {
            VerdictMatch::Exact(v) | VerdictMatch::Normalized(v) => v,
        }
    }

    pub fn is_exact(self) -> bool {
        matches!(self, VerdictMatch::Exact(_))
    }
}

/// Map a judge completion onto a verdict.
///
/// Exact tokens win. Otherwise the lower-cased text is searched for `yes`
/// first, then `no`. Returns `None` when neither appears.
pub fn parse_verdict(raw: &str) -> Option<VerdictMatch> {
    let trimmed = raw.trim();

    if let Ok(verdict) = trimmed.parse::<Verdict>() {
        return Some(VerdictMatch::Exact(verdict));
    }

    let lowered = trimmed.to_lowercase();
    if lowered.contains("yes") {
        Some(VerdictMatch::Normalized(Verdict::Yes))
    } else if lowered.contains("no") {
        Some(VerdictMatch::Normalized(Verdict::No))
    } else {
        None
    }
}
