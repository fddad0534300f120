//! Record file discovery

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CasefileError, Result};

/// File-name glob with `fnmatch` syntax: `*` matches any run of characters,
/// `?` exactly one, `[seq]` one character of the class and `[!seq]` one
/// character outside it. Everything else matches itself.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    matcher: Regex,
}

impl GlobPattern {
    /// Compile a glob. Patterns are matched against bare file names, so path
    /// separators are rejected.
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(CasefileError::Configuration(
                "file pattern must not be empty".to_string(),
            ));
        }
        if pattern.contains('/') || pattern.contains(std::path::MAIN_SEPARATOR) {
            return Err(CasefileError::Configuration(format!(
                "file pattern {pattern:?} must name files, not paths"
            )));
        }

        let chars: Vec<char> = pattern.chars().collect();
        let mut regex = String::with_capacity(pattern.len() + 8);
        regex.push_str("^(?s:");
        let mut i = 0;
        while i < chars.len() {
            match chars[i] {
                '*' => regex.push_str(".*"),
                '?' => regex.push('.'),
                '[' => match bracket_class(&chars[i + 1..]) {
                    Some((class, consumed)) => {
                        regex.push_str(&class);
                        i += consumed;
                    }
                    None => regex.push_str(r"\["),
                },
                other => regex.push_str(&regex::escape(other.encode_utf8(&mut [0u8; 4]))),
            }
            i += 1;
        }
        regex.push_str(")$");

        let matcher = Regex::new(&regex).map_err(|e| {
            CasefileError::Configuration(format!("invalid file pattern {pattern:?}: {e}"))
        })?;

        Ok(Self {
            source: pattern.to_string(),
            matcher,
        })
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.matcher.is_match(file_name)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Translate the class that follows a `[`. Returns the regex class and how many
/// characters it used, closing `]` included, or `None` when the class is never
/// closed and the `[` is literal.
fn bracket_class(rest: &[char]) -> Option<(String, usize)> {
    let negated = rest.first() == Some(&'!');
    let mut start = usize::from(negated);
    // a leading `]` is a member, not the end of the class
    if rest.get(start) == Some(&']') {
        start += 1;
    }
    let close = start + rest[start..].iter().position(|&c| c == ']')?;

    let mut class = String::from("[");
    if negated {
        class.push('^');
    }
    for &c in &rest[usize::from(negated)..close] {
        if matches!(c, '\\' | '[' | ']' | '^' | '&' | '~') {
            class.push('\\');
        }
        class.push(c);
    }
    class.push(']');
    Some((class, close + 1))
}

impl Default for GlobPattern {
    fn default() -> Self {
        Self {
            source: "*.json".to_string(),
            matcher: Regex::new(r"^(?s:.*\.json)$").unwrap(),
        }
    }
}

/// List the regular files directly inside `dir` whose names match `pattern`,
/// sorted by path.
pub fn discover_files(dir: impl AsRef<Path>, pattern: &GlobPattern) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(CasefileError::Discovery(format!(
            "Directory {} does not exist",
            dir.display()
        )));
    }

    let entries = fs::read_dir(dir).map_err(|e| {
        CasefileError::Discovery(format!("Failed to read directory {}: {}", dir.display(), e))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matched = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| pattern.matches(name));
        if matched {
            files.push(path);
        }
    }

    files.sort();
    tracing::debug!(
        dir = %dir.display(),
        pattern = pattern.as_str(),
        count = files.len(),
        "discovered record files"
    );
    Ok(files)
}
