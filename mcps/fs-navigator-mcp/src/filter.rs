//! Entry-name exclusion
//!
//! Rules apply to bare entry names, never to paths, so a wildcard can't reach
//! across a separator.

use glob::Pattern;

use crate::types::{NavError, NavResult};

#[derive(Debug, Clone)]
enum Rule {
    Exact(String),
    Wildcard(Pattern),
}

/// Configured exclusion patterns plus the hidden-file rule
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    rules: Vec<Rule>,
}

impl ExclusionFilter {
    /// Patterns containing `*` or `?` are wildcards; anything else must match
    /// the entry name exactly. Blank patterns are ignored.
    pub fn new(patterns: &[String]) -> NavResult<Self> {
        let rules = patterns
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(|p| {
                if p.contains(['*', '?']) {
                    Pattern::new(p).map(Rule::Wildcard).map_err(|e| {
                        NavError::Config(format!("Invalid exclude pattern '{}': {}", p, e))
                    })
                } else {
                    Ok(Rule::Exact(p.to_string()))
                }
            })
            .collect::<NavResult<Vec<_>>>()?;

        Ok(Self { rules })
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| match rule {
            Rule::Exact(exact) => exact == name,
            Rule::Wildcard(pattern) => pattern.matches(name),
        })
    }

    /// Whether an entry called `name` may be shown at all.
    ///
    /// Exclusion wins over `include_hidden`.
    pub fn admits(&self, name: &str, include_hidden: bool) -> bool {
        (include_hidden || !is_hidden(name)) && !self.is_excluded(name)
    }
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
