//! Filter Expression
//!
//! A JQL string on its way to the issue store. The text is treated as
//! untrusted: the store's parser is the only judge of validity. Before
//! execution every filter is given a project scope and the canonical
//! ordering via `with_guards`.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Ordering appended to every executed filter
pub const CANONICAL_ORDERING: &str = "ORDER BY priority DESC, updated DESC";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FilterExpression(String);

fn order_by_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\border\s+by\b").ok())
        .as_ref()
}

impl FilterExpression {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Split into the condition part and the ORDER BY part (if any).
    fn split_ordering(&self) -> (&str, Option<&str>) {
        match order_by_regex().and_then(|re| re.find(&self.0)) {
            Some(m) => (self.0[..m.start()].trim(), Some(self.0[m.start()..].trim())),
            None => (self.0.trim(), None),
        }
    }

    /// Condition part, without ordering
    pub fn condition(&self) -> &str {
        self.split_ordering().0
    }

    /// Whether the condition scopes to `project_key` alone. The key must
    /// match whole, so `SCRUMX` does not scope to `SCRUM`.
    pub fn has_project_scope(&self, project_key: &str) -> bool {
        let key = regex::escape(project_key);
        let pattern = format!(
            r#"(?i)\bproject\s*(?:=\s*"?{key}(?:"|\b)|in\s*\(\s*"?{key}"?\s*\))"#,
            key = key
        );
        match Regex::new(&pattern) {
            Ok(re) => re.is_match(self.condition()),
            Err(_) => self
                .condition()
                .to_lowercase()
                .contains(&format!("project = \"{}\"", project_key.to_lowercase())),
        }
    }

    pub fn has_canonical_ordering(&self) -> bool {
        matches!(self.split_ordering().1, Some(order) if normalize_ws(order).eq_ignore_ascii_case(CANONICAL_ORDERING))
    }

    /// Remove every occurrence of a clause, with the `AND` joining it to its
    /// neighbour. `clause` is a regex fragment matched case-insensitively.
    ///
    /// Only `AND` joins are handled; a clause inside parentheses or joined
    /// by `OR` is removed bare and may leave an unbalanced expression.
    pub fn without_clause(&self, clause: &str) -> FilterExpression {
        let candidates = [
            format!(r"(?i)\s+AND\s+{}", clause),
            format!(r"(?i){}\s+AND\s+", clause),
            format!(r"(?i){}", clause),
        ];

        for pattern in &candidates {
            if let Ok(re) = Regex::new(pattern) {
                if re.is_match(&self.0) {
                    return FilterExpression::new(re.replace_all(&self.0, ""));
                }
            }
        }
        self.clone()
    }

    /// Return a filter scoped to `project_key` and ending with the
    /// canonical ordering. Any other ordering is replaced.
    ///
    /// A condition with a top-level `OR` is always parenthesized behind a
    /// fresh project scope, even when one branch already names the project.
    pub fn with_guards(&self, project_key: &str) -> FilterExpression {
        let condition = self.condition();
        let scope = format!("project = \"{}\"", project_key);

        let scoped = if condition.is_empty() {
            scope
        } else if has_top_level_or(condition) {
            format!("{} AND ({})", scope, condition)
        } else if self.has_project_scope(project_key) {
            condition.to_string()
        } else {
            format!("{} AND {}", scope, condition)
        };

        FilterExpression(format!("{} {}", scoped, CANONICAL_ORDERING))
    }
}

/// Whether `condition` has an `OR` outside parentheses and quotes.
fn has_top_level_or(condition: &str) -> bool {
    let mut depth = 0_i32;
    let mut quote: Option<char> = None;
    let mut word = String::new();

    for c in condition.chars().chain(std::iter::once(' ')) {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        if c.is_alphanumeric() || c == '_' {
            word.push(c);
            continue;
        }
        if depth == 0 && word.eq_ignore_ascii_case("or") {
            return true;
        }
        word.clear();
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
    }
    false
}

fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FilterExpression {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}
