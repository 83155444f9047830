//! Request matchers used to route requests to filters, entry points and
//! authorization rules.

use regex::Regex;

use crate::http_abstraction::AuthRequest;

/// Decides whether a request belongs to some rule.
pub trait RequestMatcher: Send + Sync {
    fn matches(&self, request: &dyn AuthRequest) -> bool;
}

/// Matches every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyRequestMatcher;

impl RequestMatcher for AnyRequestMatcher {
    fn matches(&self, _request: &dyn AuthRequest) -> bool {
        true
    }
}

/// Ant-style path matcher with an optional method restriction.
///
/// `?` matches one character, `*` zero or more characters within a segment and
/// `**` any number of segments. Patterns without wildcards match the path
/// exactly.
#[derive(Debug, Clone)]
pub struct PathRequestMatcher {
    pattern: String,
    regex: Regex,
    method: Option<String>,
}

impl PathRequestMatcher {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        // Every literal is escaped, so the generated expression always compiles.
        let regex = Regex::new(&ant_to_regex(&pattern)).expect("escaped ant pattern is valid");
        Self {
            pattern,
            regex,
            method: None,
        }
    }

    pub fn with_method(pattern: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            ..Self::new(pattern)
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl RequestMatcher for PathRequestMatcher {
    fn matches(&self, request: &dyn AuthRequest) -> bool {
        let method_matches = self
            .method
            .as_deref()
            .is_none_or(|method| method.eq_ignore_ascii_case(request.method()));

        method_matches && self.regex.is_match(request.path())
    }
}

fn ant_to_regex(pattern: &str) -> String {
    let mut expression = String::from("^");
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                if expression.ends_with('/') {
                    expression.pop();
                    expression.push_str("(?:/.*)?");
                } else {
                    expression.push_str(".*");
                }
            }
            '*' => expression.push_str("[^/]*"),
            '?' => expression.push_str("[^/]"),
            other => expression.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }

    expression.push('$');
    expression
}
