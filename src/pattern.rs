//! Path template compilation.
//!
//! A template is a normalized path in which any segment content may contain
//! `{name}` placeholders. Each placeholder matches one or more characters
//! from `[A-Za-z0-9_]` and never crosses a `/`. Everything else matches
//! literally, including characters that would be regex metacharacters.
//! Braces cannot be escaped, so a template can never match a literal `{`.
//!
//! Templates without placeholders skip the regex engine and compare by string
//! equality.

use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::error::PatternError;
use crate::params::Params;

const CAPTURE: &str = "([A-Za-z0-9_]+)";

// regex's own default compiled-size limit.
const SIZE_LIMIT: usize = 10 * (1 << 20);

#[derive(Clone)]
enum Matcher {
    Literal,
    Regex(Regex),
}

/// A compiled path template.
#[derive(Clone)]
pub struct PathPattern {
    template: String,
    placeholders: usize,
    matcher: Matcher,
}

impl PathPattern {
    /// Compiles `template` into a matcher anchored at both ends.
    ///
    /// ```rust
    /// use portico::PathPattern;
    ///
    /// let pattern = PathPattern::compile("/users/{id}/posts/{post}").unwrap();
    /// let params = pattern.captures("/users/7/posts/9").unwrap();
    /// assert_eq!(params.into_vec(), ["7", "9"]);
    /// assert!(pattern.captures("/users/7/posts").is_none());
    /// ```
    pub fn compile(template: &str) -> Result<Self, PatternError> {
        check_chars(template)?;

        let mut source = String::with_capacity(template.len() + 8);
        source.push('^');
        let mut placeholders = 0;
        let mut literal_start = 0;
        let mut chars = template.char_indices();

        while let Some((i, c)) = chars.next() {
            match c {
                '{' => {
                    let close = template[i..].find('}').map(|off| i + off)
                        .ok_or(PatternError::Unclosed(i))?;
                    let name = &template[i + 1..close];
                    if name.is_empty() {
                        return Err(PatternError::EmptyName(i));
                    }
                    if !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
                        return Err(PatternError::InvalidName { name: name.to_owned() });
                    }

                    source.push_str(&regex::escape(&template[literal_start..i]));
                    source.push_str(CAPTURE);
                    placeholders += 1;
                    literal_start = close + 1;

                    // Resume scanning after the closing brace.
                    for _ in chars.by_ref().take_while(|&(j, _)| j < close) {}
                }
                '}' => return Err(PatternError::Unmatched(i)),
                _ => {}
            }
        }

        let matcher = if placeholders == 0 {
            Matcher::Literal
        } else {
            source.push_str(&regex::escape(&template[literal_start..]));
            source.push('$');
            Matcher::Regex(build_regex(&source, SIZE_LIMIT)?)
        };

        Ok(Self { template: template.to_owned(), placeholders, matcher })
    }

    /// The template this pattern was compiled from.
    pub fn template(&self) -> &str { &self.template }

    pub fn placeholder_count(&self) -> usize { self.placeholders }

    pub fn is_literal(&self) -> bool { self.placeholders == 0 }

    /// Tests `path` and, on a full match, returns one value per placeholder.
    pub fn captures(&self, path: &str) -> Option<Params> {
        match &self.matcher {
            Matcher::Literal => (path == self.template).then(Params::default),
            Matcher::Regex(re) => {
                let caps = re.captures(path)?;
                let values = caps.iter()
                    .skip(1)
                    .map(|m| m.map_or_else(String::new, |m| m.as_str().to_owned()))
                    .collect();
                Some(Params::new(values))
            }
        }
    }
}

// Literal chunks are escaped, so only the size limit can reject `source`.
fn build_regex(source: &str, size_limit: usize) -> Result<Regex, PatternError> {
    RegexBuilder::new(source)
        .size_limit(size_limit)
        .build()
        .map_err(|e| PatternError::TooLarge(e.to_string()))
}

fn check_chars(template: &str) -> Result<(), PatternError> {
    match template.chars().find(|&c| c == '?' || c == '#' || c.is_whitespace() || c.is_control()) {
        Some(c) => Err(PatternError::InvalidChar(c)),
        None => Ok(()),
    }
}

impl fmt::Debug for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathPattern")
            .field("template", &self.template)
            .field("placeholders", &self.placeholders)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(template: &str, path: &str) -> Option<Vec<String>> {
        PathPattern::compile(template).unwrap().captures(path).map(Params::into_vec)
    }

    #[test]
    fn literal_templates_match_exactly() {
        assert_eq!(caps("/users", "/users"), Some(vec![]));
        assert_eq!(caps("/users", "/users/"), None);
        assert_eq!(caps("/users", "/users/1"), None);
        assert!(PathPattern::compile("/users").unwrap().is_literal());
    }

    #[test]
    fn placeholders_capture_in_template_order() {
        assert_eq!(
            caps("/a/{x}/b/{y}", "/a/one/b/two"),
            Some(vec!["one".to_owned(), "two".to_owned()])
        );
        assert_eq!(caps("/files/{name}.json", "/files/report.json"), Some(vec!["report".to_owned()]));
    }

    #[test]
    fn placeholders_never_span_slashes() {
        assert_eq!(caps("/users/{id}", "/users/42/x"), None);
        assert_eq!(caps("/users/{id}", "/users/"), None);
        assert_eq!(caps("/users/{id}", "/users/a-b"), None);
    }

    #[test]
    fn literal_metacharacters_are_not_wildcards() {
        assert_eq!(caps("/v1.0/{id}", "/v1x0/7"), None);
        assert_eq!(caps("/v1.0/{id}", "/v1.0/7"), Some(vec!["7".to_owned()]));
    }

    #[test]
    fn duplicate_names_are_positional() {
        assert_eq!(
            caps("/{id}/{id}", "/a/b"),
            Some(vec!["a".to_owned(), "b".to_owned()])
        );
    }

    #[test]
    fn malformed_templates_are_rejected() {
        assert_eq!(PathPattern::compile("/users/{id").unwrap_err(), PatternError::Unclosed(7));
        assert_eq!(PathPattern::compile("/users/id}").unwrap_err(), PatternError::Unmatched(9));
        assert_eq!(PathPattern::compile("/users/{}").unwrap_err(), PatternError::EmptyName(7));
        assert!(matches!(
            PathPattern::compile("/users/{user-id}").unwrap_err(),
            PatternError::InvalidName { .. }
        ));
        assert_eq!(PathPattern::compile("/users?x").unwrap_err(), PatternError::InvalidChar('?'));
    }

    #[test]
    fn oversized_matchers_report_their_own_error() {
        let err = build_regex("^/a/([A-Za-z0-9_]+)/b/([A-Za-z0-9_]+)$", 16).unwrap_err();
        assert!(matches!(err, PatternError::TooLarge(_)));
        assert!(err.to_string().starts_with("compiled route exceeds the matcher size limit"));
    }
}
