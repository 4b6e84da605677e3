//! Route matching logic.
//!
//! # Responsibilities
//! - Normalize an incoming location (strip `/`, `#`, trailing slash)
//! - Walk a compiled pattern against the path, backtracking over captures
//! - Pull query captures out of the query string
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Captures are returned positionally; absent optional captures are `None`
//! - Path captures are percent-decoded, raw text is kept if decoding fails
//! - Patterns without query terms ignore the query string entirely

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

use crate::routing::pattern::{capture_count, Pattern, QueryValue, Token};

/// Positional capture values produced by a successful match.
pub type Captures = Vec<Option<String>>;

/// A normalized navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<'a> {
    path: &'a str,
    query: Option<&'a str>,
}

impl<'a> Location<'a> {
    /// Split and normalize a raw location such as `/snap/42/?tab=1`.
    pub fn parse(raw: &'a str) -> Self {
        let raw = raw.trim_start_matches(['/', '#']);
        let raw = raw.split_once('#').map_or(raw, |(before, _)| before);
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (raw, None),
        };
        Self {
            path: path.trim_end_matches('/'),
            query,
        }
    }

    pub fn path(&self) -> &'a str {
        self.path
    }

    pub fn query(&self) -> Option<&'a str> {
        self.query
    }
}

/// Match a location against a pattern, returning its captures on success.
pub fn capture(pattern: &Pattern, location: &Location<'_>) -> Option<Captures> {
    let mut raw = Vec::with_capacity(pattern.captures().len());
    if !match_tokens(&pattern.path, &[], location.path, &mut raw) {
        return None;
    }

    let mut captures: Captures = raw
        .into_iter()
        .map(|value| value.map(|v| decode(v).into_owned()))
        .collect();

    if pattern.query.is_empty() {
        return Some(captures);
    }

    let pairs: Vec<(Cow<'_, str>, Cow<'_, str>)> = location
        .query
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).collect())
        .unwrap_or_default();

    for term in &pattern.query {
        match &term.value {
            QueryValue::Capture(_) => {
                let value = pairs
                    .iter()
                    .find(|(key, _)| key == &term.key)
                    .map(|(_, value)| value.to_string());
                captures.push(value);
            }
            QueryValue::Literal(expected) => {
                let present = pairs
                    .iter()
                    .any(|(key, value)| key == &term.key && value == expected);
                if !present {
                    return None;
                }
            }
        }
    }

    Some(captures)
}

/// Returns true when `tokens` followed by every list in `rest` consumes
/// `input` exactly. On failure `caps` is left as it was on entry.
fn match_tokens<'p, 'i>(
    tokens: &'p [Token],
    rest: &[&'p [Token]],
    input: &'i str,
    caps: &mut Vec<Option<&'i str>>,
) -> bool {
    let Some((token, tail)) = tokens.split_first() else {
        return match rest.split_first() {
            Some((next, outer)) => match_tokens(next, outer, input, caps),
            None => input.is_empty(),
        };
    };

    match token {
        Token::Literal(text) => input
            .strip_prefix(text.as_str())
            .is_some_and(|remaining| match_tokens(tail, rest, remaining, caps)),
        Token::Capture(_) => {
            let limit = input.find('/').unwrap_or(input.len());
            try_spans(1, limit, tail, rest, input, caps)
        }
        Token::Splat(_) => try_spans(0, input.len(), tail, rest, input, caps),
        Token::Optional(inner) => {
            let mark = caps.len();

            let mut continuation = Vec::with_capacity(rest.len() + 1);
            continuation.push(tail);
            continuation.extend_from_slice(rest);
            if match_tokens(inner, &continuation, input, caps) {
                return true;
            }
            caps.truncate(mark);

            caps.extend(std::iter::repeat(None).take(capture_count(inner)));
            if match_tokens(tail, rest, input, caps) {
                return true;
            }
            caps.truncate(mark);
            false
        }
    }
}

/// Try capture spans from longest to shortest.
fn try_spans<'p, 'i>(
    min: usize,
    max: usize,
    tail: &'p [Token],
    rest: &[&'p [Token]],
    input: &'i str,
    caps: &mut Vec<Option<&'i str>>,
) -> bool {
    if max < min {
        return false;
    }
    for end in (min..=max).rev() {
        if !input.is_char_boundary(end) {
            continue;
        }
        caps.push(Some(&input[..end]));
        if match_tokens(tail, rest, &input[end..], caps) {
            return true;
        }
        caps.pop();
    }
    false
}

fn decode(raw: &str) -> Cow<'_, str> {
    percent_decode_str(raw)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(pattern: &str, location: &str) -> Option<Captures> {
        let pattern = Pattern::parse(pattern).unwrap();
        capture(&pattern, &Location::parse(location))
    }

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_location_normalization() {
        let loc = Location::parse("/snap/42/?tab=files");
        assert_eq!(loc.path(), "snap/42");
        assert_eq!(loc.query(), Some("tab=files"));

        assert_eq!(Location::parse("#store").path(), "store");
        assert_eq!(Location::parse("/").path(), "");
        assert_eq!(Location::parse("/store#top").path(), "store");
        assert_eq!(Location::parse("/store#top").query(), None);
    }

    #[test]
    fn test_literal_match() {
        assert_eq!(run("/store", "/store"), Some(vec![]));
        assert_eq!(run("/store", "/store/"), Some(vec![]));
        assert_eq!(run("/store", "/Store"), None);
        assert_eq!(run("/store", "/store/extra"), None);
        assert_eq!(run("/", "/"), Some(vec![]));
        assert_eq!(run("/", "/store"), None);
    }

    #[test]
    fn test_literal_ignores_query_string() {
        assert_eq!(run("/store", "/store?page=2"), Some(vec![]));
    }

    #[test]
    fn test_optional_segment() {
        let pattern = "/snap/:id/(:section)";
        assert_eq!(run(pattern, "/snap/42"), Some(vec![some("42"), None]));
        assert_eq!(run(pattern, "/snap/42/"), Some(vec![some("42"), None]));
        assert_eq!(
            run(pattern, "/snap/42/files"),
            Some(vec![some("42"), some("files")])
        );
        assert_eq!(run(pattern, "/snap"), None);
        assert_eq!(run(pattern, "/snap/42/files/more"), None);
    }

    #[test]
    fn test_nested_optional_groups() {
        let pattern = "docs(/:section(/:page))";
        assert_eq!(run(pattern, "docs"), Some(vec![None, None]));
        assert_eq!(run(pattern, "docs/intro"), Some(vec![some("intro"), None]));
        assert_eq!(
            run(pattern, "docs/intro/2"),
            Some(vec![some("intro"), some("2")])
        );
    }

    #[test]
    fn test_capture_inside_segment() {
        assert_eq!(
            run("files/:name.:ext", "files/archive.tar.gz"),
            Some(vec![some("archive.tar"), some("gz")])
        );
    }

    #[test]
    fn test_splat() {
        assert_eq!(
            run("assets/*path", "assets/img/logo.png"),
            Some(vec![some("img/logo.png")])
        );
        assert_eq!(run("assets/*path", "assets/"), None);
        assert_eq!(run("assets(/*path)", "assets"), Some(vec![None]));
    }

    #[test]
    fn test_percent_decoding() {
        assert_eq!(
            run("/snap/:id", "/snap/hello%20world"),
            Some(vec![some("hello world")])
        );
        assert_eq!(run("/snap/:id", "/snap/%FF"), Some(vec![some("%FF")]));
    }

    #[test]
    fn test_query_capture() {
        let pattern = "/search?q=:query";
        assert_eq!(run(pattern, "/search?q=hello"), Some(vec![some("hello")]));
        assert_eq!(
            run(pattern, "/search?type=app&q=hello+world&q=second"),
            Some(vec![some("hello world")])
        );
        assert_eq!(run(pattern, "/search"), Some(vec![None]));
        assert_eq!(run(pattern, "/search?other=1"), Some(vec![None]));
        assert_eq!(run(pattern, "/searching?q=x"), None);
    }

    #[test]
    fn test_query_literal_must_be_present() {
        let pattern = "/search?scope=store&q=:query";
        assert_eq!(
            run(pattern, "/search?q=a&scope=store"),
            Some(vec![some("a")])
        );
        assert_eq!(run(pattern, "/search?q=a"), None);
        assert_eq!(run(pattern, "/search?q=a&scope=system"), None);
    }
}
