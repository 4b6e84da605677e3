//! Route pattern compilation.
//!
//! # Syntax
//! - `store` literal text, matched verbatim
//! - `:id` named capture, one or more characters up to the next `/`
//! - `*rest` splat, zero or more characters including `/`
//! - `(/:section)` optional group, may nest
//! - `search?q=:query` query terms after a single `?`
//!
//! # Design Decisions
//! - Patterns are compiled once when the table is built
//! - A leading `/` or `#` is ignored so `/store` and `store` are equivalent
//! - A `/` directly before an optional group is folded into the group,
//!   so `snap/:id/(:section)` also matches `snap/42`
//! - No regex; matching is a small backtracking walk (see `matcher.rs`)

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

/// Reasons a pattern fails to compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("unclosed optional group")]
    UnclosedGroup,

    #[error("unexpected ')' without matching '('")]
    UnexpectedClose,

    #[error("capture at offset {0} has no name")]
    EmptyCaptureName(usize),

    #[error("capture name '{0}' is used more than once")]
    DuplicateCapture(String),

    #[error("pattern contains more than one '?'")]
    MultipleQuery,

    #[error("query term '{0}' is not of the form key=value")]
    MalformedQueryTerm(String),
}

/// A single element of the path part of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Literal(String),
    Capture(String),
    Splat(String),
    Optional(Vec<Token>),
}

/// Right-hand side of a `key=value` query term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum QueryValue {
    Capture(String),
    Literal(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QueryTerm {
    pub(crate) key: String,
    pub(crate) value: QueryValue,
}

/// A compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    pub(crate) path: Vec<Token>,
    pub(crate) query: Vec<QueryTerm>,
    captures: Vec<String>,
}

impl Pattern {
    /// Compile a pattern string.
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        let trimmed = source.strip_prefix('#').unwrap_or(source);
        let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);

        let (path_part, query_part) = match trimmed.split_once('?') {
            Some((path, query)) => {
                if query.contains('?') {
                    return Err(PatternError::MultipleQuery);
                }
                (path, Some(query))
            }
            None => (trimmed, None),
        };

        let mut parser = PathParser {
            chars: path_part.chars().peekable(),
            offset: source.len() - trimmed.len(),
        };
        let path = parser.sequence(0)?;
        let query = match query_part {
            Some(query) => parse_query(query)?,
            None => Vec::new(),
        };

        let mut captures = Vec::new();
        collect_captures(&path, &mut captures);
        for term in &query {
            if let QueryValue::Capture(name) = &term.value {
                captures.push(name.clone());
            }
        }
        for (i, name) in captures.iter().enumerate() {
            if captures[..i].contains(name) {
                return Err(PatternError::DuplicateCapture(name.clone()));
            }
        }

        Ok(Self {
            source: source.to_string(),
            path,
            query,
            captures,
        })
    }

    /// The pattern text as written in the route table.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Capture names in positional order (path captures, then query captures).
    pub fn captures(&self) -> &[String] {
        &self.captures
    }

    /// True when the pattern has no captures at all.
    pub fn is_static(&self) -> bool {
        self.captures.is_empty() && self.query.is_empty()
    }

    pub fn has_query(&self) -> bool {
        !self.query.is_empty()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

struct PathParser<'a> {
    chars: Peekable<Chars<'a>>,
    offset: usize,
}

impl PathParser<'_> {
    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.offset += c.len_utf8();
        Some(c)
    }

    fn sequence(&mut self, depth: usize) -> Result<Vec<Token>, PatternError> {
        let mut tokens = Vec::new();
        let mut literal = String::new();

        loop {
            match self.chars.peek().copied() {
                None => {
                    if depth > 0 {
                        return Err(PatternError::UnclosedGroup);
                    }
                    break;
                }
                Some(')') => {
                    if depth == 0 {
                        return Err(PatternError::UnexpectedClose);
                    }
                    self.bump();
                    break;
                }
                Some('(') => {
                    self.bump();
                    let folded_slash = literal.ends_with('/');
                    if folded_slash {
                        literal.pop();
                    }
                    flush(&mut literal, &mut tokens);

                    let mut inner = self.sequence(depth + 1)?;
                    if folded_slash {
                        match inner.first_mut() {
                            Some(Token::Literal(text)) => text.insert(0, '/'),
                            _ => inner.insert(0, Token::Literal("/".to_string())),
                        }
                    }
                    tokens.push(Token::Optional(inner));
                }
                Some(marker @ (':' | '*')) => {
                    let at = self.offset;
                    self.bump();
                    let name = self.word();
                    if name.is_empty() {
                        return Err(PatternError::EmptyCaptureName(at));
                    }
                    flush(&mut literal, &mut tokens);
                    tokens.push(if marker == ':' {
                        Token::Capture(name)
                    } else {
                        Token::Splat(name)
                    });
                }
                Some(c) => {
                    self.bump();
                    literal.push(c);
                }
            }
        }

        flush(&mut literal, &mut tokens);
        Ok(tokens)
    }

    fn word(&mut self) -> String {
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if !is_word_char(c) {
                break;
            }
            name.push(c);
            self.bump();
        }
        name
    }
}

fn flush(literal: &mut String, tokens: &mut Vec<Token>) {
    if !literal.is_empty() {
        tokens.push(Token::Literal(std::mem::take(literal)));
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn parse_query(query: &str) -> Result<Vec<QueryTerm>, PatternError> {
    let mut terms: Vec<QueryTerm> = Vec::new();
    for term in query.split('&') {
        let malformed = || PatternError::MalformedQueryTerm(term.to_string());
        let (key, value) = term.split_once('=').ok_or_else(malformed)?;
        if key.is_empty() || terms.iter().any(|t| t.key == key) {
            return Err(malformed());
        }
        let value = match value.strip_prefix(':') {
            Some(name) if !name.is_empty() && name.chars().all(is_word_char) => {
                QueryValue::Capture(name.to_string())
            }
            Some(_) => return Err(malformed()),
            None => QueryValue::Literal(value.to_string()),
        };
        terms.push(QueryTerm {
            key: key.to_string(),
            value,
        });
    }
    Ok(terms)
}

fn collect_captures(tokens: &[Token], out: &mut Vec<String>) {
    for token in tokens {
        match token {
            Token::Capture(name) | Token::Splat(name) => out.push(name.clone()),
            Token::Optional(inner) => collect_captures(inner, out),
            Token::Literal(_) => {}
        }
    }
}

/// Number of captures inside a token list, optional groups included.
pub(crate) fn capture_count(tokens: &[Token]) -> usize {
    tokens
        .iter()
        .map(|token| match token {
            Token::Capture(_) | Token::Splat(_) => 1,
            Token::Optional(inner) => capture_count(inner),
            Token::Literal(_) => 0,
        })
        .sum()
}
