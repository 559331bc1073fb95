use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

lazy_static! {
    /// Bracket grammar: `[`, optional sigil, one or more inner characters, `]`.
    static ref TOKEN_PATTERN: Regex =
        Regex::new(r"\[[\^\*\-\+]?[0-9A-Za-z\-_]+\]").expect("token pattern is valid");
    static ref TOKEN_EXACT: Regex =
        Regex::new(r"^\[[\^\*\-\+]?[0-9A-Za-z\-_]+\]$").expect("token pattern is valid");
}

/// The sigil prefixes that mark a text as token-bearing.
pub const SIGIL_MARKERS: [&str; 4] = ["[^", "[*", "[-", "[+"];

/// A single bracketed code. Equality is exact string match; a `Token` may or
/// may not be present in any given [`TokenTable`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True iff `s` is a complete match of the bracket grammar.
    pub fn matches_grammar(s: &str) -> bool {
        TOKEN_EXACT.is_match(s)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scans `text` left to right and yields every non-overlapping grammar match,
/// in order of appearance. No table filtering happens here: callers that only
/// want known tokens must filter against a [`TokenTable`] themselves, because
/// malformed-but-bracket-shaped and well-formed-but-unknown substrings are
/// reported differently upstream.
pub fn all_tokens(text: &str) -> Vec<Token> {
    TOKEN_PATTERN
        .find_iter(text)
        .map(|m| Token(m.as_str().to_string()))
        .collect()
}

/// True iff `text` contains any bracket-sigil substring. This is the mode
/// discriminator between token-bearing text and plain prose.
pub fn contains_sigil_marker(text: &str) -> bool {
    SIGIL_MARKERS.iter().any(|m| text.contains(m))
}

#[derive(Error, Debug, PartialEq)]
pub enum TableError {
    #[error("token does not match the bracket grammar: {0}")]
    BadGrammar(String),

    #[error("duplicate token in table: {0}")]
    DuplicateToken(String),

    #[error("duplicate decoded unit in table: {0}")]
    DuplicateUnit(String),

    #[error("decoded unit is empty for token: {0}")]
    EmptyUnit(String),
}

/// Immutable bijection between tokens and decoded text units. Built once,
/// never mutated, safe to share across threads.
#[derive(Debug, Clone)]
pub struct TokenTable {
    forward: HashMap<String, String>,
    inverse: HashMap<String, String>,
    units_by_length: Vec<String>,
}

impl TokenTable {
    /// Builds a table from `(token, unit)` pairs, rejecting grammar violations
    /// and anything that would break the bijection.
    pub fn from_pairs<I, S, U>(pairs: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (S, U)>,
        S: AsRef<str>,
        U: AsRef<str>,
    {
        let mut forward = HashMap::new();
        let mut inverse = HashMap::new();

        for (token, unit) in pairs {
            let token = token.as_ref();
            let unit = unit.as_ref();
            if !Token::matches_grammar(token) {
                return Err(TableError::BadGrammar(token.to_string()));
            }
            if unit.is_empty() {
                return Err(TableError::EmptyUnit(token.to_string()));
            }
            if forward.contains_key(token) {
                return Err(TableError::DuplicateToken(token.to_string()));
            }
            if inverse.contains_key(unit) {
                return Err(TableError::DuplicateUnit(unit.to_string()));
            }
            forward.insert(token.to_string(), unit.to_string());
            inverse.insert(unit.to_string(), token.to_string());
        }

        // Longest units first, so encoding prefers the longest match.
        let mut units_by_length: Vec<String> = inverse.keys().cloned().collect();
        units_by_length.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Ok(Self {
            forward,
            inverse,
            units_by_length,
        })
    }

    /// The process-wide standard B-Cryptic table.
    pub fn standard() -> &'static TokenTable {
        &STANDARD_TABLE
    }

    /// True iff `s` matches the bracket grammar and is a key of this table.
    pub fn is_valid_token(&self, s: &str) -> bool {
        Token::matches_grammar(s) && self.forward.contains_key(s)
    }

    pub fn contains(&self, token: &Token) -> bool {
        self.forward.contains_key(token.as_str())
    }

    /// The decoded unit for `token`, if present.
    pub fn unit_for(&self, token: &Token) -> Option<&str> {
        self.forward.get(token.as_str()).map(String::as_str)
    }

    /// The token whose unit is the longest prefix of `text`, if any.
    pub fn longest_unit_prefix(&self, text: &str) -> Option<(&str, &str)> {
        for unit in &self.units_by_length {
            if text.starts_with(unit.as_str()) {
                let token = self.inverse.get(unit).map(String::as_str)?;
                return Some((unit.as_str(), token));
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

fn standard_pairs() -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    // Sigil per character class: `^` lowercase, `*` uppercase, `-` digits,
    // `+` space and punctuation.
    for c in 'a'..='z' {
        pairs.push((format!("[^{c}]"), c.to_string()));
    }
    for c in 'A'..='Z' {
        pairs.push((format!("[*{}]", c.to_ascii_lowercase()), c.to_string()));
    }
    for c in '0'..='9' {
        pairs.push((format!("[-{c}]"), c.to_string()));
    }

    let punctuation: [(&str, char); 17] = [
        ("sp", ' '),
        ("nl", '\n'),
        ("dot", '.'),
        ("com", ','),
        ("exc", '!'),
        ("que", '?'),
        ("sem", ';'),
        ("col", ':'),
        ("apo", '\''),
        ("quo", '"'),
        ("hyp", '-'),
        ("usc", '_'),
        ("sla", '/'),
        ("amp", '&'),
        ("at", '@'),
        ("pct", '%'),
        ("hsh", '#'),
    ];
    for (name, c) in punctuation {
        pairs.push((format!("[+{name}]"), c.to_string()));
    }

    pairs
}

lazy_static! {
    static ref STANDARD_TABLE: TokenTable =
        TokenTable::from_pairs(standard_pairs()).expect("standard table is a valid bijection");
}
