use crate::token::{all_tokens, Token, TokenTable};
use log::debug;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CodecError {
    #[error("input text is empty")]
    EmptyInput,

    #[error("encoder produced no tokens")]
    NoTokensProduced,

    #[error("encoder produced tokens missing from the table: {0:?}")]
    InvalidTokenProduced(Vec<String>),

    #[error("no valid tokens in input")]
    NoValidTokens,

    #[error("decoder produced no output")]
    DecodeProducedNoOutput,

    #[error("token syntax survived decoding: {0:?}")]
    ResidualMarkers(Vec<String>),
}

/// Pure forward transform: maps each table-covered unit of `text` to its
/// token, longest unit first. Units with no table entry are skipped.
pub fn encode_units(text: &str, table: &TokenTable) -> String {
    let mut out = String::new();
    let mut rest = text;
    while !rest.is_empty() {
        match table.longest_unit_prefix(rest) {
            Some((unit, token)) => {
                out.push_str(token);
                rest = &rest[unit.len()..];
            }
            None => {
                let mut chars = rest.chars();
                chars.next();
                rest = chars.as_str();
            }
        }
    }
    out
}

/// Pure inverse transform: maps each table token back to its decoded unit,
/// joined with no separator. Tokens absent from the table are skipped.
pub fn decode_units(tokens: &[Token], table: &TokenTable) -> String {
    tokens
        .iter()
        .filter_map(|t| table.unit_for(t))
        .collect()
}

/// Validating wrapper around the pure transform pair. The pure encoder and
/// decoder are not trusted silently: page-text extraction from a rendered
/// document is lossy, so each direction re-checks its own output.
pub struct Codec<'a> {
    table: &'a TokenTable,
}

impl<'a> Codec<'a> {
    pub fn new(table: &'a TokenTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &TokenTable {
        self.table
    }

    /// Encodes trimmed prose into a token string, then re-scans the result:
    /// zero tokens or any out-of-table token is a failure, not a warning.
    pub fn encode(&self, text: &str) -> Result<String, CodecError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CodecError::EmptyInput);
        }

        let encoded = encode_units(text, self.table);
        let produced = all_tokens(&encoded);
        if produced.is_empty() {
            return Err(CodecError::NoTokensProduced);
        }
        let invalid: Vec<String> = produced
            .iter()
            .filter(|t| !self.table.contains(t))
            .map(|t| t.as_str().to_string())
            .collect();
        if !invalid.is_empty() {
            return Err(CodecError::InvalidTokenProduced(invalid));
        }

        Ok(encoded)
    }

    /// Extracts grammar matches from `text`, drops the ones the table does
    /// not know (stray or corrupted markers are tolerated), and decodes the
    /// survivors. Decoding must be total: no token syntax may remain in the
    /// output.
    pub fn decode(&self, text: &str) -> Result<String, CodecError> {
        let scanned = all_tokens(text);
        let (valid, dropped): (Vec<Token>, Vec<Token>) = scanned
            .into_iter()
            .partition(|t| self.table.contains(t));

        for token in &dropped {
            debug!("dropping unknown token: {token}");
        }
        if valid.is_empty() {
            return Err(CodecError::NoValidTokens);
        }

        let decoded = decode_units(&valid, self.table);
        if decoded.is_empty() {
            return Err(CodecError::DecodeProducedNoOutput);
        }
        let residual: Vec<String> = all_tokens(&decoded)
            .iter()
            .map(|t| t.as_str().to_string())
            .collect();
        if !residual.is_empty() {
            return Err(CodecError::ResidualMarkers(residual));
        }

        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_table() -> TokenTable {
        TokenTable::from_pairs([("[^a]", "hello"), ("[^b]", "world")]).unwrap()
    }

    #[test]
    fn test_encode_word_table() {
        let table = word_table();
        let codec = Codec::new(&table);
        assert_eq!(codec.encode("hello world").unwrap(), "[^a][^b]");
    }

    #[test]
    fn test_encode_rejects_empty_input() {
        let table = word_table();
        let codec = Codec::new(&table);
        assert_eq!(codec.encode("   \n  "), Err(CodecError::EmptyInput));
    }

    #[test]
    fn test_encode_rejects_uncovered_text() {
        let table = word_table();
        let codec = Codec::new(&table);
        assert_eq!(codec.encode("goodbye"), Err(CodecError::NoTokensProduced));
    }

    #[test]
    fn test_decode_joins_units() {
        let table = word_table();
        let codec = Codec::new(&table);
        assert_eq!(codec.decode("[^a][^b]").unwrap(), "helloworld");
    }

    #[test]
    fn test_decode_tolerates_unknown_tokens() {
        let table = word_table();
        let codec = Codec::new(&table);
        // Stray marker from lossy extraction is dropped, not fatal.
        assert_eq!(codec.decode("[^a][garbage][^b]").unwrap(), "helloworld");
    }

    #[test]
    fn test_decode_rejects_tokenless_text() {
        let table = word_table();
        let codec = Codec::new(&table);
        assert_eq!(codec.decode("plain prose"), Err(CodecError::NoValidTokens));
    }

    #[test]
    fn test_decode_twice_is_not_a_silent_noop() {
        let table = TokenTable::standard();
        let codec = Codec::new(table);
        let decoded = codec.decode(&codec.encode("some text").unwrap()).unwrap();
        // Decoded prose has no tokens left, so a second decode must fail.
        assert_eq!(codec.decode(&decoded), Err(CodecError::NoValidTokens));
    }

    #[test]
    fn test_decode_rejects_residual_markers() {
        // A table whose unit is itself token-shaped: decoding must notice
        // that token syntax survived.
        let table = TokenTable::from_pairs([("[^a]", "[^x]")]).unwrap();
        let codec = Codec::new(&table);
        assert_eq!(
            codec.decode("[^a]"),
            Err(CodecError::ResidualMarkers(vec!["[^x]".into()]))
        );
    }

    #[test]
    fn test_round_trip_standard_table() {
        let codec = Codec::new(TokenTable::standard());
        let original = "The quick brown fox jumps over 13 lazy dogs!";
        let encoded = codec.encode(original).unwrap();
        assert_ne!(encoded, original);
        assert_eq!(codec.decode(&encoded).unwrap(), original);
    }

    #[test]
    fn test_round_trip_skips_uncovered_chars() {
        let codec = Codec::new(TokenTable::standard());
        // `~` has no table entry; every covered unit survives in order.
        let encoded = codec.encode("a~b").unwrap();
        assert_eq!(codec.decode(&encoded).unwrap(), "ab");
    }

    #[test]
    fn test_encode_units_pure() {
        let table = word_table();
        assert_eq!(encode_units("hello world", &table), "[^a][^b]");
        assert_eq!(encode_units("nothing known", &table), "");
    }
}
