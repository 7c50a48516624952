//! Parser for literal-encoded identifier lists in URL path segments.
//!
//! Clients encode identifier collections using literal syntax, e.g.
//! `['a','b']` or `("x", "y")`. This module recovers them with a small
//! recursive-descent grammar limited to string/integer literals and
//! list/tuple nesting. It is deliberately NOT a general expression
//! evaluator: barewords, operators, and anything else outside the
//! grammar are rejected with a [`LiteralError`].

/// A parsed literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Str(String),
    Int(i64),
    List(Vec<Literal>),
}

/// Errors produced by the literal parser.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LiteralError {
    #[error("empty literal")]
    Empty,

    #[error("unexpected character '{found}' at position {pos}")]
    UnexpectedChar { found: char, pos: usize },

    #[error("unterminated string literal starting at position {pos}")]
    UnterminatedString { pos: usize },

    #[error("unterminated collection starting at position {pos}")]
    UnterminatedCollection { pos: usize },

    #[error("invalid integer literal at position {pos}")]
    InvalidInt { pos: usize },

    #[error("trailing input at position {pos}")]
    TrailingInput { pos: usize },

    #[error("nested collections are not valid identifier lists")]
    NestedCollection,
}

/// Parse a full literal value from `input`.
///
/// The entire input must be consumed; trailing non-whitespace input is
/// an error.
pub fn parse_literal(input: &str) -> Result<Literal, LiteralError> {
    let mut parser = Parser::new(input);
    parser.skip_whitespace();
    let value = parser.parse_value()?;
    parser.skip_whitespace();
    if let Some((pos, _)) = parser.peek() {
        return Err(LiteralError::TrailingInput { pos });
    }
    Ok(value)
}

/// Parse a literal-encoded identifier list into plain strings.
///
/// A list or tuple of scalars yields one string per element (integers
/// rendered in decimal). A bare scalar yields a single-element list.
/// Collections nested inside a collection are rejected.
pub fn parse_id_list(input: &str) -> Result<Vec<String>, LiteralError> {
    match parse_literal(input)? {
        Literal::Str(s) => Ok(vec![s]),
        Literal::Int(n) => Ok(vec![n.to_string()]),
        Literal::List(items) => items
            .into_iter()
            .map(|item| match item {
                Literal::Str(s) => Ok(s),
                Literal::Int(n) => Ok(n.to_string()),
                Literal::List(_) => Err(LiteralError::NestedCollection),
            })
            .collect(),
    }
}

/// Render an identifier list in the literal path-segment encoding,
/// e.g. `['a','b']`. Quotes and backslashes in identifiers are escaped
/// so the output always round-trips through [`parse_id_list`].
pub fn encode_id_list(ids: &[String]) -> String {
    let quoted: Vec<String> = ids
        .iter()
        .map(|id| format!("'{}'", id.replace('\\', "\\\\").replace('\'', "\\'")))
        .collect();
    format!("[{}]", quoted.join(","))
}

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().peekable(),
        }
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        self.chars.peek().copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some((_, c)) if c.is_ascii_whitespace()) {
            self.chars.next();
        }
    }

    fn parse_value(&mut self) -> Result<Literal, LiteralError> {
        match self.peek() {
            None => Err(LiteralError::Empty),
            Some((_, '[')) => self.parse_collection('[', ']'),
            Some((_, '(')) => self.parse_collection('(', ')'),
            Some((_, '\'')) => self.parse_string('\''),
            Some((_, '"')) => self.parse_string('"'),
            Some((_, c)) if c == '-' || c.is_ascii_digit() => self.parse_int(),
            Some((pos, found)) => Err(LiteralError::UnexpectedChar { found, pos }),
        }
    }

    fn parse_collection(&mut self, open: char, close: char) -> Result<Literal, LiteralError> {
        let (start, c) = self.chars.next().ok_or(LiteralError::Empty)?;
        debug_assert_eq!(c, open);

        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(LiteralError::UnterminatedCollection { pos: start }),
                Some((_, c)) if c == close => {
                    self.chars.next();
                    return Ok(Literal::List(items));
                }
                Some(_) => {
                    items.push(self.parse_value()?);
                    self.skip_whitespace();
                    match self.peek() {
                        Some((_, ',')) => {
                            self.chars.next();
                        }
                        Some((_, c)) if c == close => {
                            self.chars.next();
                            return Ok(Literal::List(items));
                        }
                        Some((pos, found)) => {
                            return Err(LiteralError::UnexpectedChar { found, pos })
                        }
                        None => return Err(LiteralError::UnterminatedCollection { pos: start }),
                    }
                }
            }
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<Literal, LiteralError> {
        let (start, _) = self.chars.next().ok_or(LiteralError::Empty)?;

        let mut out = String::new();
        loop {
            match self.chars.next() {
                None => return Err(LiteralError::UnterminatedString { pos: start }),
                Some((_, c)) if c == quote => return Ok(Literal::Str(out)),
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, escaped)) if escaped == quote || escaped == '\\' => {
                        out.push(escaped);
                    }
                    Some((pos, found)) => {
                        return Err(LiteralError::UnexpectedChar { found, pos })
                    }
                    None => return Err(LiteralError::UnterminatedString { pos: start }),
                },
                Some((_, c)) => out.push(c),
            }
        }
    }

    fn parse_int(&mut self) -> Result<Literal, LiteralError> {
        let (start, first) = self.chars.next().ok_or(LiteralError::Empty)?;

        let mut digits = String::new();
        digits.push(first);
        while matches!(self.peek(), Some((_, c)) if c.is_ascii_digit()) {
            let (_, c) = self.chars.next().unwrap();
            digits.push(c);
        }

        digits
            .parse::<i64>()
            .map(Literal::Int)
            .map_err(|_| LiteralError::InvalidInt { pos: start })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_quoted_string_list() {
        assert_eq!(
            parse_id_list("['a','b']"),
            Ok(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn parses_double_quoted_strings_and_whitespace() {
        assert_eq!(
            parse_id_list(r#"[ "set-1" , "set-2" ]"#),
            Ok(vec!["set-1".to_string(), "set-2".to_string()])
        );
    }

    #[test]
    fn parses_tuple_syntax() {
        assert_eq!(
            parse_id_list("('x','y')"),
            Ok(vec!["x".to_string(), "y".to_string()])
        );
    }

    #[test]
    fn parses_trailing_comma() {
        assert_eq!(parse_id_list("['a',]"), Ok(vec!["a".to_string()]));
    }

    #[test]
    fn parses_empty_list() {
        assert_eq!(parse_id_list("[]"), Ok(vec![]));
    }

    #[test]
    fn parses_bare_scalar_as_single_element() {
        assert_eq!(parse_id_list("'abc123'"), Ok(vec!["abc123".to_string()]));
        assert_eq!(parse_id_list("42"), Ok(vec!["42".to_string()]));
    }

    #[test]
    fn parses_negative_integer() {
        assert_eq!(parse_literal("-7"), Ok(Literal::Int(-7)));
    }

    #[test]
    fn parses_escaped_quote_inside_string() {
        assert_eq!(
            parse_literal(r"'it\'s'"),
            Ok(Literal::Str("it's".to_string()))
        );
    }

    #[test]
    fn rejects_bareword() {
        assert!(matches!(
            parse_id_list("not-a-list"),
            Err(LiteralError::UnexpectedChar { found: 'n', pos: 0 })
        ));
    }

    #[test]
    fn rejects_code_like_input() {
        // Function calls and attribute access are outside the grammar,
        // so they parse-fail instead of ever being evaluated.
        assert!(parse_id_list("__import__('os')").is_err());
        assert!(parse_id_list("[].append").is_err());
    }

    #[test]
    fn rejects_unterminated_string() {
        assert_eq!(
            parse_id_list("['a"),
            Err(LiteralError::UnterminatedString { pos: 1 })
        );
    }

    #[test]
    fn rejects_unterminated_list() {
        assert_eq!(
            parse_id_list("['a',"),
            Err(LiteralError::UnterminatedCollection { pos: 0 })
        );
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert_eq!(
            parse_id_list("['a'] x"),
            Err(LiteralError::TrailingInput { pos: 6 })
        );
    }

    #[test]
    fn rejects_nested_list_in_id_list() {
        assert_eq!(
            parse_id_list("[['a']]"),
            Err(LiteralError::NestedCollection)
        );
        // ...but parse_literal itself allows the nesting.
        assert!(parse_literal("[['a']]").is_ok());
    }

    #[test]
    fn rejects_missing_comma_between_elements() {
        assert!(matches!(
            parse_id_list("['a' 'b']"),
            Err(LiteralError::UnexpectedChar { found: '\'', .. })
        ));
    }

    #[test]
    fn encodes_id_list_as_literal() {
        let ids = vec!["a".to_string(), "b".to_string()];
        assert_eq!(encode_id_list(&ids), "['a','b']");
        assert_eq!(encode_id_list(&[]), "[]");
    }

    #[test]
    fn encoded_ids_round_trip_through_the_parser() {
        let ids = vec!["a'b".to_string(), r"c\d".to_string()];
        assert_eq!(parse_id_list(&encode_id_list(&ids)), Ok(ids));
    }

    #[test]
    fn rejects_integer_overflow() {
        assert_eq!(
            parse_literal("99999999999999999999999999"),
            Err(LiteralError::InvalidInt { pos: 0 })
        );
    }
}
