//! Token-level parsing helpers on top of sqlparser's MySQL tokenizer.
//!
//! Some statements must be rewritten without a full AST round trip, either
//! because the statement parser rejects them (MySQL index syntax PostgreSQL
//! style parsers choke on) or because the rewrite needs to preserve the
//! original text of everything it does not touch. `TokenParser` gives those
//! rewriters a shared navigation layer over the raw token stream; whitespace
//! tokens are kept so a token range can be rendered back verbatim.

use sqlparser::dialect::MySqlDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, TokenWithSpan, Tokenizer};

/// Token stream with a cursor and the usual check/expect helpers.
pub struct TokenParser {
    tokens: Vec<TokenWithSpan>,
    pos: usize,
}

impl TokenParser {
    /// Tokenize `sql` with the MySQL dialect. Returns `None` if the
    /// tokenizer rejects the text.
    pub fn new(sql: &str) -> Option<Self> {
        let dialect = MySqlDialect {};
        let tokens = Tokenizer::new(&dialect, sql)
            .tokenize_with_location()
            .ok()?;
        Some(Self { tokens, pos: 0 })
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    #[inline]
    pub fn tokens(&self) -> &[TokenWithSpan] {
        &self.tokens
    }

    #[inline]
    pub fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    #[inline]
    pub fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(Token::Whitespace(_)) = self.current_token() {
            self.advance();
        }
    }

    /// Check if the current token is a specific keyword.
    #[inline]
    pub fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.current_token(), Some(Token::Word(w)) if w.keyword == keyword)
    }

    /// Check if the current token is a word matching case-insensitively.
    /// Needed for MySQL words sqlparser has no `Keyword` entry for.
    #[inline]
    pub fn check_word_ci(&self, word: &str) -> bool {
        matches!(self.current_token(), Some(Token::Word(w)) if w.value.eq_ignore_ascii_case(word))
    }

    /// Check the current token's type, ignoring any inner value.
    #[inline]
    pub fn check_token(&self, expected: &Token) -> bool {
        match self.current_token() {
            Some(token) => std::mem::discriminant(token) == std::mem::discriminant(expected),
            None => false,
        }
    }

    /// Consume a specific keyword. Position is unchanged on `None`.
    pub fn expect_keyword(&mut self, keyword: Keyword) -> Option<()> {
        if self.check_keyword(keyword) {
            self.advance();
            Some(())
        } else {
            None
        }
    }

    /// Consume a specific word, case-insensitively.
    pub fn expect_word_ci(&mut self, word: &str) -> Option<()> {
        if self.check_word_ci(word) {
            self.advance();
            Some(())
        } else {
            None
        }
    }

    /// Consume a token of the expected type.
    pub fn expect_token(&mut self, expected: &Token) -> Option<()> {
        if self.check_token(expected) {
            self.advance();
            Some(())
        } else {
            None
        }
    }

    /// Parse a bare identifier word.
    pub fn parse_identifier(&mut self) -> Option<String> {
        match self.current_token()? {
            Token::Word(w) => {
                let name = w.value.clone();
                self.advance();
                Some(name)
            }
            _ => None,
        }
    }

    /// Parse a possibly qualified name (`schema.table`), returned dotted.
    pub fn parse_object_name(&mut self) -> Option<String> {
        let mut name = self.parse_identifier()?;
        while self.check_token(&Token::Period) {
            self.advance();
            let part = self.parse_identifier()?;
            name.push('.');
            name.push_str(&part);
        }
        Some(name)
    }

    /// Render tokens from `start` to `end` (exclusive) back to text,
    /// preserving original whitespace.
    pub fn tokens_to_string(&self, start: usize, end: usize) -> String {
        self.tokens[start..end.min(self.tokens.len())]
            .iter()
            .map(|t| render_token(&t.token))
            .collect()
    }

    /// Find the next top-level occurrence of `keyword` from the current
    /// position, skipping over parenthesized groups. Returns its index.
    pub fn find_top_level_keyword(&self, keyword: Keyword) -> Option<usize> {
        let mut depth: i32 = 0;
        for (offset, t) in self.tokens[self.pos..].iter().enumerate() {
            match &t.token {
                Token::LParen => depth += 1,
                Token::RParen => depth -= 1,
                Token::Word(w) if depth == 0 && w.keyword == keyword => {
                    return Some(self.pos + offset);
                }
                _ => {}
            }
        }
        None
    }

    /// Consume one value expression, stopping (without consuming) at a
    /// top-level comma, an unbalanced closing parenthesis, a top-level
    /// keyword in `stop_keywords`, or end of input.
    ///
    /// Returns `None` when no tokens were consumed.
    pub fn parse_scanned_value(&mut self, stop_keywords: &[Keyword]) -> Option<ScannedValue> {
        self.skip_whitespace();

        let start = self.pos;
        let mut depth: i32 = 0;
        while let Some(token) = self.current_token() {
            match token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                Token::Comma if depth == 0 => break,
                Token::Word(w)
                    if depth == 0 && stop_keywords.contains(&w.keyword) =>
                {
                    break;
                }
                _ => {}
            }
            self.advance();
        }

        if self.pos == start {
            return None;
        }
        Some(classify_value(&self.tokens[start..self.pos]))
    }
}

/// One scanned value expression: its rendered text plus a shallow
/// classification used by the literal rewriters.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedValue {
    pub text: String,
    pub kind: ValueKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    Null,
    /// A numeric literal, possibly signed. The full text is in `text`.
    Number,
    /// A single-quoted string; carries the unquoted inner value.
    String(String),
    /// Anything else: function calls, expressions, hex literals.
    Other,
}

impl ScannedValue {
    pub fn is_null(&self) -> bool {
        self.kind == ValueKind::Null
    }

    /// Interpret the value as a boolean where the source schema stores
    /// flags numerically: any non-zero number is true, and the strings
    /// `'1'`/`'true'` and `'0'`/`'false'` map accordingly.
    pub fn as_boolean(&self) -> Option<bool> {
        match &self.kind {
            ValueKind::Number => self.text.parse::<f64>().ok().map(|v| v != 0.0),
            ValueKind::String(inner) => match inner.trim().to_lowercase().as_str() {
                "1" | "true" => Some(true),
                "0" | "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Render one token back to SQL text. `Token`'s `Display` prints the inner
/// value of string literals without re-escaping the quote character, so
/// string tokens are rebuilt here.
fn render_token(token: &Token) -> String {
    match token {
        Token::SingleQuotedString(inner) => format!("'{}'", inner.replace('\'', "''")),
        Token::DoubleQuotedString(inner) => format!("\"{}\"", inner.replace('"', "\"\"")),
        _ => token.to_string(),
    }
}

/// Classify a consumed token range. A leading `_binary` introducer is
/// dropped from both the text and the classification.
fn classify_value(tokens: &[TokenWithSpan]) -> ScannedValue {
    let mut tokens: Vec<&Token> = tokens.iter().map(|t| &t.token).collect();

    while let Some(first) = significant(&tokens, 0) {
        if matches!(&tokens[first], Token::Word(w) if w.value.eq_ignore_ascii_case("_binary")) {
            tokens.drain(..=first);
        } else {
            break;
        }
    }

    let text: String = tokens.iter().map(|t| render_token(t)).collect();
    let text = text.trim().to_string();

    let significant_tokens: Vec<&Token> = tokens
        .iter()
        .copied()
        .filter(|t| !matches!(t, Token::Whitespace(_)))
        .collect();

    let kind = match significant_tokens.as_slice() {
        [Token::Word(w)] if w.keyword == Keyword::NULL => ValueKind::Null,
        [Token::Number(..)] => ValueKind::Number,
        [Token::Minus, Token::Number(..)] => ValueKind::Number,
        [Token::SingleQuotedString(inner)] => ValueKind::String(inner.clone()),
        _ => ValueKind::Other,
    };

    ScannedValue { text, kind }
}

fn significant(tokens: &[&Token], from: usize) -> Option<usize> {
    tokens[from..]
        .iter()
        .position(|t| !matches!(t, Token::Whitespace(_)))
        .map(|offset| from + offset)
}
