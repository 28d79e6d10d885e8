//! Filter string parser.
//!
//! Grammar (keywords case-insensitive):
//!
//! ```text
//! expr    := or
//! or      := and (("or" | "||") and)*
//! and     := unary (("and" | "&&") unary)*
//! unary   := ("not" | "!") unary | "(" expr ")" | cmp
//! cmp     := ident op literal
//! op      := eq | = | ne | != | gt | > | ge | >= | lt | < | le | <= | has
//! literal := 'quoted' | "quoted" | bare-word
//! ```
//!
//! Quoted literals are always strings; bare words are classified with
//! `Value::parse_literal`.
//!
//! # Limits
//!
//! A filter is at most `MAX_FILTER_LEN` bytes, nests `(` and `not` at most
//! `MAX_DEPTH` levels, and holds at most `MAX_TERMS` comparisons. Going
//! past any of them is a syntax error, so parsing and compiling never
//! recurse deeper than the limits allow.

use super::ast::{FilterExpr, FilterOp};
use super::errors::{FilterError, FilterResult};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Quoted(String),
    Symbol(&'static str),
    LParen,
    RParen,
}

#[derive(Debug, Clone)]
struct Spanned {
    token: Token,
    position: usize,
}

/// Longest accepted filter, in bytes
pub const MAX_FILTER_LEN: usize = 4096;

/// Deepest accepted nesting of `(` and `not`
pub const MAX_DEPTH: usize = 64;

/// Most comparisons one filter may hold
pub const MAX_TERMS: usize = 256;

const SYMBOLS: [&str; 9] = ["&&", "||", "!=", ">=", "<=", "=", ">", "<", "!"];

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn tokenize(input: &str) -> FilterResult<Vec<Spanned>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        match c {
            '(' => {
                chars.next();
                tokens.push(Spanned {
                    token: Token::LParen,
                    position: pos,
                });
            }
            ')' => {
                chars.next();
                tokens.push(Spanned {
                    token: Token::RParen,
                    position: pos,
                });
            }
            '"' | '\'' => {
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                for (_, ch) in chars.by_ref() {
                    if ch == c {
                        closed = true;
                        break;
                    }
                    text.push(ch);
                }
                if !closed {
                    return Err(FilterError::syntax(pos, "unterminated quoted string"));
                }
                tokens.push(Spanned {
                    token: Token::Quoted(text),
                    position: pos,
                });
            }
            c if is_word_char(c) => {
                let mut word = String::new();
                while let Some(&(_, ch)) = chars.peek() {
                    if !is_word_char(ch) {
                        break;
                    }
                    word.push(ch);
                    chars.next();
                }
                tokens.push(Spanned {
                    token: Token::Word(word),
                    position: pos,
                });
            }
            _ => {
                let rest = &input[pos..];
                let symbol = SYMBOLS
                    .iter()
                    .find(|s| rest.starts_with(**s))
                    .copied()
                    .ok_or_else(|| {
                        FilterError::syntax(pos, format!("unexpected character '{}'", c))
                    })?;
                for _ in 0..symbol.len() {
                    chars.next();
                }
                tokens.push(Spanned {
                    token: Token::Symbol(symbol),
                    position: pos,
                });
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Spanned>,
    index: usize,
    end: usize,
    depth: usize,
    terms: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index).map(|t| &t.token)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.index)
            .map_or(self.end, |t| t.position)
    }

    fn next(&mut self) -> Option<Spanned> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn at_keyword(&self, keyword: &str, symbol: &str) -> bool {
        match self.peek() {
            Some(Token::Word(w)) => w.eq_ignore_ascii_case(keyword),
            Some(Token::Symbol(s)) => *s == symbol,
            _ => false,
        }
    }

    fn parse_or(&mut self) -> FilterResult<FilterExpr> {
        let mut lhs = self.parse_and()?;
        while self.at_keyword("or", "||") {
            self.next();
            let rhs = self.parse_and()?;
            lhs = lhs.or(rhs);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> FilterResult<FilterExpr> {
        let mut lhs = self.parse_unary()?;
        while self.at_keyword("and", "&&") {
            self.next();
            let rhs = self.parse_unary()?;
            lhs = lhs.and(rhs);
        }
        Ok(lhs)
    }

    /// Enters one level of `(` or `not`
    fn descend(&mut self) -> FilterResult<()> {
        if self.depth >= MAX_DEPTH {
            return Err(FilterError::syntax(
                self.position(),
                format!("filter nests deeper than {} levels", MAX_DEPTH),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_unary(&mut self) -> FilterResult<FilterExpr> {
        if self.at_keyword("not", "!") {
            self.descend()?;
            self.next();
            let inner = self.parse_unary()?;
            self.depth -= 1;
            return Ok(inner.not());
        }
        if self.peek() == Some(&Token::LParen) {
            self.descend()?;
            self.next();
            let inner = self.parse_or()?;
            self.depth -= 1;
            match self.next() {
                Some(Spanned {
                    token: Token::RParen,
                    ..
                }) => return Ok(inner),
                Some(other) => {
                    return Err(FilterError::syntax(other.position, "expected ')'"));
                }
                None => return Err(FilterError::syntax(self.end, "missing closing ')'")),
            }
        }
        self.parse_cmp()
    }

    fn parse_cmp(&mut self) -> FilterResult<FilterExpr> {
        let position = self.position();
        if self.terms >= MAX_TERMS {
            return Err(FilterError::syntax(
                position,
                format!("filter holds more than {} comparisons", MAX_TERMS),
            ));
        }
        self.terms += 1;
        let property = match self.next() {
            Some(Spanned {
                token: Token::Word(w),
                ..
            }) if is_identifier(&w) => w,
            Some(other) => {
                return Err(FilterError::syntax(
                    other.position,
                    "expected a property name",
                ));
            }
            None => return Err(FilterError::syntax(position, "expected a property name")),
        };

        let position = self.position();
        let op = match self.next() {
            Some(Spanned {
                token: Token::Word(w),
                ..
            }) => FilterOp::from_token(&w),
            Some(Spanned {
                token: Token::Symbol(s),
                ..
            }) => FilterOp::from_token(s),
            _ => None,
        }
        .ok_or_else(|| {
            FilterError::syntax(position, format!("expected an operator after '{}'", property))
        })?;

        let position = self.position();
        let value = match self.next() {
            Some(Spanned {
                token: Token::Quoted(s),
                ..
            }) => Value::Str(s),
            Some(Spanned {
                token: Token::Word(w),
                ..
            }) => Value::parse_literal(&w),
            _ => {
                return Err(FilterError::syntax(
                    position,
                    format!("expected a value after '{} {}'", property, op),
                ));
            }
        };

        Ok(FilterExpr::cmp(property, op, value))
    }
}

fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Parses a filter string into an expression tree
pub fn parse_filter(input: &str) -> FilterResult<FilterExpr> {
    if input.len() > MAX_FILTER_LEN {
        return Err(FilterError::syntax(
            MAX_FILTER_LEN,
            format!("filter exceeds {} bytes", MAX_FILTER_LEN),
        ));
    }
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(FilterError::syntax(0, "empty filter"));
    }
    let mut parser = Parser {
        tokens,
        index: 0,
        end: input.len(),
        depth: 0,
        terms: 0,
    };
    let expr = parser.parse_or()?;
    if parser.peek().is_some() {
        return Err(FilterError::syntax(
            parser.position(),
            "unexpected trailing input",
        ));
    }
    Ok(expr)
}
