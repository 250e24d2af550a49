//! Arithmetic over untrusted chat text.
//!
//! The grammar is closed: numbers, `+ - * / ( ) ^` and unary minus. There are
//! no identifiers, no function calls and no ambient state, so the evaluator
//! cannot be steered into anything but arithmetic no matter what the sender
//! types.

use super::wordmath;
use once_cell::sync::Lazy;
use regex::Regex;

/// Digits, operators, grouping and whitespace only; at least one digit.
static ARITHMETIC_BODY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d\s+\-*/().^]*\d[\d\s+\-*/().^]*$").expect("arithmetic regex"));

static LEADING_INTERROGATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:what\s+is|what's|whats|calculate|solve|compute|eval)\s+")
        .expect("interrogative regex")
});

static PERCENT_OF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*%\s*of\s*(\d+(?:\.\d+)?)").expect("percent-of regex")
});

static TRAILING_PERCENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").expect("percent regex"));

/// Evaluate `text` as arithmetic if it qualifies as a math candidate.
///
/// Returns `None` for anything that is not arithmetic; never panics and never
/// executes anything. Results are rounded to 4 decimal places.
pub fn evaluate(text: &str) -> Option<f64> {
    let candidate = extract_candidate(text)?;
    let value = Parser::new(&candidate).parse()?;
    if !value.is_finite() {
        return None;
    }
    Some((value * 10_000.0).round() / 10_000.0)
}

/// Render an evaluator result the way a person would write it.
pub fn format_result(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        let mut text = format!("{value}");
        if let Some(stripped) = text.strip_suffix(".0") {
            text = stripped.to_string();
        }
        text
    }
}

/// Normalize `text` into a bare arithmetic expression, or bail out.
fn extract_candidate(text: &str) -> Option<String> {
    let lowered = text.trim().to_lowercase();
    let lowered = lowered.trim_end_matches('?').trim();

    let stripped = LEADING_INTERROGATIVE.replace(lowered, "");
    let mut body = stripped.trim().to_string();

    // "N% of M" and bare "N%" are rewritten before the character-class gate
    // so the "of" connector does not disqualify them.
    body = PERCENT_OF.replace_all(&body, "(($1/100)*$2)").into_owned();
    body = TRAILING_PERCENT.replace_all(&body, "($1/100)").into_owned();
    body = body.replace("**", "^");

    if ARITHMETIC_BODY.is_match(&body) {
        return Some(body);
    }

    // Word math ("two plus three") rewrites into the same closed grammar.
    let rewritten = wordmath::rewrite(text)?;
    if ARITHMETIC_BODY.is_match(&rewritten) {
        Some(rewritten)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i] as char;
        match c {
            ' ' | '\t' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < bytes.len() && matches!(bytes[i] as char, '0'..='9' | '.') {
                    i += 1;
                }
                let literal = &input[start..i];
                tokens.push(Token::Number(literal.parse().ok()?));
            }
            _ => return None,
        }
    }
    Some(tokens)
}

/// Recursive-descent parser over the fixed token grammar.
///
/// expr   := term (('+' | '-') term)*
/// term   := factor (('*' | '/') factor)*
/// factor := '-' factor | power
/// power  := atom ('^' factor)?          (right-associative)
/// atom   := number | '(' expr ')'
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            tokens: tokenize(input).unwrap_or_default(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Option<f64> {
        if self.tokens.is_empty() {
            return None;
        }
        let value = self.expr()?;
        if self.pos == self.tokens.len() {
            Some(value)
        } else {
            None
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn expr(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Plus => {
                    self.advance();
                    value += self.term()?;
                }
                Token::Minus => {
                    self.advance();
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Some(value)
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.factor()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Star => {
                    self.advance();
                    value *= self.factor()?;
                }
                Token::Slash => {
                    self.advance();
                    value /= self.factor()?;
                }
                _ => break,
            }
        }
        Some(value)
    }

    fn factor(&mut self) -> Option<f64> {
        if self.peek() == Some(Token::Minus) {
            self.advance();
            return Some(-self.factor()?);
        }
        self.power()
    }

    fn power(&mut self) -> Option<f64> {
        let base = self.atom()?;
        if self.peek() == Some(Token::Caret) {
            self.advance();
            let exponent = self.factor()?;
            return Some(base.powf(exponent));
        }
        Some(base)
    }

    fn atom(&mut self) -> Option<f64> {
        match self.advance()? {
            Token::Number(value) => Some(value),
            Token::LParen => {
                let value = self.expr()?;
                if self.advance()? == Token::RParen {
                    Some(value)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}
