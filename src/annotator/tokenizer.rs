//! Splits text node values into word and literal tokens.

use once_cell::sync::Lazy;
use regex::Regex;

/// ASCII letters plus the Latin-1 supplement block, so accented words stay whole.
static RE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z\u{00C0}-\u{00FF}]+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Word(&'a str),
    Literal(&'a str),
}

impl<'a> Token<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Token::Word(text) | Token::Literal(text) => text,
        }
    }

    pub fn is_word(&self) -> bool {
        matches!(self, Token::Word(_))
    }
}

/// Tokenize `text` losslessly: joining the returned tokens yields `text`.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut cursor = 0usize;

    for found in RE_WORD.find_iter(text) {
        if found.start() > cursor {
            tokens.push(Token::Literal(&text[cursor..found.start()]));
        }
        tokens.push(Token::Word(found.as_str()));
        cursor = found.end();
    }

    if cursor < text.len() {
        tokens.push(Token::Literal(&text[cursor..]));
    }

    tokens
}

/// Whether `ch` belongs to the word class used by [`tokenize`].
pub fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ('\u{00C0}'..='\u{00FF}').contains(&ch)
}
