//! Program Lexer
//!
//! Flat tokenization of one program line. No grammar: a line is a sequence
//! of letter+number words and comments, in any order.

use std::sync::LazyLock;

use regex::Regex;

static BLOCK_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^N\d+\s+").expect("block number pattern is valid")
});

/// Token types in a program line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Motion/mode (G) or auxiliary (M) code
    Code,
    /// Any other address word, e.g. "X10" or "F800"
    Word,
    /// Comment (semicolon or parenthetical)
    Comment,
}

/// The two code families the validator tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeFamily {
    G,
    M,
}

impl CodeFamily {
    pub fn letter(self) -> char {
        match self {
            CodeFamily::G => 'G',
            CodeFamily::M => 'M',
        }
    }
}

/// A token with its text content
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

impl Token<'_> {
    /// Address letter, uppercased
    pub fn letter(&self) -> Option<char> {
        match self.kind {
            TokenKind::Comment => None,
            _ => self.text.chars().next().map(|c| c.to_ascii_uppercase()),
        }
    }

    /// Text after the address letter
    pub fn value(&self) -> &str {
        match self.kind {
            TokenKind::Comment => "",
            _ => &self.text[1..],
        }
    }

    /// Numeric value of a word, if it parses
    pub fn number(&self) -> Option<f64> {
        let value = self.value();
        if value.is_empty() {
            return None;
        }
        value.parse().ok()
    }

    /// Family and integer number of a code token.
    ///
    /// The number is `None` for codes that are not a plain integer, such as
    /// `G91.1` or a bare `G`.
    pub fn code(&self) -> Option<(CodeFamily, Option<u32>)> {
        if self.kind != TokenKind::Code {
            return None;
        }
        let family = match self.letter()? {
            'G' => CodeFamily::G,
            'M' => CodeFamily::M,
            _ => return None,
        };
        let value = self.value();
        // No truncation to the integer part: `G91.1` must not pass as `G91`,
        // so fractional codes surface as unknown.
        let number = if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
            value.parse().ok()
        } else {
            None
        };
        Some((family, number))
    }
}

/// Remove a leading `N<digits>` block number and its separating whitespace
pub fn strip_block_number(line: &str) -> &str {
    match BLOCK_NUMBER.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// Whether a line body is a full-line comment
pub fn is_comment_line(body: &str) -> bool {
    body.starts_with('(') || body.starts_with(';')
}

/// Tokenize a line into words and comments.
///
/// A word is an ASCII letter followed by digits, signs and dots, so packed
/// blocks like `G1X10Y20` split into three words. Other characters are
/// skipped.
pub fn tokenize_line(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some((start_idx, ch)) = chars.next() {
        match ch {
            // Semicolon comment: consume rest of line
            ';' => {
                tokens.push(Token {
                    kind: TokenKind::Comment,
                    text: &line[start_idx..],
                });
                break;
            }

            // Parenthetical comment, unterminated runs to end of line
            '(' => {
                let mut end_idx = line.len();
                for (idx, ch) in chars.by_ref() {
                    if ch == ')' {
                        end_idx = idx + 1;
                        break;
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::Comment,
                    text: &line[start_idx..end_idx],
                });
            }

            c if c.is_ascii_alphabetic() => {
                let mut end_idx = start_idx + 1;
                while let Some(&(idx, next_ch)) = chars.peek() {
                    if next_ch.is_ascii_digit() || matches!(next_ch, '.' | '-' | '+') {
                        end_idx = idx + 1;
                        chars.next();
                    } else {
                        break;
                    }
                }

                let kind = if matches!(c.to_ascii_uppercase(), 'G' | 'M') {
                    TokenKind::Code
                } else {
                    TokenKind::Word
                };
                tokens.push(Token {
                    kind,
                    text: &line[start_idx..end_idx],
                });
            }

            // Whitespace and malformed input
            _ => continue,
        }
    }

    tokens
}
