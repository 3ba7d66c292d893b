//! Formula text to token stream.
//!
//! The tokenizer scans left to right and at every position applies the first matching rule:
//!
//! - whitespace (including Unicode spaces and the BOM) is skipped;
//! - `'...'` or `"..."` is a quoted atom: the body is taken verbatim, must be non-empty and
//!   may not contain a backslash;
//! - `\T` and `\F` are the boolean literals, emitted as atoms;
//! - `& | ! ( )` and `->` are operators;
//! - a run of word characters (Latin and Greek letters, digits, `_`) is an atom, unless it
//!   consists only of the reserved letters `F A U X G R E W`, in which case every letter is
//!   emitted as its own operator (so `EX` reads as `E`, `X` and `AGEF` as `A`, `G`, `E`, `F`).
//!
//! Anything else is a [`Error::Syntax`].
//!
//! [`Tokenizer`] is a lazy iterator; [`tokenize`] collects it.

use std::collections::VecDeque;
use std::iter::Peekable;
use std::str::CharIndices;

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::token::{Position, Span, Token};

/// Letters that denote path quantifiers and LTL path operators.
pub const RESERVED_LETTERS: [char; 8] = ['F', 'A', 'U', 'X', 'G', 'R', 'E', 'W'];

pub fn is_reserved_letter(c: char) -> bool {
    RESERVED_LETTERS.contains(&c)
}

/// Characters allowed in unquoted atoms.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || (('\u{00C0}'..='\u{00FF}').contains(&c) && c != '\u{00D7}' && c != '\u{00F7}')
        || ('\u{0391}'..='\u{03C9}').contains(&c)
}

fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// Tokenizes the whole input.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    debug!("tokenize(input = {:?})", input);
    Tokenizer::new(input).collect()
}

/// Lazy tokenizer over a string slice.
///
/// Yields `Ok(token)` items until the input is exhausted, or a single `Err` after which the
/// iterator is finished.
pub struct Tokenizer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    column: usize,
    pending: VecDeque<Token>,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            line: 0,
            column: 0,
            pending: VecDeque::new(),
            failed: false,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn position(&mut self) -> Position {
        let offset = self.chars.peek().map_or(self.input.len(), |&(i, _)| i);
        Position {
            offset,
            line: self.line,
            column: self.column,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let (_, c) = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn emit(&mut self, token: Token) {
        trace!("token {:?} at {:?}", token.text, token.span);
        self.pending.push_back(token);
    }

    /// Scans the next lexeme, pushing at least one token onto `pending`.
    /// Returns `false` at end of input.
    fn scan(&mut self) -> Result<bool> {
        while let Some(c) = self.peek() {
            if is_space(c) {
                self.bump();
                continue;
            }

            let start = self.position();
            match c {
                '\'' | '"' => {
                    let body = self.quoted(c)?;
                    let span = Span::new(start, self.position());
                    self.emit(Token::atom(body).with_span(span));
                }
                '\\' => {
                    self.bump();
                    match self.peek() {
                        Some(b @ ('T' | 'F')) => {
                            self.bump();
                            let span = Span::new(start, self.position());
                            self.emit(Token::atom(format!("\\{}", b)).with_span(span));
                        }
                        _ => return Err(Error::unknown_character('\\')),
                    }
                }
                '-' => {
                    self.bump();
                    if self.peek() != Some('>') {
                        return Err(Error::unknown_character('-'));
                    }
                    self.bump();
                    let span = Span::new(start, self.position());
                    self.emit(Token::operator("->").with_span(span));
                }
                '&' | '|' | '!' | '(' | ')' => {
                    self.bump();
                    let span = Span::new(start, self.position());
                    self.emit(Token::operator(c).with_span(span));
                }
                c if is_word_char(c) => self.word(),
                c => return Err(Error::unknown_character(c)),
            }
            return Ok(true);
        }
        Ok(false)
    }

    fn quoted(&mut self, delimiter: char) -> Result<String> {
        self.bump(); // opening delimiter
        let mut body = String::new();
        loop {
            match self.bump() {
                None => return Err(Error::syntax(format!("Expected '{}' but found end of input.", delimiter))),
                Some('\\') => return Err(Error::syntax("Backslashes are not allowed in strings!")),
                Some(c) if c == delimiter => break,
                Some(c) => body.push(c),
            }
        }
        if body.is_empty() {
            return Err(Error::unknown_character(delimiter));
        }
        Ok(body)
    }

    fn word(&mut self) {
        let start = self.position();
        let mut letters: Vec<(char, Span)> = Vec::new();
        while let Some(c) = self.peek() {
            if !is_word_char(c) {
                break;
            }
            let from = self.position();
            self.bump();
            letters.push((c, Span::new(from, self.position())));
        }

        if letters.iter().all(|&(c, _)| is_reserved_letter(c)) {
            for (c, span) in letters {
                self.emit(Token::operator(c).with_span(span));
            }
        } else {
            let text: String = letters.iter().map(|&(c, _)| c).collect();
            let span = Span::new(start, self.position());
            self.emit(Token::atom(text).with_span(span));
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.pop_front() {
            return Some(Ok(token));
        }
        if self.failed {
            return None;
        }
        match self.scan() {
            Ok(true) => self.pending.pop_front().map(Ok),
            Ok(false) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::token::TokenKind;

    fn texts(input: &str) -> Vec<(TokenKind, String)> {
        tokenize(input).unwrap().into_iter().map(|t| (t.kind, t.text)).collect()
    }

    fn atom(s: &str) -> (TokenKind, String) {
        (TokenKind::Atom, s.to_string())
    }

    fn op(s: &str) -> (TokenKind, String) {
        (TokenKind::Operator, s.to_string())
    }

    fn error(input: &str) -> String {
        let e = tokenize(input).unwrap_err();
        assert!(e.is_syntax());
        e.to_string()
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   \t\n\r\n\u{00A0}\u{FEFF}").unwrap().is_empty());
    }

    #[test]
    fn test_atoms() {
        assert_eq!(texts("a"), vec![atom("a")]);
        assert_eq!(texts("\"a\""), vec![atom("a")]);
        assert_eq!(texts("'X'"), vec![atom("X")]);
        assert_eq!(texts("\\T"), vec![atom("\\T")]);
        assert_eq!(texts("\\F"), vec![atom("\\F")]);
        assert_eq!(texts("T"), vec![atom("T")]);
        assert_eq!(texts("foo_42 αβγ café"), vec![atom("foo_42"), atom("αβγ"), atom("café")]);
    }

    #[test]
    fn test_quoted_atom_keeps_body_verbatim() {
        assert_eq!(texts("'a b & c'"), vec![atom("a b & c")]);
        assert_eq!(texts("\"it's\""), vec![atom("it's")]);
    }

    #[test]
    fn test_reserved_letter_runs() {
        assert_eq!(texts("X"), vec![op("X")]);
        assert_eq!(texts("EX p"), vec![op("E"), op("X"), atom("p")]);
        assert_eq!(texts("AGEF p"), vec![op("A"), op("G"), op("E"), op("F"), atom("p")]);
        assert_eq!(texts("Eat"), vec![atom("Eat")]);
        assert_eq!(texts("FOO"), vec![atom("FOO")]);
        assert_eq!(texts("E(a U b)"), vec![op("E"), op("("), atom("a"), op("U"), atom("b"), op(")")]);
    }

    #[test]
    fn test_operators() {
        assert_eq!(texts("!"), vec![op("!")]);
        assert_eq!(texts("->"), vec![op("->")]);
        assert_eq!(texts("a&b|!c"), vec![atom("a"), op("&"), atom("b"), op("|"), op("!"), atom("c")]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(error("\"\""), "Unknown character: '\"'.");
        assert_eq!(error("\\"), "Unknown character: '\\'.");
        assert_eq!(error("\\a"), "Unknown character: '\\'.");
        assert_eq!(error("a - b"), "Unknown character: '-'.");
        assert_eq!(error("a $ b"), "Unknown character: '$'.");
        assert_eq!(error("'abc"), "Expected ''' but found end of input.");
        assert_eq!(error("\"a\\b\""), "Backslashes are not allowed in strings!");
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let mut tokenizer = Tokenizer::new("a $ b");
        assert!(tokenizer.next().unwrap().is_ok());
        assert!(tokenizer.next().unwrap().is_err());
        assert!(tokenizer.next().is_none());
    }

    #[test]
    fn test_spans() {
        let tokens = tokenize("a ->\n  'b c'").unwrap();
        let spans: Vec<_> = tokens.iter().map(|t| t.span.unwrap()).collect();
        assert_eq!((spans[0].start.column, spans[0].end.column), (0, 1));
        assert_eq!((spans[1].start.offset, spans[1].end.offset), (2, 4));
        assert_eq!((spans[2].start.line, spans[2].start.column), (1, 2));
        assert_eq!((spans[2].end.line, spans[2].end.column), (1, 7));
    }

    #[test]
    fn test_lexical_partition() {
        for input in ["EX p & q", "A(a U b) -> !\\T", "a|b  &c", "AG (p -> EF q)"] {
            let joined: String = tokenize(input).unwrap().iter().map(|t| t.text.as_str()).collect();
            let stripped: String = input.chars().filter(|c| !c.is_whitespace()).collect();
            assert_eq!(joined, stripped);
        }
    }
}
