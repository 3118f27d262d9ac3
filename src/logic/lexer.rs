//! Lexer for the logic language
//!
//! Converts one clause, query or goal into a flat [`Token`] stream. Operator
//! characters are grouped greedily into [`Token::Symbol`] runs (`:-`, `=<`,
//! `\=`, `**` ...); the parser decides what a run means in context.
//!
//! `%` starts a comment only at the beginning of the text or right after a
//! clause-ending `.`, so it stays available as the modulo operator inside
//! arithmetic.

use std::fmt;

/// Characters that group into operator symbols
const SYMBOL_CHARS: &str = "+-*/\\^<>=~:.?@#&$%";

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier starting with an upper-case letter or `_`
    Variable(String, usize),
    /// Lower-case identifier or quoted atom
    Atom(String, usize),
    Int(i64, usize),
    Float(f64, usize),
    /// Double-quoted string, quotes removed
    Str(String, usize),
    Symbol(String, usize),
    Bang(usize),
    LParen(usize),
    RParen(usize),
    LBracket(usize),
    RBracket(usize),
    Comma(usize),
    Pipe(usize),
    Eof(usize),
}

impl Token {
    /// Character offset of the token in its source text
    pub fn position(&self) -> usize {
        match self {
            Token::Variable(_, pos)
            | Token::Atom(_, pos)
            | Token::Int(_, pos)
            | Token::Float(_, pos)
            | Token::Str(_, pos)
            | Token::Symbol(_, pos)
            | Token::Bang(pos)
            | Token::LParen(pos)
            | Token::RParen(pos)
            | Token::LBracket(pos)
            | Token::RBracket(pos)
            | Token::Comma(pos)
            | Token::Pipe(pos)
            | Token::Eof(pos) => *pos,
        }
    }

    pub fn is_symbol(&self, text: &str) -> bool {
        matches!(self, Token::Symbol(s, _) if s == text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Variable(name, _) => write!(f, "variable '{}'", name),
            Token::Atom(name, _) => write!(f, "atom '{}'", name),
            Token::Int(n, _) => write!(f, "number {}", n),
            Token::Float(x, _) => write!(f, "number {}", x),
            Token::Str(s, _) => write!(f, "string \"{}\"", s),
            Token::Symbol(s, _) => write!(f, "'{}'", s),
            Token::Bang(_) => write!(f, "'!'"),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::LBracket(_) => write!(f, "'['"),
            Token::RBracket(_) => write!(f, "']'"),
            Token::Comma(_) => write!(f, "','"),
            Token::Pipe(_) => write!(f, "'|'"),
            Token::Eof(_) => write!(f, "end of input"),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub position: usize,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lexer error at column {}: {}", self.position + 1, self.message)
    }
}

impl std::error::Error for LexError {}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Tokenize the entire input; the result always ends with [`Token::Eof`]
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens: Vec<Token> = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                tokens.push(Token::Eof(self.position));
                break;
            }

            let clause_boundary = tokens.last().map_or(true, |t| t.is_symbol("."));
            if self.peek() == Some('%') && clause_boundary {
                // Comment to end of line
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
                continue;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of input".to_string(),
            position: start,
        })?;

        match ch {
            '"' => Ok(Token::Str(self.quoted('"', start)?, start)),
            '\'' => Ok(Token::Atom(self.quoted('\'', start)?, start)),
            '0'..='9' => self.number(ch, start),
            'A'..='Z' | '_' => Ok(Token::Variable(self.identifier(ch), start)),
            'a'..='z' => Ok(Token::Atom(self.identifier(ch), start)),
            '(' => Ok(Token::LParen(start)),
            ')' => Ok(Token::RParen(start)),
            '[' => Ok(Token::LBracket(start)),
            ']' => Ok(Token::RBracket(start)),
            ',' => Ok(Token::Comma(start)),
            '|' => Ok(Token::Pipe(start)),
            '!' => Ok(Token::Bang(start)),
            c if SYMBOL_CHARS.contains(c) => Ok(Token::Symbol(self.symbol(c), start)),
            c => Err(LexError {
                message: format!("Unexpected character '{}'", c),
                position: start,
            }),
        }
    }

    fn identifier(&mut self, first: char) -> String {
        let mut text = String::from(first);
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        text
    }

    fn number(&mut self, first: char, start: usize) -> Result<Token, LexError> {
        let mut text = String::from(first);
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            text.push(c);
            self.advance();
        }

        // A '.' is a decimal point only when a digit follows it
        let is_float =
            self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit());
        if is_float {
            text.push('.');
            self.advance();
            while let Some(c) = self.peek().filter(char::is_ascii_digit) {
                text.push(c);
                self.advance();
            }
            return text.parse::<f64>().map(|x| Token::Float(x, start)).map_err(|_| LexError {
                message: format!("Invalid number '{}'", text),
                position: start,
            });
        }

        text.parse::<i64>().map(|n| Token::Int(n, start)).map_err(|_| LexError {
            message: format!("Integer literal '{}' is out of range", text),
            position: start,
        })
    }

    fn quoted(&mut self, quote: char, start: usize) -> Result<String, LexError> {
        let mut text = String::new();
        loop {
            match self.advance() {
                Some(c) if c == quote => return Ok(text),
                Some('\\') => match self.advance() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some(c) => text.push(c),
                    None => break,
                },
                Some(c) => text.push(c),
                None => break,
            }
        }
        Err(LexError {
            message: if quote == '"' {
                "Unterminated string".to_string()
            } else {
                "Unterminated quoted atom".to_string()
            },
            position: start,
        })
    }

    fn symbol(&mut self, first: char) -> String {
        let mut text = String::from(first);
        while let Some(c) = self.peek() {
            // "X = -1" style negatives and a closing '.' after an operator
            // are split off by the parser, not here
            if SYMBOL_CHARS.contains(c) {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        text
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        Some(c)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }
}

/// Drop a trailing `%` comment from one input line
///
/// Follows the lexer rule: only a `%` at the start of the line or after a
/// clause-ending `.` opens a comment. Quoted text is never cut.
pub fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut last_significant: Option<char> = None;

    for (index, c) in line.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => {
                if c == '%' && matches!(last_significant, None | Some('.')) {
                    return &line[..index];
                }
                if c == '"' || c == '\'' {
                    quote = Some(c);
                }
            }
        }
        if !c.is_whitespace() {
            last_significant = Some(c);
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(text: &str) -> Vec<Token> {
        Lexer::new(text).tokenize().unwrap()
    }

    #[test]
    fn test_fact_tokens() {
        let tokens = lex("parent(tom, X).");
        assert_eq!(tokens[0], Token::Atom("parent".into(), 0));
        assert_eq!(tokens[1], Token::LParen(6));
        assert_eq!(tokens[4], Token::Variable("X".into(), 12));
        assert!(tokens[6].is_symbol("."));
        assert!(matches!(tokens[7], Token::Eof(_)));
    }

    #[test]
    fn test_numbers() {
        let tokens = lex("3.14 42 7.");
        assert_eq!(tokens[0], Token::Float(3.14, 0));
        assert_eq!(tokens[1], Token::Int(42, 5));
        assert_eq!(tokens[2], Token::Int(7, 8));
        assert!(tokens[3].is_symbol("."));
    }

    #[test]
    fn test_symbols_group() {
        let tokens = lex("a :- X =< 3, Y \\= b");
        assert!(tokens[1].is_symbol(":-"));
        assert!(tokens[3].is_symbol("=<"));
        assert!(tokens[7].is_symbol("\\="));
    }

    #[test]
    fn test_quoted_atom_and_string() {
        let tokens = lex("'hello world' \"a, b\"");
        assert_eq!(tokens[0], Token::Atom("hello world".into(), 0));
        assert_eq!(tokens[1], Token::Str("a, b".into(), 14));
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("write(\"oops)").tokenize().unwrap_err();
        assert_eq!(err.position, 6);
    }

    #[test]
    fn test_percent_comment_only_at_boundary() {
        let tokens = lex("% whole line");
        assert_eq!(tokens.len(), 1);

        let tokens = lex("X is 7 % 3");
        assert!(tokens[3].is_symbol("%"));

        let tokens = lex("likes(a, b). % trailing");
        assert!(matches!(tokens.last(), Some(Token::Eof(_))));
        assert!(tokens[tokens.len() - 2].is_symbol("."));
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("% note"), "");
        assert_eq!(strip_comment("p(a). % note"), "p(a). ");
        assert_eq!(strip_comment("?- X is 7 % 2."), "?- X is 7 % 2.");
        assert_eq!(strip_comment("p('%'). "), "p('%'). ");
    }
}
