//! Recursive-descent parser for terms, clause heads and goals
//!
//! The parser works on the token stream from [`Lexer`]. Arithmetic
//! expressions are parsed by the `impl Parser` block in [`super::arith`].
//!
//! Splitting a line into head, body and goals happens on the raw text
//! ([`split_top_level`], [`find_top_level`]), tracking bracket depth and
//! quote state so list and string contents are never split.

use crate::logic::arith::{CompareOp, Expr};
use crate::logic::lexer::{LexError, Lexer, Token};
use crate::logic::term::{render_head, Term};
use std::fmt;

/// Parser error type
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parse error at column {}: {}", self.position + 1, self.message)
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            position: err.position,
        }
    }
}

/// One parsed body or query goal
#[derive(Debug, Clone, PartialEq)]
pub enum Goal {
    True,
    Fail,
    Nl,
    Cut,
    Write(Term),
    Member(Term, Term),
    /// `A = B`
    Unify(Term, Term),
    /// `A \= B`
    NotUnify(Term, Term),
    /// `X is Expr`
    Is(Term, Expr),
    Compare(CompareOp, Expr, Expr),
    /// User predicate call; zero arguments for a bare atom
    Call { name: String, args: Vec<Term> },
}

impl Goal {
    /// Append every variable name in the goal, in order of first appearance
    pub fn collect_variables(&self, out: &mut Vec<String>) {
        match self {
            Goal::True | Goal::Fail | Goal::Nl | Goal::Cut => {}
            Goal::Write(t) => t.collect_variables(out),
            Goal::Member(a, b) | Goal::Unify(a, b) | Goal::NotUnify(a, b) => {
                a.collect_variables(out);
                b.collect_variables(out);
            }
            Goal::Is(t, e) => {
                t.collect_variables(out);
                e.collect_variables(out);
            }
            Goal::Compare(_, l, r) => {
                l.collect_variables(out);
                r.collect_variables(out);
            }
            Goal::Call { args, .. } => {
                for arg in args {
                    arg.collect_variables(out);
                }
            }
        }
    }

    pub fn rename_variables<F>(&self, rename: &F) -> Goal
    where
        F: Fn(&str) -> String,
    {
        match self {
            Goal::True | Goal::Fail | Goal::Nl | Goal::Cut => self.clone(),
            Goal::Write(t) => Goal::Write(t.rename_variables(rename)),
            Goal::Member(a, b) => {
                Goal::Member(a.rename_variables(rename), b.rename_variables(rename))
            }
            Goal::Unify(a, b) => {
                Goal::Unify(a.rename_variables(rename), b.rename_variables(rename))
            }
            Goal::NotUnify(a, b) => {
                Goal::NotUnify(a.rename_variables(rename), b.rename_variables(rename))
            }
            Goal::Is(t, e) => Goal::Is(t.rename_variables(rename), e.rename_variables(rename)),
            Goal::Compare(op, l, r) => {
                Goal::Compare(*op, l.rename_variables(rename), r.rename_variables(rename))
            }
            Goal::Call { name, args } => Goal::Call {
                name: name.clone(),
                args: args.iter().map(|a| a.rename_variables(rename)).collect(),
            },
        }
    }
}

/// Recursive descent parser over logic-language tokens
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self { tokens, position: 0 })
    }

    /// Parser over a slice of an existing token stream
    pub(crate) fn from_tokens(mut tokens: Vec<Token>) -> Self {
        let end = tokens.last().map_or(0, Token::position);
        if !matches!(tokens.last(), Some(Token::Eof(_))) {
            tokens.push(Token::Eof(end));
        }
        Self { tokens, position: 0 }
    }

    /// Predicate name plus arguments: `name(a, b)` or bare `name`
    pub fn parse_head(&mut self) -> Result<(String, Vec<Term>), ParseError> {
        let name = match self.advance() {
            Token::Atom(name, _) => name,
            other => return Err(self.error_at(&other, "expected a predicate name")),
        };
        let args = if matches!(self.peek_token(), Token::LParen(_)) {
            self.advance();
            self.parse_args()?
        } else {
            Vec::new()
        };
        Ok((name, args))
    }

    /// Parse arguments after an opening `(` through the closing `)`
    fn parse_args(&mut self) -> Result<Vec<Term>, ParseError> {
        let mut args = Vec::new();
        if matches!(self.peek_token(), Token::RParen(_)) {
            let token = self.peek_token();
            return Err(self.error_at(&token, "empty argument list"));
        }
        loop {
            args.push(self.parse_term()?);
            match self.advance() {
                Token::Comma(_) => continue,
                Token::RParen(_) => break,
                other => return Err(self.error_at(&other, "expected ',' or ')'")),
            }
        }
        Ok(args)
    }

    /// Parse one term
    pub fn parse_term(&mut self) -> Result<Term, ParseError> {
        let token = self.advance();
        match token {
            Token::Variable(name, _) => Ok(Term::Variable(name)),
            Token::Int(n, _) => Ok(Term::int(n)),
            Token::Float(x, _) => Ok(Term::float(x)),
            Token::Str(s, _) => Ok(Term::String(s)),
            Token::LBracket(_) => self.parse_list(),
            Token::Bang(_) => Ok(Term::atom("!")),
            Token::Atom(name, _) => {
                if matches!(self.peek_token(), Token::LParen(_)) {
                    // Compound terms are kept as atoms of their normalised text
                    self.advance();
                    let args = self.parse_args()?;
                    Ok(Term::Atom(render_head(&name, &args)))
                } else {
                    Ok(Term::Atom(name))
                }
            }
            Token::Symbol(ref s, _) if s == "-" => match self.peek_token() {
                Token::Int(n, _) => {
                    self.advance();
                    Ok(Term::int(n.wrapping_neg()))
                }
                Token::Float(x, _) => {
                    self.advance();
                    Ok(Term::float(-x))
                }
                _ => Ok(Term::atom("-")),
            },
            Token::Symbol(s, _) => Ok(Term::Atom(s)),
            other => Err(self.error_at(&other, "expected a term")),
        }
    }

    /// Elements after an opening `[` through the closing `]`
    fn parse_list(&mut self) -> Result<Term, ParseError> {
        let mut items = Vec::new();
        if matches!(self.peek_token(), Token::RBracket(_)) {
            self.advance();
            return Ok(Term::List(items));
        }
        loop {
            items.push(self.parse_term()?);
            match self.advance() {
                Token::Comma(_) => continue,
                Token::RBracket(_) => break,
                other @ Token::Pipe(_) => {
                    return Err(self.error_at(&other, "list tails '[H|T]' are not supported"))
                }
                other => return Err(self.error_at(&other, "expected ',' or ']'")),
            }
        }
        Ok(Term::List(items))
    }

    /// Accept an optional clause-ending `.` followed by end of input
    pub fn expect_end(&mut self) -> Result<(), ParseError> {
        if self.peek_token().is_symbol(".") {
            self.advance();
        }
        match self.peek_token() {
            Token::Eof(_) => Ok(()),
            other => Err(self.error_at(&other, "unexpected trailing input")),
        }
    }

    // ===== Helper methods =====

    pub(crate) fn peek_token(&self) -> Token {
        self.tokens
            .get(self.position)
            .cloned()
            .unwrap_or(Token::Eof(0))
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek_token();
        if !matches!(token, Token::Eof(_)) {
            self.position += 1;
        }
        token
    }

    pub(crate) fn error_at(&self, token: &Token, message: &str) -> ParseError {
        ParseError {
            message: format!("{}, found {}", message, token),
            position: token.position(),
        }
    }
}

/// Parse a clause head such as `parent(tom, bob).`
pub fn parse_clause_head(text: &str) -> Result<(String, Vec<Term>), ParseError> {
    let mut parser = Parser::new(text)?;
    let head = parser.parse_head()?;
    parser.expect_end()?;
    Ok(head)
}

/// Infix operators recognised at the top level of a goal
fn goal_operator(token: &Token) -> Option<&'static str> {
    match token {
        Token::Atom(name, _) if name == "is" => Some("is"),
        Token::Symbol(s, _) => ["=", "\\=", "=:=", "=\\=", "<", ">", "=<", ">="]
            .into_iter()
            .find(|op| *op == s.as_str()),
        _ => None,
    }
}

/// Parse a single goal
///
/// Recognises `!`, `true`, `fail`, `nl`, `write/1`, `member/2`, the infix
/// forms `=`, `\=`, `is` and the arithmetic comparisons; anything else is
/// a call to a user predicate.
pub fn parse_goal(text: &str) -> Result<Goal, ParseError> {
    let tokens = Lexer::new(text).tokenize()?;

    let mut depth = 0usize;
    let mut operator = None;
    for (index, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen(_) | Token::LBracket(_) => depth += 1,
            Token::RParen(_) | Token::RBracket(_) => depth = depth.saturating_sub(1),
            _ if depth == 0 => {
                if let Some(op) = goal_operator(token) {
                    operator = Some((index, op));
                    break;
                }
            }
            _ => {}
        }
    }

    if let Some((index, op)) = operator {
        if index == 0 {
            return Err(ParseError {
                message: format!("missing left operand for '{}'", op),
                position: tokens[0].position(),
            });
        }
        let mut left = Parser::from_tokens(tokens[..index].to_vec());
        let mut right = Parser::from_tokens(tokens[index + 1..].to_vec());

        let goal = match op {
            "=" | "\\=" | "is" => {
                let lhs = left.parse_term()?;
                left.expect_end()?;
                if op == "is" {
                    Goal::Is(lhs, right.parse_expr()?)
                } else {
                    let rhs = right.parse_term()?;
                    if op == "=" {
                        Goal::Unify(lhs, rhs)
                    } else {
                        Goal::NotUnify(lhs, rhs)
                    }
                }
            }
            _ => {
                let lhs = left.parse_expr()?;
                left.expect_end()?;
                let rhs = right.parse_expr()?;
                let cmp = CompareOp::from_symbol(op).ok_or_else(|| ParseError {
                    message: format!("unknown comparison '{}'", op),
                    position: tokens[index].position(),
                })?;
                Goal::Compare(cmp, lhs, rhs)
            }
        };
        right.expect_end()?;
        return Ok(goal);
    }

    let mut parser = Parser::from_tokens(tokens);
    if matches!(parser.peek_token(), Token::Bang(_)) {
        parser.advance();
        parser.expect_end()?;
        return Ok(Goal::Cut);
    }

    let (name, mut args) = parser.parse_head()?;
    parser.expect_end()?;

    let goal = match (name.as_str(), args.len()) {
        ("true", 0) => Goal::True,
        ("fail", 0) | ("false", 0) => Goal::Fail,
        ("nl", 0) => Goal::Nl,
        ("write", 1) => Goal::Write(args.remove(0)),
        ("member", 2) => {
            let list = args.remove(1);
            Goal::Member(args.remove(0), list)
        }
        _ => Goal::Call { name, args },
    };
    Ok(goal)
}

/// Byte offset of the first `pattern` outside quotes
pub fn find_top_level(text: &str, pattern: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (index, c) in text.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if text[index..].starts_with(pattern) => return Some(index),
            None => {}
        }
    }
    None
}

/// Split on `separator` where bracket depth is zero and no quote is open
///
/// Pieces are trimmed; an empty input yields no pieces.
pub fn split_top_level(text: &str, separator: char) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in text.chars() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => quote = Some(c),
                '(' | '[' => depth += 1,
                ')' | ']' => depth = depth.saturating_sub(1),
                _ if c == separator && depth == 0 => {
                    pieces.push(current.trim().to_string());
                    current.clear();
                    continue;
                }
                _ => {}
            },
        }
        current.push(c);
    }

    if !current.trim().is_empty() || !pieces.is_empty() {
        pieces.push(current.trim().to_string());
    }
    pieces
}

/// Strip one trailing clause-ending `.`
pub fn strip_terminator(text: &str) -> &str {
    let trimmed = text.trim_end();
    trimmed.strip_suffix('.').map_or(trimmed, str::trim_end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_head() {
        let (name, args) = parse_clause_head("parent(tom, X).").unwrap();
        assert_eq!(name, "parent");
        assert_eq!(args, vec![Term::atom("tom"), Term::var("X")]);
    }

    #[test]
    fn test_term_grammar() {
        let (_, args) =
            parse_clause_head("p([1, 2.5, \"s, t\"], -3, 'Quoted Atom', f(a, B), _)").unwrap();
        assert_eq!(
            args[0],
            Term::List(vec![Term::int(1), Term::float(2.5), Term::String("s, t".into())])
        );
        assert_eq!(args[1], Term::int(-3));
        assert_eq!(args[2], Term::atom("Quoted Atom"));
        assert_eq!(args[3], Term::atom("f(a, B)"));
        assert_eq!(args[4], Term::var("_"));
    }

    #[test]
    fn test_list_tail_rejected() {
        let err = parse_clause_head("p([H|T])").unwrap_err();
        assert!(err.message.contains("not supported"));
    }

    #[test]
    fn test_trailing_input_rejected() {
        assert!(parse_clause_head("p(a) q").is_err());
        assert!(parse_clause_head("p(a").is_err());
        assert!(parse_clause_head("p()").is_err());
    }

    #[test]
    fn test_parse_goals() {
        assert_eq!(parse_goal("!").unwrap(), Goal::Cut);
        assert_eq!(parse_goal("nl").unwrap(), Goal::Nl);
        assert_eq!(parse_goal("write(X)").unwrap(), Goal::Write(Term::var("X")));
        assert_eq!(
            parse_goal("member(X, [1,2])").unwrap(),
            Goal::Member(Term::var("X"), Term::List(vec![Term::int(1), Term::int(2)]))
        );
        assert_eq!(
            parse_goal("X = f(Y)").unwrap(),
            Goal::Unify(Term::var("X"), Term::atom("f(Y)"))
        );
        assert!(matches!(parse_goal("X is Y + 1").unwrap(), Goal::Is(_, _)));
        assert!(matches!(
            parse_goal("X =< 3").unwrap(),
            Goal::Compare(CompareOp::Le, _, _)
        ));
        assert_eq!(
            parse_goal("ready").unwrap(),
            Goal::Call {
                name: "ready".into(),
                args: vec![]
            }
        );
    }

    #[test]
    fn test_operator_inside_arguments_is_not_top_level() {
        assert!(parse_goal("p([X = 1])").is_err());
        assert!(matches!(parse_goal("p(\"a = b\")"), Ok(Goal::Call { .. })));
    }

    #[test]
    fn test_split_top_level() {
        assert_eq!(
            split_top_level("parent(X, Y), member(Y, [a, b]), write(\"a, b\")", ','),
            vec!["parent(X, Y)", "member(Y, [a, b])", "write(\"a, b\")"]
        );
        assert!(split_top_level("   ", ',').is_empty());
        assert_eq!(split_top_level("a,,b", ','), vec!["a", "", "b"]);
    }

    #[test]
    fn test_find_top_level() {
        assert_eq!(find_top_level("a :- b", ":-"), Some(2));
        assert_eq!(find_top_level("p(':-')", ":-"), None);
    }

    #[test]
    fn test_strip_terminator() {
        assert_eq!(strip_terminator("p(a). "), "p(a)");
        assert_eq!(strip_terminator("X is 3."), "X is 3");
        assert_eq!(strip_terminator("p(a)"), "p(a)");
    }
}
