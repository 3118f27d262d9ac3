//! Safe arithmetic for `is` and comparison goals
//!
//! Expressions are parsed into an [`Expr`] tree by precedence climbing and
//! evaluated against the current bindings. The only names an expression can
//! reach are bound variables and the fixed function set
//! `abs round int float max min sin cos sqrt`.
//!
//! Precedence, lowest first:
//!
//! | Level | Operators |
//! |---|---|
//! | additive | `+ -` |
//! | multiplicative | `* / // mod %` |
//! | unary | `-` `+` |
//! | power | `**` (right associative) |

use crate::logic::bindings::Bindings;
use crate::logic::lexer::Token;
use crate::logic::parser::{ParseError, Parser};
use crate::logic::term::{Number, Term};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Abs,
    Round,
    Int,
    Float,
    Max,
    Min,
    Sin,
    Cos,
    Sqrt,
}

impl Func {
    fn from_name(name: &str) -> Option<Func> {
        match name {
            "abs" => Some(Func::Abs),
            "round" => Some(Func::Round),
            "int" => Some(Func::Int),
            "float" => Some(Func::Float),
            "max" => Some(Func::Max),
            "min" => Some(Func::Min),
            "sin" => Some(Func::Sin),
            "cos" => Some(Func::Cos),
            "sqrt" => Some(Func::Sqrt),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Func::Abs => "abs",
            Func::Round => "round",
            Func::Int => "int",
            Func::Float => "float",
            Func::Max => "max",
            Func::Min => "min",
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Sqrt => "sqrt",
        }
    }
}

/// Comparison goal operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=:=`
    Eq,
    /// `=\=`
    Ne,
    Lt,
    Gt,
    /// `=<`
    Le,
    Ge,
}

impl CompareOp {
    pub fn from_symbol(symbol: &str) -> Option<CompareOp> {
        match symbol {
            "=:=" => Some(CompareOp::Eq),
            "=\\=" => Some(CompareOp::Ne),
            "<" => Some(CompareOp::Lt),
            ">" => Some(CompareOp::Gt),
            "=<" => Some(CompareOp::Le),
            ">=" => Some(CompareOp::Ge),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=:=",
            CompareOp::Ne => "=\\=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Le => "=<",
            CompareOp::Ge => ">=",
        }
    }

    /// Compare two evaluated numbers
    pub fn holds(self, left: Number, right: Number) -> bool {
        let ordering = match (left, right) {
            (Number::Int(a), Number::Int(b)) => a.partial_cmp(&b),
            _ => left.as_f64().partial_cmp(&right.as_f64()),
        };
        // NaN compares unequal to everything
        let Some(ordering) = ordering else {
            return self == CompareOp::Ne;
        };
        match self {
            CompareOp::Eq => ordering.is_eq(),
            CompareOp::Ne => ordering.is_ne(),
            CompareOp::Lt => ordering.is_lt(),
            CompareOp::Gt => ordering.is_gt(),
            CompareOp::Le => ordering.is_le(),
            CompareOp::Ge => ordering.is_ge(),
        }
    }
}

/// Arithmetic expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(Number),
    Var(String),
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Call(Func, Vec<Expr>),
}

impl Expr {
    pub fn collect_variables(&self, out: &mut Vec<String>) {
        match self {
            Expr::Num(_) => {}
            Expr::Var(name) => {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            Expr::Neg(inner) => inner.collect_variables(out),
            Expr::Binary(_, l, r) => {
                l.collect_variables(out);
                r.collect_variables(out);
            }
            Expr::Call(_, args) => {
                for arg in args {
                    arg.collect_variables(out);
                }
            }
        }
    }

    pub fn rename_variables<F>(&self, rename: &F) -> Expr
    where
        F: Fn(&str) -> String,
    {
        match self {
            Expr::Num(n) => Expr::Num(*n),
            Expr::Var(name) => Expr::Var(rename(name)),
            Expr::Neg(inner) => Expr::Neg(Box::new(inner.rename_variables(rename))),
            Expr::Binary(op, l, r) => Expr::Binary(
                *op,
                Box::new(l.rename_variables(rename)),
                Box::new(r.rename_variables(rename)),
            ),
            Expr::Call(func, args) => {
                Expr::Call(*func, args.iter().map(|a| a.rename_variables(rename)).collect())
            }
        }
    }
}

/// Evaluation failure, reported as a failed goal
#[derive(Debug, Clone, PartialEq)]
pub struct EvalError {
    pub message: String,
}

impl EvalError {
    fn new(message: impl Into<String>) -> Self {
        EvalError {
            message: message.into(),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EvalError {}

// ===== Parsing =====

impl Parser {
    /// Parse an arithmetic expression (top-level entry point)
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_token() {
                Token::Symbol(ref s, _) if s == "+" => BinOp::Add,
                Token::Symbol(ref s, _) if s == "-" => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_token() {
                Token::Symbol(ref s, _) => match s.as_str() {
                    "*" => BinOp::Mul,
                    "/" => BinOp::Div,
                    "//" => BinOp::FloorDiv,
                    "%" => BinOp::Mod,
                    _ => break,
                },
                Token::Atom(ref name, _) if name == "mod" => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        match self.peek_token() {
            Token::Symbol(ref s, _) if s == "-" => {
                self.advance();
                Ok(Expr::Neg(Box::new(self.parse_unary()?)))
            }
            Token::Symbol(ref s, _) if s == "+" => {
                self.advance();
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_primary()?;
        if self.peek_token().is_symbol("**") {
            self.advance();
            let exponent = self.parse_unary()?;
            return Ok(Expr::Binary(BinOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.advance();
        match token {
            Token::Int(n, _) => Ok(Expr::Num(Number::Int(n))),
            Token::Float(x, _) => Ok(Expr::Num(Number::Float(x))),
            Token::Variable(name, _) => Ok(Expr::Var(name)),
            Token::LParen(_) => {
                let inner = self.parse_expr()?;
                match self.advance() {
                    Token::RParen(_) => Ok(inner),
                    other => Err(self.error_at(&other, "expected ')'")),
                }
            }
            Token::Atom(ref name, _) => {
                let Some(func) = Func::from_name(name) else {
                    return Err(self.error_at(&token, "unknown arithmetic function"));
                };
                match self.advance() {
                    Token::LParen(_) => {}
                    other => return Err(self.error_at(&other, "expected '(' after function name")),
                }
                let mut args = vec![self.parse_expr()?];
                loop {
                    match self.advance() {
                        Token::Comma(_) => args.push(self.parse_expr()?),
                        Token::RParen(_) => break,
                        other => return Err(self.error_at(&other, "expected ',' or ')'")),
                    }
                }
                Ok(Expr::Call(func, args))
            }
            other => Err(self.error_at(&other, "expected a number, variable or '('")),
        }
    }
}

// ===== Evaluation =====

/// Evaluate an expression under the given bindings
pub fn eval(expr: &Expr, bindings: &Bindings) -> Result<Number, EvalError> {
    match expr {
        Expr::Num(n) => Ok(*n),
        Expr::Var(name) => match bindings.resolve(&Term::Variable(name.clone())) {
            Term::Number(n) => Ok(n),
            Term::Variable(_) => Err(EvalError::new(format!(
                "arguments are not sufficiently instantiated: {}",
                name
            ))),
            other => Err(EvalError::new(format!("{} is not a number", other))),
        },
        Expr::Neg(inner) => match eval(inner, bindings)? {
            Number::Int(n) => n
                .checked_neg()
                .map(Number::Int)
                .ok_or_else(|| EvalError::new("integer overflow")),
            Number::Float(x) => Ok(Number::Float(-x)),
        },
        Expr::Binary(op, l, r) => {
            let left = eval(l, bindings)?;
            let right = eval(r, bindings)?;
            apply_binary(*op, left, right)
        }
        Expr::Call(func, args) => {
            let values = args
                .iter()
                .map(|a| eval(a, bindings))
                .collect::<Result<Vec<_>, _>>()?;
            apply_func(*func, &values)
        }
    }
}

fn overflow() -> EvalError {
    EvalError::new("integer overflow")
}

fn apply_binary(op: BinOp, left: Number, right: Number) -> Result<Number, EvalError> {
    use Number::{Float, Int};

    match (op, left, right) {
        (BinOp::Add, Int(a), Int(b)) => a.checked_add(b).map(Int).ok_or_else(overflow),
        (BinOp::Sub, Int(a), Int(b)) => a.checked_sub(b).map(Int).ok_or_else(overflow),
        (BinOp::Mul, Int(a), Int(b)) => a.checked_mul(b).map(Int).ok_or_else(overflow),
        (BinOp::Add, a, b) => Ok(Float(a.as_f64() + b.as_f64())),
        (BinOp::Sub, a, b) => Ok(Float(a.as_f64() - b.as_f64())),
        (BinOp::Mul, a, b) => Ok(Float(a.as_f64() * b.as_f64())),

        (BinOp::Div, a, b) => {
            if b.as_f64() == 0.0 {
                return Err(EvalError::new("division by zero"));
            }
            Ok(Float(a.as_f64() / b.as_f64()))
        }

        (BinOp::FloorDiv, Int(a), Int(b)) => {
            if b == 0 {
                return Err(EvalError::new("integer division by zero"));
            }
            let q = a.checked_div(b).ok_or_else(overflow)?;
            Ok(Int(if a % b != 0 && ((a < 0) != (b < 0)) { q - 1 } else { q }))
        }
        (BinOp::FloorDiv, a, b) => {
            if b.as_f64() == 0.0 {
                return Err(EvalError::new("division by zero"));
            }
            Ok(Float((a.as_f64() / b.as_f64()).floor()))
        }

        // Floored modulo: the result takes the sign of the divisor
        (BinOp::Mod, Int(a), Int(b)) => {
            if b == 0 {
                return Err(EvalError::new("modulo by zero"));
            }
            let r = a.checked_rem(b).ok_or_else(overflow)?;
            Ok(Int(if r != 0 && ((r < 0) != (b < 0)) { r + b } else { r }))
        }
        (BinOp::Mod, a, b) => {
            let (a, b) = (a.as_f64(), b.as_f64());
            if b == 0.0 {
                return Err(EvalError::new("modulo by zero"));
            }
            let r = a % b;
            Ok(Float(if r != 0.0 && ((r < 0.0) != (b < 0.0)) { r + b } else { r }))
        }

        (BinOp::Pow, Int(a), Int(b)) if b >= 0 => {
            let exp = u32::try_from(b).map_err(|_| overflow())?;
            a.checked_pow(exp).map(Int).ok_or_else(overflow)
        }
        (BinOp::Pow, a, b) => {
            if a.as_f64() == 0.0 && b.as_f64() < 0.0 {
                return Err(EvalError::new("zero raised to a negative power"));
            }
            Ok(Float(a.as_f64().powf(b.as_f64())))
        }
    }
}

fn apply_func(func: Func, args: &[Number]) -> Result<Number, EvalError> {
    let arity_error = || EvalError::new(format!("wrong number of arguments to {}", func.name()));

    match func {
        Func::Max | Func::Min => {
            let (first, rest) = args.split_first().ok_or_else(arity_error)?;
            let mut best = *first;
            for &candidate in rest {
                let better = if func == Func::Max {
                    CompareOp::Gt.holds(candidate, best)
                } else {
                    CompareOp::Lt.holds(candidate, best)
                };
                if better {
                    best = candidate;
                }
            }
            Ok(best)
        }
        _ => {
            let [x] = args else {
                return Err(arity_error());
            };
            let x = *x;
            match func {
                Func::Abs => match x {
                    Number::Int(n) => n.checked_abs().map(Number::Int).ok_or_else(overflow),
                    Number::Float(f) => Ok(Number::Float(f.abs())),
                },
                Func::Round => to_int(round_half_even(x.as_f64())),
                Func::Int => match x {
                    Number::Int(n) => Ok(Number::Int(n)),
                    Number::Float(f) => to_int(f.trunc()),
                },
                Func::Float => Ok(Number::Float(x.as_f64())),
                Func::Sin => Ok(Number::Float(x.as_f64().sin())),
                Func::Cos => Ok(Number::Float(x.as_f64().cos())),
                Func::Sqrt => {
                    if x.as_f64() < 0.0 {
                        return Err(EvalError::new("math domain error in sqrt"));
                    }
                    Ok(Number::Float(x.as_f64().sqrt()))
                }
                Func::Max | Func::Min => Err(arity_error()),
            }
        }
    }
}

/// Round to nearest, ties to even
fn round_half_even(x: f64) -> f64 {
    let floor = x.floor();
    let diff = x - floor;
    if diff > 0.5 {
        floor + 1.0
    } else if diff < 0.5 {
        floor
    } else if floor % 2.0 == 0.0 {
        floor
    } else {
        floor + 1.0
    }
}

fn to_int(x: f64) -> Result<Number, EvalError> {
    if !x.is_finite() || x.abs() >= 9.2e18 {
        return Err(EvalError::new("cannot convert to integer"));
    }
    Ok(Number::Int(x as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Expr {
        let mut parser = Parser::new(text).unwrap();
        let expr = parser.parse_expr().unwrap();
        parser.expect_end().unwrap();
        expr
    }

    fn eval_str(text: &str) -> Result<Number, EvalError> {
        eval(&parse(text), &Bindings::new())
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval_str("2 + 3 * 4").unwrap(), Number::Int(14));
        assert_eq!(eval_str("(2 + 3) * 4").unwrap(), Number::Int(20));
        assert_eq!(eval_str("10 - 4 - 3").unwrap(), Number::Int(3));
        assert_eq!(eval_str("2 ** 3 ** 2").unwrap(), Number::Int(512));
        assert_eq!(eval_str("-2 ** 2").unwrap(), Number::Int(-4));
    }

    #[test]
    fn test_division_and_modulo() {
        assert_eq!(eval_str("7 / 2").unwrap(), Number::Float(3.5));
        assert_eq!(eval_str("7 // 2").unwrap(), Number::Int(3));
        assert_eq!(eval_str("-7 // 2").unwrap(), Number::Int(-4));
        assert_eq!(eval_str("-7 mod 3").unwrap(), Number::Int(2));
        assert_eq!(eval_str("7 % -3").unwrap(), Number::Int(-2));
        assert!(eval_str("1 / 0").is_err());
        assert!(eval_str("1 mod 0").is_err());
    }

    #[test]
    fn test_functions() {
        assert_eq!(eval_str("abs(-3)").unwrap(), Number::Int(3));
        assert_eq!(eval_str("round(2.5)").unwrap(), Number::Int(2));
        assert_eq!(eval_str("round(3.5)").unwrap(), Number::Int(4));
        assert_eq!(eval_str("int(-2.7)").unwrap(), Number::Int(-2));
        assert_eq!(eval_str("max(1, 5, 3)").unwrap(), Number::Int(5));
        assert_eq!(eval_str("min(2, 1.5)").unwrap(), Number::Float(1.5));
        assert_eq!(eval_str("sqrt(16)").unwrap(), Number::Float(4.0));
        assert!(eval_str("sqrt(-1)").is_err());
        assert!(eval_str("abs(1, 2)").is_err());
    }

    #[test]
    fn test_unknown_names_rejected() {
        let mut parser = Parser::new("system(1)").unwrap();
        assert!(parser.parse_expr().is_err());
        let mut parser = Parser::new("foo").unwrap();
        assert!(parser.parse_expr().is_err());
    }

    #[test]
    fn test_variables() {
        let bindings = Bindings::new().bind("X", Term::int(4));
        assert_eq!(eval(&parse("X * 2"), &bindings).unwrap(), Number::Int(8));
        assert!(eval(&parse("Y + 1"), &bindings).is_err());

        let bindings = Bindings::new().bind("X", Term::atom("a"));
        assert!(eval(&parse("X + 1"), &bindings).is_err());
    }

    #[test]
    fn test_compare() {
        assert!(CompareOp::Eq.holds(Number::Int(1), Number::Float(1.0)));
        assert!(CompareOp::Le.holds(Number::Int(2), Number::Int(2)));
        assert!(!CompareOp::Gt.holds(Number::Float(1.5), Number::Int(2)));
        assert!(CompareOp::Ne.holds(Number::Float(f64::NAN), Number::Float(f64::NAN)));
    }
}
