//! Word dictionary
//!
//! Maps upper-cased word names to a [`Word`]: either one of the fixed
//! [`Builtin`] operations or a user definition (the token sequence captured
//! between `:` and `;`). Redefining a name replaces the previous entry.

use rustc_hash::FxHashMap;

/// Built-in operations, matched by name when the dictionary is seeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    // Stack manipulation
    Dup,
    Drop,
    Swap,
    Over,
    Rot,
    Nip,
    Tuck,
    TwoDup,
    TwoDrop,
    TwoSwap,
    Clear,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Negate,
    Abs,
    Min,
    Max,

    // Comparison
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
    Ne,
    ZeroEq,
    ZeroLt,
    ZeroGt,

    // Bitwise / logic
    And,
    Or,
    Xor,
    Invert,
    Not,

    // I/O
    Print,
    PrintStack,
    Cr,
    Emit,
    Spaces,
    Words,

    // Math
    Sin,
    Cos,
    Tan,
    Sqrt,
    Log,
    Exp,

    // Stack queries
    Depth,
    Pick,
    Roll,

    // Named constants
    True,
    False,
    Pi,
    E,

    // Recognised but inert
    Variable,
    Constant,
    Store,
    Fetch,
}

impl Builtin {
    pub const ALL: &'static [Builtin] = &[
        Builtin::Dup,
        Builtin::Drop,
        Builtin::Swap,
        Builtin::Over,
        Builtin::Rot,
        Builtin::Nip,
        Builtin::Tuck,
        Builtin::TwoDup,
        Builtin::TwoDrop,
        Builtin::TwoSwap,
        Builtin::Clear,
        Builtin::Add,
        Builtin::Sub,
        Builtin::Mul,
        Builtin::Div,
        Builtin::Mod,
        Builtin::Negate,
        Builtin::Abs,
        Builtin::Min,
        Builtin::Max,
        Builtin::Eq,
        Builtin::Lt,
        Builtin::Gt,
        Builtin::Le,
        Builtin::Ge,
        Builtin::Ne,
        Builtin::ZeroEq,
        Builtin::ZeroLt,
        Builtin::ZeroGt,
        Builtin::And,
        Builtin::Or,
        Builtin::Xor,
        Builtin::Invert,
        Builtin::Not,
        Builtin::Print,
        Builtin::PrintStack,
        Builtin::Cr,
        Builtin::Emit,
        Builtin::Spaces,
        Builtin::Words,
        Builtin::Sin,
        Builtin::Cos,
        Builtin::Tan,
        Builtin::Sqrt,
        Builtin::Log,
        Builtin::Exp,
        Builtin::Depth,
        Builtin::Pick,
        Builtin::Roll,
        Builtin::True,
        Builtin::False,
        Builtin::Pi,
        Builtin::E,
        Builtin::Variable,
        Builtin::Constant,
        Builtin::Store,
        Builtin::Fetch,
    ];

    /// Canonical (upper-case) name
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Dup => "DUP",
            Builtin::Drop => "DROP",
            Builtin::Swap => "SWAP",
            Builtin::Over => "OVER",
            Builtin::Rot => "ROT",
            Builtin::Nip => "NIP",
            Builtin::Tuck => "TUCK",
            Builtin::TwoDup => "2DUP",
            Builtin::TwoDrop => "2DROP",
            Builtin::TwoSwap => "2SWAP",
            Builtin::Clear => "CLEAR",
            Builtin::Add => "+",
            Builtin::Sub => "-",
            Builtin::Mul => "*",
            Builtin::Div => "/",
            Builtin::Mod => "MOD",
            Builtin::Negate => "NEGATE",
            Builtin::Abs => "ABS",
            Builtin::Min => "MIN",
            Builtin::Max => "MAX",
            Builtin::Eq => "=",
            Builtin::Lt => "<",
            Builtin::Gt => ">",
            Builtin::Le => "<=",
            Builtin::Ge => ">=",
            Builtin::Ne => "<>",
            Builtin::ZeroEq => "0=",
            Builtin::ZeroLt => "0<",
            Builtin::ZeroGt => "0>",
            Builtin::And => "AND",
            Builtin::Or => "OR",
            Builtin::Xor => "XOR",
            Builtin::Invert => "INVERT",
            Builtin::Not => "NOT",
            Builtin::Print => ".",
            Builtin::PrintStack => ".S",
            Builtin::Cr => "CR",
            Builtin::Emit => "EMIT",
            Builtin::Spaces => "SPACES",
            Builtin::Words => "WORDS",
            Builtin::Sin => "SIN",
            Builtin::Cos => "COS",
            Builtin::Tan => "TAN",
            Builtin::Sqrt => "SQRT",
            Builtin::Log => "LOG",
            Builtin::Exp => "EXP",
            Builtin::Depth => "DEPTH",
            Builtin::Pick => "PICK",
            Builtin::Roll => "ROLL",
            Builtin::True => "TRUE",
            Builtin::False => "FALSE",
            Builtin::Pi => "PI",
            Builtin::E => "E",
            Builtin::Variable => "VARIABLE",
            Builtin::Constant => "CONSTANT",
            Builtin::Store => "!",
            Builtin::Fetch => "@",
        }
    }

    /// Look up a built-in by its canonical name
    pub fn from_name(name: &str) -> Option<Builtin> {
        Builtin::ALL.iter().copied().find(|b| b.name() == name)
    }

    /// Minimum stack depth the operation needs before it runs
    pub fn arity(self) -> usize {
        match self {
            Builtin::Clear
            | Builtin::PrintStack
            | Builtin::Cr
            | Builtin::Words
            | Builtin::Depth
            | Builtin::True
            | Builtin::False
            | Builtin::Pi
            | Builtin::E
            | Builtin::Variable
            | Builtin::Constant
            | Builtin::Store
            | Builtin::Fetch => 0,
            Builtin::Dup
            | Builtin::Drop
            | Builtin::Negate
            | Builtin::Abs
            | Builtin::ZeroEq
            | Builtin::ZeroLt
            | Builtin::ZeroGt
            | Builtin::Invert
            | Builtin::Not
            | Builtin::Print
            | Builtin::Emit
            | Builtin::Spaces
            | Builtin::Sin
            | Builtin::Cos
            | Builtin::Tan
            | Builtin::Sqrt
            | Builtin::Log
            | Builtin::Exp
            | Builtin::Pick
            | Builtin::Roll => 1,
            Builtin::Swap
            | Builtin::Over
            | Builtin::Nip
            | Builtin::Tuck
            | Builtin::TwoDrop
            | Builtin::Add
            | Builtin::Sub
            | Builtin::Mul
            | Builtin::Div
            | Builtin::Mod
            | Builtin::Min
            | Builtin::Max
            | Builtin::Eq
            | Builtin::Lt
            | Builtin::Gt
            | Builtin::Le
            | Builtin::Ge
            | Builtin::Ne
            | Builtin::And
            | Builtin::Or
            | Builtin::Xor
            | Builtin::TwoDup => 2,
            Builtin::Rot => 3,
            Builtin::TwoSwap => 4,
        }
    }
}

/// An executable dictionary entry
#[derive(Debug, Clone, PartialEq)]
pub enum Word {
    Builtin(Builtin),
    /// Tokens replayed, one by one, when the word is invoked
    User(Vec<String>),
}

/// Name → word mapping, seeded with every built-in
#[derive(Debug, Clone)]
pub struct Dictionary {
    words: FxHashMap<String, Word>,
}

impl Dictionary {
    pub fn new() -> Self {
        let mut words = FxHashMap::default();
        for builtin in Builtin::ALL {
            words.insert(builtin.name().to_string(), Word::Builtin(*builtin));
        }
        Dictionary { words }
    }

    /// Look up a word; the name is upper-cased first
    pub fn get(&self, name: &str) -> Option<&Word> {
        self.words.get(&name.to_uppercase())
    }

    /// Install or replace a user definition
    pub fn define(&mut self, name: &str, body: Vec<String>) {
        self.words.insert(name.to_uppercase(), Word::User(body));
    }

    /// All names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.words.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// User definitions, sorted by name
    pub fn user_words(&self) -> Vec<(&str, &[String])> {
        let mut words: Vec<(&str, &[String])> = self
            .words
            .iter()
            .filter_map(|(name, word)| match word {
                Word::User(body) => Some((name.as_str(), body.as_slice())),
                Word::Builtin(_) => None,
            })
            .collect();
        words.sort_unstable_by(|a, b| a.0.cmp(b.0));
        words
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}
