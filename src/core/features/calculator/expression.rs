//! Whitelisted arithmetic expressions
//!
//! Grammar (lowest to highest precedence):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary ('^' unary)?          right-associative, `**` is accepted for `^`
//! primary := number | 'x' | 'pi' | 'e' | function '(' args ')' | '(' expr ')'
//! ```
//!
//! Only the functions listed in [`Function`] exist. Nothing is ever looked up
//! dynamically, so an expression can do no more than compute a number.

use std::f64::consts::{E, PI};
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::shared::errors::{CalcError, CalcResult};

/// Nesting limit for parentheses, unary operators and exponents
const MAX_DEPTH: usize = 128;

/// Limit on `+ - * /` operators, which chain without nesting
const MAX_OPERATORS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Exp,
    Log,
    Log10,
    Sqrt,
    Abs,
    Floor,
    Ceil,
    Pow,
}

impl Function {
    pub const ALL: [Function; 14] = [
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Asin,
        Function::Acos,
        Function::Atan,
        Function::Exp,
        Function::Log,
        Function::Log10,
        Function::Sqrt,
        Function::Abs,
        Function::Floor,
        Function::Ceil,
        Function::Pow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Exp => "exp",
            Function::Log => "log",
            Function::Log10 => "log10",
            Function::Sqrt => "sqrt",
            Function::Abs => "abs",
            Function::Floor => "floor",
            Function::Ceil => "ceil",
            Function::Pow => "pow",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// `log(x, base)` takes an optional base, `pow(a, b)` two arguments
    fn arity(self) -> RangeInclusive<usize> {
        match self {
            Function::Log => 1..=2,
            Function::Pow => 2..=2,
            _ => 1..=1,
        }
    }

    fn apply(self, args: &[f64]) -> f64 {
        let a = args[0];
        match self {
            Function::Sin => a.sin(),
            Function::Cos => a.cos(),
            Function::Tan => a.tan(),
            Function::Asin => a.asin(),
            Function::Acos => a.acos(),
            Function::Atan => a.atan(),
            Function::Exp => a.exp(),
            Function::Log => match args.get(1) {
                Some(base) => a.ln() / base.ln(),
                None => a.ln(),
            },
            Function::Log10 => a.log10(),
            Function::Sqrt => a.sqrt(),
            Function::Abs => a.abs(),
            Function::Floor => a.floor(),
            Function::Ceil => a.ceil(),
            Function::Pow => a.powf(args[1]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Number(f64),
    Variable,
    Neg(Box<Node>),
    Binary(BinaryOp, Box<Node>, Box<Node>),
    Call(Function, Vec<Node>),
}

impl Node {
    fn eval(&self, x: Option<f64>) -> CalcResult<f64> {
        Ok(match self {
            Node::Number(n) => *n,
            Node::Variable => x.ok_or(CalcError::UnboundVariable)?,
            Node::Neg(inner) => -inner.eval(x)?,
            Node::Binary(op, lhs, rhs) => {
                let (a, b) = (lhs.eval(x)?, rhs.eval(x)?);
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                    BinaryOp::Pow => a.powf(b),
                }
            }
            Node::Call(function, args) => {
                let values = args.iter().map(|arg| arg.eval(x)).collect::<CalcResult<Vec<_>>>()?;
                function.apply(&values)
            }
        })
    }
}

// ============================================================================
// Tokenizer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Comma,
}

fn tokenize(input: &str) -> CalcResult<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // Exponent only when digits follow, so "2e" stays a number and an identifier
                if i < chars.len() && matches!(chars[i], 'e' | 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && matches!(chars[j], '+' | '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| CalcError::Parse(format!("invalid number '{}'", text)))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::Caret);
                i += 2;
            }
            _ => {
                tokens.push(match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '^' => Token::Caret,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    ',' => Token::Comma,
                    other => {
                        return Err(CalcError::Parse(format!("unexpected character '{}' at position {}", other, i)))
                    }
                });
                i += 1;
            }
        }
    }

    Ok(tokens)
}

// ============================================================================
// Parser
// ============================================================================

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    operators: usize,
    uses_variable: bool,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn descend(&mut self) -> CalcResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::Parse("expression is nested too deeply".to_string()));
        }
        Ok(())
    }

    fn binary(&mut self, op: BinaryOp, lhs: Node, rhs: Node) -> CalcResult<Node> {
        self.operators += 1;
        if self.operators > MAX_OPERATORS {
            return Err(CalcError::Parse("expression is too long".to_string()));
        }
        Ok(Node::Binary(op, Box::new(lhs), Box::new(rhs)))
    }

    fn expression(&mut self) -> CalcResult<Node> {
        let mut node = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(node),
            };
            self.pos += 1;
            let rhs = self.term()?;
            node = self.binary(op, node, rhs)?;
        }
    }

    fn term(&mut self) -> CalcResult<Node> {
        let mut node = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(node),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            node = self.binary(op, node, rhs)?;
        }
    }

    fn unary(&mut self) -> CalcResult<Node> {
        self.descend()?;
        let node = if self.eat(&Token::Minus) {
            Node::Neg(Box::new(self.unary()?))
        } else if self.eat(&Token::Plus) {
            self.unary()?
        } else {
            self.power()?
        };
        self.depth -= 1;
        Ok(node)
    }

    fn power(&mut self) -> CalcResult<Node> {
        let base = self.primary()?;
        if self.eat(&Token::Caret) {
            let exponent = self.unary()?;
            return Ok(Node::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn primary(&mut self) -> CalcResult<Node> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Node::Number(n)),
            Some(Token::LParen) => {
                let node = self.expression()?;
                if !self.eat(&Token::RParen) {
                    return Err(CalcError::Parse("missing ')'".to_string()));
                }
                Ok(node)
            }
            Some(Token::Ident(name)) => self.identifier(&name),
            Some(token) => Err(CalcError::Parse(format!("unexpected token {:?}", token))),
            None => Err(CalcError::Parse("unexpected end of expression".to_string())),
        }
    }

    fn identifier(&mut self, name: &str) -> CalcResult<Node> {
        match name {
            "x" => {
                self.uses_variable = true;
                return Ok(Node::Variable);
            }
            "pi" => return Ok(Node::Number(PI)),
            "e" => return Ok(Node::Number(E)),
            _ => {}
        }

        let function = Function::from_name(name)
            .ok_or_else(|| CalcError::Parse(format!("unknown identifier '{}'", name)))?;
        if !self.eat(&Token::LParen) {
            return Err(CalcError::Parse(format!("function '{}' must be called with '('", name)));
        }

        let mut args = Vec::new();
        if !self.eat(&Token::RParen) {
            loop {
                args.push(self.expression()?);
                if self.eat(&Token::Comma) {
                    continue;
                }
                if self.eat(&Token::RParen) {
                    break;
                }
                return Err(CalcError::Parse(format!("expected ',' or ')' in call to '{}'", name)));
            }
        }

        if !function.arity().contains(&args.len()) {
            return Err(CalcError::Parse(format!(
                "function '{}' takes {} argument(s), got {}",
                name,
                arity_text(function.arity()),
                args.len()
            )));
        }
        Ok(Node::Call(function, args))
    }
}

fn arity_text(arity: RangeInclusive<usize>) -> String {
    if arity.start() == arity.end() {
        arity.start().to_string()
    } else {
        format!("{} to {}", arity.start(), arity.end())
    }
}

/// A parsed expression, reusable across evaluations
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    root: Node,
    uses_variable: bool,
}

impl Expression {
    pub fn parse(input: &str) -> CalcResult<Self> {
        let tokens = tokenize(input)?;
        if tokens.is_empty() {
            return Err(CalcError::Parse("empty expression".to_string()));
        }

        let mut parser = Parser { tokens, pos: 0, depth: 0, operators: 0, uses_variable: false };
        let root = parser.expression()?;
        if let Some(token) = parser.peek() {
            return Err(CalcError::Parse(format!("unexpected trailing token {:?}", token)));
        }

        Ok(Self { root, uses_variable: parser.uses_variable })
    }

    /// Whether the expression mentions `x`
    pub fn uses_variable(&self) -> bool {
        self.uses_variable
    }

    /// Evaluate with an optional binding for `x`. The result may be non-finite.
    pub fn eval(&self, x: Option<f64>) -> CalcResult<f64> {
        self.root.eval(x)
    }

    pub fn eval_at(&self, x: f64) -> CalcResult<f64> {
        self.eval(Some(x))
    }
}

impl FromStr for Expression {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
