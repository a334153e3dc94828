use crate::token::{BinOp, Func, Slot, Token};
use lexers::{LexError, Scanner, scan_math_op, scan_number};
use log::debug;
use std::f64::consts;
use std::ops::Deref;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("expected an operand at position {0}")]
    ExpectedOperand(usize),
    #[error("expected an operator at position {0}")]
    ExpectedOperator(usize),
    #[error("unary minus can't be doubled or followed by a space (position {0})")]
    BadUnaryMinus(usize),
    #[error("malformed call to '{name}' at position {pos}")]
    BadCall { name: &'static str, pos: usize },
    #[error("missing closing paren")]
    MissingCParen,
    #[error("missing opening paren for ')' at position {0}")]
    MissingOParen(usize),
    #[error("comma outside of a function call at position {0}")]
    MisplacedComma(usize),
    #[error("unexpected input at position {0}")]
    TrailingInput(usize),
    #[error("expression nested deeper than {0} calls")]
    TooDeep(usize),
    #[error(transparent)]
    Lex(#[from] LexError),
}

static OPERATORS: &[char] = &[',', '(', ')', '+', '-', '*', '/', '^'];

/// Operators as seen by the shunting yard, `Neg` is only ever produced by
/// the parser when a '-' shows up where an operand was expected.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Operator {
    Comma,
    OParen,
    CParen,
    Neg,
    Bin(BinOp),
}

impl Operator {
    pub fn from_char(c: char) -> Option<Operator> {
        match c {
            ',' => Some(Operator::Comma),
            '(' => Some(Operator::OParen),
            ')' => Some(Operator::CParen),
            '+' => Some(Operator::Bin(BinOp::Add)),
            '-' => Some(Operator::Bin(BinOp::Sub)),
            '*' => Some(Operator::Bin(BinOp::Mul)),
            '/' => Some(Operator::Bin(BinOp::Div)),
            '^' => Some(Operator::Bin(BinOp::Pow)),
            _ => None,
        }
    }

    pub fn precedence(self) -> usize {
        // Unary minus binds tighter than * and / but looser than ^, so
        // -2^2 is -(2^2) while -2*3 is (-2)*3.
        match self {
            Operator::Comma | Operator::OParen | Operator::CParen => 0,
            Operator::Bin(BinOp::Add) | Operator::Bin(BinOp::Sub) => 1,
            Operator::Bin(BinOp::Mul) | Operator::Bin(BinOp::Div) => 2,
            Operator::Neg => 3,
            Operator::Bin(BinOp::Pow) => 4,
        }
    }

    fn token(self) -> Option<Token> {
        match self {
            Operator::Neg => Some(Token::Neg),
            Operator::Bin(op) => Some(Token::BOp(op)),
            _ => None,
        }
    }
}

/// A postfix sequence. Only the parser and the combinators below build
/// them, so every sequence is closed: it leaves exactly one value on the
/// stack. The empty sequence stands for zero.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct RPNExpr(pub(crate) Vec<Token>);

impl Deref for RPNExpr {
    type Target = [Token];
    fn deref(&self) -> &[Token] {
        &self.0
    }
}

impl RPNExpr {
    /// Postfix concatenation equivalent to `lhs op rhs`.
    pub fn merge(lhs: &RPNExpr, rhs: &RPNExpr, op: BinOp) -> RPNExpr {
        fn operand(e: &RPNExpr) -> Vec<Token> {
            if e.is_empty() {
                vec![Token::Number(0.0)]
            } else {
                e.0.clone()
            }
        }
        let mut out = operand(lhs);
        out.extend(operand(rhs));
        out.push(Token::BOp(op));
        RPNExpr(out)
    }

    /// Rebuild the sequence replacing every variable reference, nested
    /// function arguments included.
    pub fn map_vars<F: Fn(Slot) -> Token>(&self, f: &F) -> RPNExpr {
        let tokens = self
            .iter()
            .map(|token| match token {
                Token::Var(slot) => f(*slot),
                Token::Func(func, arg) => Token::Func(*func, arg.map_vars(f)),
                Token::Log(base, arg) => Token::Log(base.map_vars(f), arg.map_vars(f)),
                other => other.clone(),
            })
            .collect();
        RPNExpr(tokens)
    }

    /// Bind the independent variable to `value` and turn the dependent
    /// variable into the independent one.
    pub fn substitute(&self, value: f64) -> RPNExpr {
        self.map_vars(&|slot| match slot {
            Slot::Independent => Token::Number(value),
            Slot::Dependent => Token::Var(Slot::Independent),
        })
    }
}

impl FromStr for RPNExpr {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShuntingParser::parse_str(s)
    }
}

/// Infix to postfix converter.
///
/// Configured with the names of the free variables: the first one is the
/// independent variable, an optional second one is the dependent variable
/// of implicit forms.
#[derive(Clone, Debug)]
pub struct ShuntingParser {
    vars: Vec<(String, Slot)>,
    max_depth: usize,
}

impl Default for ShuntingParser {
    fn default() -> Self {
        ShuntingParser::new("x")
    }
}

impl ShuntingParser {
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    pub fn new(var: &str) -> Self {
        ShuntingParser {
            vars: vec![(var.to_string(), Slot::Independent)],
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    pub fn implicit(independent: &str, dependent: &str) -> Self {
        ShuntingParser {
            vars: vec![
                (independent.to_string(), Slot::Independent),
                (dependent.to_string(), Slot::Dependent),
            ],
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit how deep function calls may nest inside each other.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Parse an expression in `x`.
    pub fn parse_str(expr: &str) -> Result<RPNExpr, ParseError> {
        ShuntingParser::default().parse(expr)
    }

    pub fn parse(&self, expr: &str) -> Result<RPNExpr, ParseError> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Ok(RPNExpr::default());
        }
        let mut scanner = Scanner::new(expr);
        let parsed = self.build_postfix(&mut scanner, 0).and_then(|rpn| {
            // the builder stops early on ')' and ',' at depth 0
            let pos = scanner.pos();
            match scanner.peek() {
                None => Ok(rpn),
                Some(')') => Err(ParseError::MissingOParen(pos)),
                Some(',') => Err(ParseError::MisplacedComma(pos)),
                Some(_) => Err(ParseError::TrailingInput(pos)),
            }
        });
        if let Err(ref e) = parsed {
            debug!("rejected expression {:?}: {}", expr, e);
        }
        parsed
    }

    /// Shunting yard over the scanner. Returns when the input ends or when
    /// an unmatched ')' or a ',' closes the current (sub)expression, in
    /// which case that char is left for the caller to consume.
    fn build_postfix(&self, scanner: &mut Scanner, depth: usize) -> Result<RPNExpr, ParseError> {
        if depth > self.max_depth {
            return Err(ParseError::TooDeep(self.max_depth));
        }
        let mut out = Vec::new();
        let mut stack: Vec<Operator> = Vec::new();
        let mut parens = 0usize;
        let mut expecting_operand = true;
        let mut after_neg = false;

        while !scanner.at_end() {
            if expecting_operand {
                if let Some(operand) = self.scan_operand(scanner, depth)? {
                    out.push(operand);
                    after_neg = false;
                    expecting_operand = false;
                    continue;
                }
                match scan_operator(scanner) {
                    Some(Operator::Bin(BinOp::Sub)) => {
                        // reject '--x' and '- x'
                        if after_neg || scanner.peek() == Some(' ') {
                            return Err(ParseError::BadUnaryMinus(scanner.pos() - 1));
                        }
                        after_neg = true;
                        stack.push(Operator::Neg);
                    }
                    Some(Operator::OParen) => {
                        after_neg = false;
                        parens += 1;
                        stack.push(Operator::OParen);
                    }
                    Some(_) => return Err(ParseError::ExpectedOperand(scanner.pos() - 1)),
                    None if scanner.at_end() => return Err(ParseError::UnexpectedEnd),
                    None => return Err(ParseError::ExpectedOperand(scanner.pos())),
                }
                continue;
            }

            match scan_operator(scanner) {
                None | Some(Operator::OParen) | Some(Operator::Neg) => {
                    return Err(ParseError::ExpectedOperator(scanner.pos()));
                }
                Some(Operator::CParen) => {
                    while let Some(top) = stack.pop() {
                        if top == Operator::OParen {
                            break;
                        }
                        out.extend(top.token());
                    }
                    if parens == 0 {
                        scanner.set_pos(scanner.pos() - 1);
                        return Ok(RPNExpr(out));
                    }
                    parens -= 1;
                }
                Some(Operator::Comma) => {
                    if parens > 0 {
                        return Err(ParseError::MisplacedComma(scanner.pos() - 1));
                    }
                    while let Some(top) = stack.pop() {
                        out.extend(top.token());
                    }
                    scanner.set_pos(scanner.pos() - 1);
                    return Ok(RPNExpr(out));
                }
                Some(op) => {
                    let prec = op.precedence();
                    // left associative: pop on equal precedence too
                    while let Some(&top) = stack.last() {
                        if top.precedence() < prec {
                            break;
                        }
                        stack.pop();
                        out.extend(top.token());
                    }
                    stack.push(op);
                    expecting_operand = true;
                }
            }
        }

        if expecting_operand {
            return Err(ParseError::UnexpectedEnd);
        }
        if parens > 0 {
            return Err(ParseError::MissingCParen);
        }
        while let Some(top) = stack.pop() {
            out.extend(top.token());
        }
        Ok(RPNExpr(out))
    }

    /// Try to read an operand: a variable, a constant, a number or a
    /// function call. `Ok(None)` means the input doesn't start with one.
    fn scan_operand(
        &self,
        scanner: &mut Scanner,
        depth: usize,
    ) -> Result<Option<Token>, ParseError> {
        if !scanner.skip_spaces() {
            return Ok(None);
        }
        for (name, slot) in self.vars.iter() {
            if !name.is_empty() && scanner.accept_word(name) {
                return Ok(Some(Token::Var(*slot)));
            }
        }
        if scanner.accept('e').is_some() {
            return Ok(Some(Token::Number(consts::E)));
        }
        if scanner.accept_word("pi") {
            return Ok(Some(Token::Number(consts::PI)));
        }
        let start = scanner.pos();
        if let Some(num) = scan_number(scanner)? {
            return match f64::from_str(&num) {
                Ok(n) => Ok(Some(Token::Number(n))),
                Err(_) => Err(LexError::MalformedNumber { lexeme: num, pos: start }.into()),
            };
        }
        for func in Func::ALL {
            if scanner.accept_word(func.name()) {
                let arg = self.call_argument(scanner, func.name(), '(', depth)?;
                self.close_call(scanner, func.name())?;
                return Ok(Some(Token::Func(func, arg)));
            }
        }
        if scanner.accept_word("log") {
            let base = self.call_argument(scanner, "log", '(', depth)?;
            let arg = self.call_argument(scanner, "log", ',', depth)?;
            self.close_call(scanner, "log")?;
            return Ok(Some(Token::Log(base, arg)));
        }
        Ok(None)
    }

    // An argument is a full sub-expression right after its delimiter
    fn call_argument(
        &self,
        scanner: &mut Scanner,
        name: &'static str,
        delim: char,
        depth: usize,
    ) -> Result<RPNExpr, ParseError> {
        let pos = scanner.pos();
        if scanner.accept(delim).is_none() {
            return Err(ParseError::BadCall { name, pos });
        }
        self.build_postfix(scanner, depth + 1)
    }

    fn close_call(&self, scanner: &mut Scanner, name: &'static str) -> Result<(), ParseError> {
        let pos = scanner.pos();
        match scanner.accept(')') {
            Some(_) => Ok(()),
            None => Err(ParseError::BadCall { name, pos }),
        }
    }
}

/// Read a single operator char after skipping blanks.
pub fn scan_operator(scanner: &mut Scanner) -> Option<Operator> {
    if !scanner.skip_spaces() {
        return None;
    }
    scan_math_op(scanner, OPERATORS).and_then(Operator::from_char)
}
