use crate::parser::RPNExpr;
use std::f64::consts;

/// Which free variable a `Token::Var` refers to.
///
/// Plain expressions only ever use `Independent`. Implicit curves in two
/// variables use `Dependent` for the second one.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Slot {
    Independent,
    Dependent,
}

/// Named functions of one argument.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Func {
    Ln,
    Lg,
    Sin,
    Cos,
    Tan,
    Cot,
    Arcsin,
    Arccos,
    Arctan,
    Arccot,
    Abs,
}

impl Func {
    pub const ALL: [Func; 11] = [
        Func::Ln,
        Func::Lg,
        Func::Sin,
        Func::Cos,
        Func::Tan,
        Func::Cot,
        Func::Arcsin,
        Func::Arccos,
        Func::Arctan,
        Func::Arccot,
        Func::Abs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Func::Ln => "ln",
            Func::Lg => "lg",
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Cot => "cot",
            Func::Arcsin => "arcsin",
            Func::Arccos => "arccos",
            Func::Arctan => "arctan",
            Func::Arccot => "arccot",
            Func::Abs => "abs",
        }
    }

    /// Logarithms are undefined for non positive arguments.
    pub fn requires_positive(self) -> bool {
        matches!(self, Func::Ln | Func::Lg)
    }

    pub fn apply(self, v: f64) -> f64 {
        match self {
            Func::Ln => v.ln(),
            Func::Lg => v.log10(),
            Func::Sin => v.sin(),
            Func::Cos => v.cos(),
            Func::Tan => v.tan(),
            Func::Cot => 1.0 / v.tan(),
            Func::Arcsin => v.asin(),
            Func::Arccos => v.acos(),
            Func::Arctan => v.atan(),
            Func::Arccot => consts::FRAC_PI_2 - v.atan(),
            Func::Abs => v.abs(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinOp {
    pub fn symbol(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
            BinOp::Pow => '^',
        }
    }

    pub fn apply(self, l: f64, r: f64) -> f64 {
        match self {
            BinOp::Add => l + r,
            BinOp::Sub => l - r,
            BinOp::Mul => l * r,
            BinOp::Div => l / r,
            BinOp::Pow => l.powf(r),
        }
    }
}

/// One step of a postfix sequence.
///
/// Function calls own their arguments as nested sequences, each of which can
/// be evaluated on its own. `Neg` and `BOp` take their operands from the
/// evaluation stack.
#[derive(Clone, PartialEq, Debug)]
pub enum Token {
    Number(f64),
    Var(Slot),
    Func(Func, RPNExpr),
    Log(RPNExpr, RPNExpr), // base, argument
    Neg,
    BOp(BinOp),
}
