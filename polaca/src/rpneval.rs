use crate::parser::RPNExpr;
use crate::token::{BinOp, Slot, Token};

/// A value on the evaluation stack. `depends` tells if the value was
/// computed from the free variable or only from constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub value: f64,
    pub depends: bool,
}

impl Cell {
    fn constant(value: f64) -> Cell {
        Cell { value, depends: false }
    }

    fn variable(value: f64) -> Cell {
        Cell { value, depends: true }
    }
}

// Raised on domain errors, aborts the whole evaluation.
#[derive(Debug)]
struct Undefined;

impl RPNExpr {
    /// Evaluate binding the independent variable to `x`. NaN means the
    /// expression is undefined at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        self.eval_cell(x).map_or(f64::NAN, |cell| cell.value)
    }

    /// Like `eval`, but keeps track of whether the result depends on `x`.
    /// Returns None where the expression is undefined.
    pub fn eval_cell(&self, x: f64) -> Option<Cell> {
        self.eval_with(x).ok()
    }

    fn eval_with(&self, x: f64) -> Result<Cell, Undefined> {
        if self.is_empty() {
            return Ok(Cell::constant(0.0));
        }
        let mut operands = Vec::new();

        for token in self.iter() {
            match token {
                Token::Number(num) => operands.push(Cell::constant(*num)),
                Token::Var(Slot::Independent) => operands.push(Cell::variable(x)),
                // needs a substitution first, see RPNExpr::substitute
                Token::Var(Slot::Dependent) => return Err(Undefined),
                Token::Func(func, arg) => {
                    let arg = arg.eval_with(x)?;
                    if func.requires_positive() && arg.value <= 0.0 {
                        return Err(Undefined);
                    }
                    operands.push(Cell {
                        value: func.apply(arg.value),
                        depends: arg.depends,
                    });
                }
                Token::Log(base, arg) => {
                    let base = base.eval_with(x)?;
                    let arg = arg.eval_with(x)?;
                    if base.value <= 0.0 || base.value == 1.0 || arg.value <= 0.0 {
                        return Err(Undefined);
                    }
                    operands.push(Cell {
                        value: arg.value.ln() / base.value.ln(),
                        depends: base.depends || arg.depends,
                    });
                }
                Token::Neg => {
                    let o = operands.pop().ok_or(Undefined)?;
                    operands.push(Cell { value: -o.value, ..o });
                }
                Token::BOp(op) => {
                    let r = operands.pop().ok_or(Undefined)?;
                    let l = operands.pop().ok_or(Undefined)?;
                    // a negative base with a symbolic exponent would go complex
                    if *op == BinOp::Pow && l.value < 0.0 && r.depends {
                        return Err(Undefined);
                    }
                    operands.push(Cell {
                        value: op.apply(l.value, r.value),
                        depends: l.depends || r.depends,
                    });
                }
            }
        }
        operands.pop().ok_or(Undefined)
    }
}
