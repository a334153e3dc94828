use crate::findroot::{Point, RootFinder};
use crate::integrate::integrate;
use crate::parser::{ParseError, RPNExpr, ShuntingParser};
use crate::rpnprint::Infix;
use std::fmt;
use std::str::FromStr;

/// A parsed expression in one variable together with the text it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    source: String,
    var: String,
    rpn: RPNExpr,
}

impl Function {
    /// Parse an expression in `x`.
    pub fn parse(expr: &str) -> Result<Self, ParseError> {
        Self::with_variable(expr, "x")
    }

    pub fn with_variable(expr: &str, var: &str) -> Result<Self, ParseError> {
        let rpn = ShuntingParser::new(var).parse(expr)?;
        Ok(Function {
            source: expr.trim().to_string(),
            var: var.to_string(),
            rpn,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn variable(&self) -> &str {
        &self.var
    }

    pub fn rpn(&self) -> &RPNExpr {
        &self.rpn
    }

    /// The parsed form printed back with this function's variable name.
    pub fn infix(&self) -> Infix<'_> {
        self.rpn.infix(&self.var, "y")
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.rpn.eval(x)
    }

    /// Points in [lower, upper] where both functions meet.
    pub fn intersections(
        &self,
        other: &Function,
        finder: &RootFinder,
        lower: f64,
        upper: f64,
    ) -> Vec<Point> {
        finder.find_intersections(&self.rpn, &other.rpn, lower, upper)
    }

    /// Definite integral over [lower, upper], NaN when undefined somewhere on it.
    pub fn area(&self, lower: f64, upper: f64, steps: usize) -> f64 {
        integrate(&self.rpn, lower, upper, steps)
    }
}

impl FromStr for Function {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Function::parse(s)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

///////////////////////////////////////////////////////////////////////////////
