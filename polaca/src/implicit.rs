use crate::findroot::RootFinder;
use crate::parser::{ParseError, RPNExpr, ShuntingParser};

/// A curve given implicitly by `lhs = rhs` in two variables.
#[derive(Clone, Debug, PartialEq)]
pub struct ImplicitCurve {
    rpn: RPNExpr,
}

impl ImplicitCurve {
    /// Parse `lhs = rhs` in `x` (independent) and `y` (dependent).
    pub fn parse(lhs: &str, rhs: &str) -> Result<Self, ParseError> {
        Self::with_variables(lhs, rhs, "x", "y")
    }

    pub fn with_variables(
        lhs: &str,
        rhs: &str,
        independent: &str,
        dependent: &str,
    ) -> Result<Self, ParseError> {
        // a blank side means zero
        let side = |s: &str| if s.trim().is_empty() { "0".to_string() } else { s.to_string() };
        let parser = ShuntingParser::implicit(independent, dependent);
        let rpn = parser.parse(&format!("({})-({})", side(lhs), side(rhs)))?;
        Ok(ImplicitCurve { rpn })
    }

    /// The sequence of `(lhs) - (rhs)`.
    pub fn rpn(&self) -> &RPNExpr {
        &self.rpn
    }

    /// Value of `lhs - rhs` at (x, y), zero on the curve.
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        self.rpn.substitute(x).eval(y)
    }

    /// Dependent coordinates in [lower, upper] of the curve points with
    /// independent coordinate `x`.
    pub fn values_at(&self, x: f64, lower: f64, upper: f64) -> Vec<f64> {
        self.values_at_with(&RootFinder::default(), x, lower, upper)
    }

    /// Same as `values_at` with the finder's accuracy settings. The range is
    /// always scanned in unit-wide sub-intervals.
    pub fn values_at_with(&self, finder: &RootFinder, x: f64, lower: f64, upper: f64) -> Vec<f64> {
        let intervals = ((upper - lower).ceil() as usize).max(1);
        let finder = RootFinder { intervals, ..*finder };
        finder.find_roots(&self.rpn.substitute(x), lower, upper)
    }
}

///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ImplicitCurve;
    use crate::parser::ShuntingParser;
    use crate::token::{BinOp, Func, Slot, Token};

    macro_rules! fuzzy_eq {
        ($lhs:expr, $rhs:expr) => {
            assert!(($lhs - $rhs).abs() < 1.0e-4, "{} != {}", $lhs, $rhs)
        };
    }

    #[test]
    fn substitution_reaches_nested_calls() {
        let rpn = ShuntingParser::implicit("x", "y")
            .parse("x * sin(y - x)")
            .unwrap()
            .substitute(2.0);
        let inner = ShuntingParser::parse_str("x - 2").unwrap();
        assert_eq!(
            &rpn[..],
            &[
                Token::Number(2.0),
                Token::Func(Func::Sin, inner),
                Token::BOp(BinOp::Mul),
            ]
        );
        assert!(!rpn.iter().any(|t| *t == Token::Var(Slot::Dependent)));
    }

    #[test]
    fn circle() {
        let circle = ImplicitCurve::parse("x^2 + y^2", "25").unwrap();
        fuzzy_eq!(circle.eval(3.0, 4.0), 0.0);
        fuzzy_eq!(circle.eval(0.0, 0.0), -25.0);

        let ys = circle.values_at(3.0, -10.0, 10.0);
        assert_eq!(ys.len(), 2);
        fuzzy_eq!(ys[0], -4.0);
        fuzzy_eq!(ys[1], 4.0);

        assert!(circle.values_at(6.0, -10.0, 10.0).is_empty());
    }

    #[test]
    fn line() {
        let line = ImplicitCurve::parse("y", "2*x + 1").unwrap();
        let ys = line.values_at(0.25, -10.0, 10.0);
        assert_eq!(ys.len(), 1);
        fuzzy_eq!(ys[0], 1.5);
    }

    #[test]
    fn custom_names_and_blank_side() {
        let curve = ImplicitCurve::with_variables("", "b - a^2", "a", "b").unwrap();
        let bs = curve.values_at(2.0, 0.0, 10.0);
        assert_eq!(bs.len(), 1);
        fuzzy_eq!(bs[0], 4.0);

        assert!(ImplicitCurve::parse("x +", "y").is_err());
    }
}
