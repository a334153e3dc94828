use crate::parser::{Operator, RPNExpr};
use crate::token::{Slot, Token};
use std::fmt;

// Leaves never need parens
const ATOM: usize = 99;

fn precedence(token: &Token) -> usize {
    match token {
        Token::Neg => Operator::Neg.precedence(),
        Token::BOp(op) => Operator::Bin(*op).precedence(),
        // a negative literal (only possible after substitution) prints like -n
        Token::Number(n) if n.is_sign_negative() => Operator::Neg.precedence(),
        _ => ATOM,
    }
}

/// Infix rendering of a postfix sequence with the given variable names.
///
/// Operator chains are folded with an explicit stack, so long sums or
/// repeated negations don't grow the call stack. Only function arguments
/// recurse, and those are as deep as the parser allowed them to nest.
#[derive(Clone, Copy, Debug)]
pub struct Infix<'a> {
    rpn: &'a RPNExpr,
    independent: &'a str,
    dependent: &'a str,
}

impl RPNExpr {
    pub fn infix<'a>(&'a self, independent: &'a str, dependent: &'a str) -> Infix<'a> {
        Infix {
            rpn: self,
            independent,
            dependent,
        }
    }
}

impl<'a> Infix<'a> {
    fn nested(&self, rpn: &'a RPNExpr) -> Infix<'a> {
        Infix { rpn, ..*self }
    }

    // None if the sequence doesn't reduce to exactly one operand
    fn render(&self) -> Option<String> {
        let mut operands: Vec<(String, usize)> = Vec::new();
        for token in self.rpn.iter() {
            let prec = precedence(token);
            let text = match token {
                Token::Number(n) => format!("{}", n),
                Token::Var(Slot::Independent) => self.independent.to_string(),
                Token::Var(Slot::Dependent) => self.dependent.to_string(),
                Token::Func(func, arg) => format!("{}({})", func.name(), self.nested(arg)),
                Token::Log(base, arg) => {
                    format!("log({}, {})", self.nested(base), self.nested(arg))
                }
                Token::Neg => {
                    let (sub, sub_prec) = operands.pop()?;
                    if sub_prec <= prec {
                        format!("-({})", sub)
                    } else {
                        format!("-{}", sub)
                    }
                }
                Token::BOp(op) => {
                    let (rhs, rhs_prec) = operands.pop()?;
                    let (lhs, lhs_prec) = operands.pop()?;
                    // grow the left operand in place, long chains are left deep
                    let mut text = if lhs_prec < prec { format!("({})", lhs) } else { lhs };
                    text.push(' ');
                    text.push(op.symbol());
                    text.push(' ');
                    // everything is left associative, so an equal
                    // precedence on the right needs parens to survive
                    if rhs_prec <= prec {
                        text.push('(');
                        text.push_str(&rhs);
                        text.push(')');
                    } else {
                        text.push_str(&rhs);
                    }
                    text
                }
            };
            operands.push((text, prec));
        }
        let (text, _) = operands.pop()?;
        if operands.is_empty() { Some(text) } else { None }
    }
}

impl fmt::Display for Infix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.rpn.is_empty() {
            return write!(f, "0");
        }
        match self.render() {
            Some(text) => write!(f, "{}", text),
            None => write!(f, "<malformed>"),
        }
    }
}

impl fmt::Display for RPNExpr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.infix("x", "y").fmt(f)
    }
}

///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use crate::parser::{RPNExpr, ShuntingParser};
    use crate::token::{BinOp, Token};

    fn show(expr: &str) -> String {
        format!("{}", ShuntingParser::parse_str(expr).unwrap())
    }

    #[test]
    fn minimal_parens() {
        assert_eq!(show("1 + 2 * 3"), "1 + 2 * 3");
        assert_eq!(show("(1 + 2) * 3"), "(1 + 2) * 3");
        assert_eq!(show("((1 - 2)) - 3"), "1 - 2 - 3");
        assert_eq!(show("1 - (2 - 3)"), "1 - (2 - 3)");
        assert_eq!(show("2^3^2"), "2 ^ 3 ^ 2");
        assert_eq!(show("2^(3^2)"), "2 ^ (3 ^ 2)");
    }

    #[test]
    fn unary_minus() {
        assert_eq!(show("-x"), "-x");
        assert_eq!(show("-(1 + x)"), "-(1 + x)");
        assert_eq!(show("-2^2"), "-2 ^ 2");
        assert_eq!(show("(-2)^2"), "(-2) ^ 2");
        assert_eq!(show("2^-x"), "2 ^ (-x)");
        assert_eq!(show("1 + -2 * 3"), "1 + -2 * 3");
    }

    #[test]
    fn functions() {
        assert_eq!(show("sin(x)^2"), "sin(x) ^ 2");
        assert_eq!(show("log(2, x*3)"), "log(2, x * 3)");
        assert_eq!(show("abs(ln(x) - 1)"), "abs(ln(x) - 1)");
        assert_eq!(show(""), "0");
    }

    #[test]
    fn substituted() {
        let rpn = ShuntingParser::implicit("x", "y")
            .parse("x^2 + y")
            .unwrap()
            .substitute(-1.5);
        assert_eq!(format!("{}", rpn), "(-1.5) ^ 2 + x");
    }

    #[test]
    fn reparse() {
        let tests = [
            "3 + 4 * 2 / -(1 - 5) ^ 2 ^ 3",
            "arccot(x / 2) - cos(pi * x)",
            "log(e, abs(x)) * -(x - 1)",
            "1 / (x - 1) / (x + 1)",
        ];
        for t in tests.iter() {
            let rpn = ShuntingParser::parse_str(t).unwrap();
            let again: RPNExpr = format!("{}", rpn).parse().unwrap();
            assert_eq!(rpn, again);
        }
    }

    #[test]
    fn variable_names() {
        let parser = ShuntingParser::implicit("t", "u");
        let rpn = parser.parse("sin(t) * -u + log(t, 2)").unwrap();
        let text = format!("{}", rpn.infix("t", "u"));
        assert_eq!(text, "sin(t) * -u + log(t, 2)");
        assert_eq!(parser.parse(&text).unwrap(), rpn);
        assert_eq!(format!("{}", rpn), "sin(x) * -y + log(x, 2)");
    }

    #[test]
    fn long_chains() {
        let terms = 200_000;
        let sum = format!("1{}", " + 1".repeat(terms));
        let rpn = ShuntingParser::parse_str(&sum).unwrap();
        assert_eq!(format!("{}", rpn), sum);
        assert_eq!(rpn.eval(0.0), (terms + 1) as f64);

        let depth = 1000;
        let negs = format!("{}x{}", "-(".repeat(depth), ")".repeat(depth));
        let rpn = ShuntingParser::parse_str(&negs).unwrap();
        let again: RPNExpr = format!("{}", rpn).parse().unwrap();
        assert_eq!(rpn, again);
    }

    #[test]
    fn malformed() {
        let dangling = RPNExpr(vec![Token::Number(1.0), Token::BOp(BinOp::Add)]);
        assert_eq!(format!("{}", dangling), "<malformed>");
        let leftover = RPNExpr(vec![Token::Number(1.0), Token::Number(2.0)]);
        assert_eq!(format!("{}", leftover), "<malformed>");
    }
}
