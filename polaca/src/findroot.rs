use crate::parser::RPNExpr;
use crate::token::BinOp;
use log::{trace, warn};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    fn on(f: &RPNExpr, x: f64) -> Point {
        Point { x, y: f.eval(x) }
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RootError {
    #[error("didn't converge after {iterations} iterations, x={x}")]
    NoConvergence { iterations: usize, x: f64 },
    #[error("diverged, last finite x={0}")]
    Diverged(f64),
}

/// Newton's method with a central difference derivative of step `accuracy`.
/// Stops once two consecutive iterates are within `accuracy`.
pub fn newton_raphson(
    f: impl Fn(f64) -> f64,
    x0: f64,
    accuracy: f64,
    max_iterations: usize,
) -> Result<f64, RootError> {
    let mut x = x0;
    for iteration in 0..max_iterations {
        let derivative = (f(x + accuracy) - f(x - accuracy)) / (2.0 * accuracy);
        let next = x - f(x) / derivative;
        trace!("newton #{}: x={} f'(x)={} next={}", iteration, x, derivative, next);
        if !next.is_finite() {
            return Err(RootError::Diverged(x));
        }
        if (next - x).abs() <= accuracy {
            return Ok(next);
        }
        x = next;
    }
    Err(RootError::NoConvergence {
        iterations: max_iterations,
        x,
    })
}

/// Settings for scanning an interval for roots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootFinder {
    /// Number of equal sub-intervals checked for a sign change.
    pub intervals: usize,
    /// Newton's stopping distance, also the derivative step.
    pub accuracy: f64,
    pub max_iterations: usize,
}

impl Default for RootFinder {
    fn default() -> Self {
        RootFinder {
            intervals: 1000,
            accuracy: 1.0e-5,
            max_iterations: 1000,
        }
    }
}

impl RootFinder {
    pub fn newton(&self, f: &RPNExpr, x0: f64) -> Result<f64, RootError> {
        newton_raphson(|x| f.eval(x), x0, self.accuracy, self.max_iterations)
    }

    /// Points in [lower, upper] where `a` and `b` take the same value, from
    /// left to right. The y coordinate is the value of `a`.
    pub fn find_intersections(
        &self,
        a: &RPNExpr,
        b: &RPNExpr,
        lower: f64,
        upper: f64,
    ) -> Vec<Point> {
        let diff = RPNExpr::merge(a, b, BinOp::Sub);
        self.scan(&diff, lower, upper)
            .into_iter()
            .map(|x| Point::on(a, x))
            .collect()
    }

    /// Roots of `f` in [lower, upper], from left to right.
    pub fn find_roots(&self, f: &RPNExpr, lower: f64, upper: f64) -> Vec<f64> {
        self.scan(f, lower, upper)
    }

    // Look for a sign change on each sub-interval [x1, x2) and polish it.
    // A zero sitting exactly on a boundary is reported by the interval that
    // starts there, except for the upper bound itself.
    fn scan(&self, f: &RPNExpr, lower: f64, upper: f64) -> Vec<f64> {
        let mut roots = Vec::new();
        if self.intervals == 0 {
            return roots;
        }
        let dx = (upper - lower) / self.intervals as f64;
        for i in 0..self.intervals {
            let x1 = lower + i as f64 * dx;
            let x2 = lower + (i + 1) as f64 * dx;
            let (y1, y2) = (f.eval(x1), f.eval(x2));

            if y1 == 0.0 {
                roots.push(x1);
                continue;
            } else if y2 == 0.0 {
                if i == self.intervals - 1 {
                    roots.push(x2);
                }
                continue;
            }
            if !y1.is_finite() || !y2.is_finite() || y1 * y2 > 0.0 {
                continue;
            }
            match self.newton(f, x1 + self.accuracy) {
                Ok(root) => roots.push(root),
                Err(e) => warn!("skipping interval [{}, {}]: {}", x1, x2, e),
            }
        }
        roots
    }
}

/// Intersections of `a` and `b` using `intervals` sub-intervals and the
/// default accuracy.
pub fn find_intersections(
    a: &RPNExpr,
    b: &RPNExpr,
    lower: f64,
    upper: f64,
    intervals: usize,
) -> Vec<Point> {
    RootFinder {
        intervals,
        ..RootFinder::default()
    }
    .find_intersections(a, b, lower, upper)
}
