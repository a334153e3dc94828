use crate::parser::RPNExpr;

/// Trapezoidal approximation of the integral of `f` over [lower, upper].
///
/// The result is NaN if `f` is undefined anywhere on the sampled points.
/// Infinite samples (poles) are left out of the sum.
pub fn integrate(f: &RPNExpr, lower: f64, upper: f64, steps: usize) -> f64 {
    if steps == 0 || lower == upper {
        return 0.0;
    }
    let dx = (upper - lower) / steps as f64;
    let mut area = 0.0;
    for i in 0..=steps {
        let y = f.eval(lower + i as f64 * dx);
        if y.is_nan() {
            return f64::NAN;
        }
        if y.is_infinite() {
            continue;
        }
        let weight = if i == 0 || i == steps { 0.5 } else { 1.0 };
        area += weight * y;
    }
    area * dx
}

///////////////////////////////////////////////////////////////////////////////
