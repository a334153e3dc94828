use crate::findroot::{Point, RootError, RootFinder, find_intersections, newton_raphson};
use crate::parser::{RPNExpr, ShuntingParser};
use std::f64::consts;

macro_rules! fuzzy_eq {
    ($lhs:expr, $rhs:expr) => {
        assert!(($lhs - $rhs).abs() < 1.0e-4, "{} != {}", $lhs, $rhs)
    };
}

fn parse(expr: &str) -> RPNExpr {
    ShuntingParser::parse_str(expr).unwrap()
}

fn newton(expr: &str, x0: f64) -> Result<f64, RootError> {
    let f = parse(expr);
    newton_raphson(|x| f.eval(x), x0, 0.001, 1000)
}

fn check_points(points: &[Point], xs: &[f64], ys: &[f64]) {
    assert_eq!(points.len(), xs.len(), "{:?}", points);
    for (p, (x, y)) in points.iter().zip(xs.iter().zip(ys.iter())) {
        fuzzy_eq!(p.x, x);
        fuzzy_eq!(p.y, y);
    }
}

#[test]
fn newton_quadratic() {
    let sqrt13 = 13f64.sqrt();
    fuzzy_eq!(newton("x^2 + 3*x - 1", 1.0).unwrap(), (-3.0 + sqrt13) / 2.0);
    fuzzy_eq!(newton("x^2 + 3*x - 1", -5.0).unwrap(), (-3.0 - sqrt13) / 2.0);
}

#[test]
fn newton_assorted() {
    fuzzy_eq!(newton("2/x + 5", -0.1).unwrap(), -0.4);
    fuzzy_eq!(newton("2*x - 2^0.5", 1.0).unwrap(), consts::SQRT_2 / 2.0);
    fuzzy_eq!(newton("sin(x-1)", 2.0).unwrap(), 1.0);
    fuzzy_eq!(newton("cos(x)", 1.0).unwrap(), consts::FRAC_PI_2);
    fuzzy_eq!(newton("tan(x)", 3.0).unwrap(), consts::PI);
    fuzzy_eq!(newton("cot(x)", 1.5).unwrap(), consts::FRAC_PI_2);
    fuzzy_eq!(newton("arctan(x)", 1.0).unwrap(), 0.0);
    fuzzy_eq!(newton("e^x - 1", 1.0).unwrap(), 0.0);
    fuzzy_eq!(newton("3^x - 2", 1.0).unwrap(), 2f64.ln() / 3f64.ln());
    fuzzy_eq!(newton("ln(x)", 2.0).unwrap(), 1.0);
    fuzzy_eq!(newton("lg(x) - 1", 9.0).unwrap(), 10.0);
    fuzzy_eq!(newton("log(2, x) - 8", 200.0).unwrap(), 256.0);
}

#[test]
fn newton_gives_up() {
    // flat: the first step is already infinite
    assert_eq!(newton("1", 0.0), Err(RootError::Diverged(0.0)));
    // no real root, the iterates bounce around forever
    assert!(newton("x^2 + 1", 0.5).is_err());
    let f = parse("x^2 + 1");
    match newton_raphson(|x| f.eval(x), 0.5, 1e-9, 10) {
        Err(RootError::NoConvergence { iterations: 10, .. }) | Err(RootError::Diverged(_)) => (),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn intersections_sin_cos() {
    let points = find_intersections(&parse("sin(x)"), &parse("cos(x)"), -5.0, 5.0, 1000);
    let q = consts::FRAC_PI_4;
    let h = consts::SQRT_2 / 2.0;
    check_points(&points, &[q - consts::PI, q, q + consts::PI], &[-h, h, -h]);
}

#[test]
fn intersections_parabola_line() {
    let points = find_intersections(&parse("x^2 + 3*x"), &parse("1"), -5.0, 5.0, 1000);
    let sqrt13 = 13f64.sqrt();
    check_points(&points, &[(-3.0 - sqrt13) / 2.0, (-3.0 + sqrt13) / 2.0], &[1.0, 1.0]);
}

#[test]
fn intersections_across_pole() {
    // 1/x flips sign at 0 without crossing zero
    let points = find_intersections(&parse("1 / x"), &parse("0"), -5.0, 5.0, 1000);
    assert!(points.is_empty(), "{:?}", points);
}

#[test]
fn intersections_on_boundaries() {
    // roots exactly on the grid are picked up without Newton
    let finder = RootFinder {
        intervals: 4,
        ..RootFinder::default()
    };
    let points = finder.find_intersections(&parse("x"), &parse(""), -2.0, 2.0);
    check_points(&points, &[0.0], &[0.0]);

    let points = finder.find_intersections(&parse("x - 2"), &parse("0"), -2.0, 2.0);
    check_points(&points, &[2.0], &[0.0]);

    let points = finder.find_intersections(&parse("x + 2"), &parse("0"), -2.0, 2.0);
    check_points(&points, &[-2.0], &[0.0]);
}

#[test]
fn intersections_skip_undefined() {
    // ln is undefined left of zero, but still meets -1 at 1/e
    let points = find_intersections(&parse("ln(x)"), &parse("-1"), -5.0, 5.0, 1000);
    check_points(&points, &[(-1f64).exp()], &[-1.0]);

    assert!(find_intersections(&parse("x"), &parse("1"), -5.0, 5.0, 0).is_empty());
}

#[test]
fn find_roots_against_zero() {
    let finder = RootFinder::default();
    let roots = finder.find_roots(&parse("x^3 - x"), -2.0, 2.0);
    assert_eq!(roots.len(), 3, "{:?}", roots);
    for (root, expect) in roots.iter().zip([-1.0, 0.0, 1.0]) {
        fuzzy_eq!(root, expect);
    }
}

#[test]
fn failed_refinement_skips_interval() {
    let f = parse("x^2 + 3*x - 1");
    assert_eq!(RootFinder::default().find_roots(&f, -5.0, 5.0).len(), 2);

    // one Newton step can't get within 1e-12, both brackets are dropped
    let impatient = RootFinder {
        max_iterations: 1,
        accuracy: 1.0e-12,
        ..RootFinder::default()
    };
    assert!(impatient.newton(&f, 0.3).is_err());
    assert!(impatient.find_roots(&f, -5.0, 5.0).is_empty());
    let points = impatient.find_intersections(&parse("x^2 + 3*x"), &parse("1"), -5.0, 5.0);
    assert!(points.is_empty(), "{:?}", points);
}
