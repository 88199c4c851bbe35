use fenris_symbolic::Expr;
use nalgebra::Point4;

/// Sample points used to compare expressions: the corners of [-1, 1]^4 and some interior points.
pub fn expr_sample_points() -> Vec<Point4<f64>> {
    let mut points = Vec::new();
    for i in 0..16 {
        let corner = |bit: usize| if i & (1 << bit) == 0 { -1.0 } else { 1.0 };
        points.push(Point4::new(corner(0), corner(1), corner(2), corner(3)));
    }
    points.push(Point4::origin());
    points.push(Point4::new(0.3, -0.7, 0.1, 0.5));
    points.push(Point4::new(-0.25, 0.6, -0.9, 0.05));
    points
}

/// Returns the largest absolute difference between the two expressions over the sample points.
pub fn max_expr_abs_diff(a: &Expr<f64>, b: &Expr<f64>) -> f64 {
    expr_sample_points()
        .iter()
        .map(|p| (a.evaluate(p) - b.evaluate(p)).abs())
        .fold(0.0, f64::max)
}

/// Poor man's approx assertion for expressions: compares values at a fixed set of sample points
#[macro_export]
macro_rules! assert_expr_approx_eq {
    ($x:expr, $y:expr, abstol = $tol:expr) => {{
        let (x, y) = (&$x, &$y);
        let max_absdiff = $crate::max_expr_abs_diff(x, y);
        if !(max_absdiff <= $tol) {
            println!("abstol: {:e}", $tol);
            println!("left: {}", x);
            println!("right: {}", y);
            println!("max absdiff: {:e}", max_absdiff);
        }
        assert!(max_absdiff <= $tol);
    }};
}

#[macro_export]
macro_rules! assert_panics {
    ($e:expr) => {{
        use std::panic::{catch_unwind, AssertUnwindSafe};
        use std::stringify;
        let expr_string = stringify!($e);
        // The function list holds boxed closures, which are not unwind safe in general
        let result = catch_unwind(AssertUnwindSafe(|| $e));
        if result.is_ok() {
            panic!("assert_panics!({}) failed.", expr_string);
        }
    }};
}
