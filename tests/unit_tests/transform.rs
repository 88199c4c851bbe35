use fenris_basis::derivatives::Derivatives;
use fenris_basis::function_list::FunctionList;
use fenris_basis::map::{AffineMap, IdentityMap, SymbolicMap};
use fenris_basis::proptest::{derivatives, point4};
use fenris_basis::symbolic::{Axis, Expr};
use fenris_basis::transform::transform_derivatives;
use matrixcompare::{assert_matrix_eq, prop_assert_matrix_eq};
use nalgebra::{Matrix4, Point2, Point4, Vector4};
use proptest::prelude::*;
use util::assert_expr_approx_eq;

use super::bilinear_quad_jacobian;

fn register(list: &mut FunctionList<f64>, d: &Derivatives<f64>) -> fenris_basis::function_list::FunctionId {
    let id = list.add(|_: f64, _: f64, _: f64, _: f64| 0.0);
    let [dd_x, dd_y, dd_z, dd_t] = d.as_array().clone();
    list.set(id, dd_x, dd_y, dd_z, dd_t);
    id
}

/// A rotation by 90 degrees in the xy-plane.
fn rotation_map() -> AffineMap<f64> {
    let mut jacobian = Matrix4::identity();
    jacobian[(0, 0)] = 0.0;
    jacobian[(0, 1)] = -1.0;
    jacobian[(1, 0)] = 1.0;
    jacobian[(1, 1)] = 0.0;
    AffineMap::try_from_jacobian(jacobian).unwrap()
}

#[test]
fn zero_reference_derivative_does_not_imply_zero_physical_derivative() {
    // f = X has a vanishing Y-derivative, but after rotating the element the whole gradient
    // points along y
    let mut list = FunctionList::new();
    let id = list.add_expr(Expr::coordinate(Axis::X));
    assert!(list.ddY(id).is_zero());

    list.update(id, &rotation_map());
    // X = y and Y = -x
    assert!(list.ddx(id).evaluate(&Point4::origin()).abs() <= 1e-15);
    assert!((list.ddy(id).evaluate(&Point4::origin()) - 1.0).abs() <= 1e-15);
}

#[test]
fn cross_terms_are_summed() {
    let map = SymbolicMap::from_fn(|reference, physical| {
        Expr::constant((1 + reference.index() + 4 * physical.index()) as f64)
    });
    let reference = Derivatives::new(
        Expr::constant(1.0),
        Expr::constant(10.0),
        Expr::constant(100.0),
        Expr::constant(1000.0),
    );
    let physical = transform_derivatives(&reference, &map);
    // dX_r / dx_p = 1 + r + 4 p
    for p in 0..4 {
        let expected: f64 = (0..4)
            .map(|r| 10f64.powi(r as i32) * (1 + r + 4 * p) as f64)
            .sum();
        assert_eq!(physical.as_array()[p].as_constant(), Some(expected));
    }
}

#[test]
fn physical_derivatives_of_linear_triangle_basis() {
    // The basis functions of a linear triangle have constant physical gradients,
    // which for the triangle (0, 0), (1, 0), (0, 1) are known in closed form
    let [x, y] = [Axis::X, Axis::Y].map(Expr::<f64>::coordinate);
    let half = Expr::constant(0.5);
    let basis = [
        -(&x + &y) * &half,
        &x * &half + &half,
        &y * &half + &half,
    ];
    let expected_gradients = [[-1.0, -1.0], [1.0, 0.0], [0.0, 1.0]];

    let triangle = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)];
    let map = AffineMap::try_from_triangle(&triangle).unwrap();

    let mut list = FunctionList::new();
    for (phi, gradient) in basis.into_iter().zip(expected_gradients) {
        let id = list.add_expr(phi);
        list.update(id, &map);
        assert_expr_approx_eq!(list.ddx(id), Expr::constant(gradient[0]), abstol = 1e-14);
        assert_expr_approx_eq!(list.ddy(id), Expr::constant(gradient[1]), abstol = 1e-14);
        assert!(list.ddz(id).is_zero());
        assert!(list.ddt(id).is_zero());
    }
}

#[test]
fn physical_derivatives_on_quadrilateral_match_numerical_inverse() {
    let quad = [
        Point2::new(0.0, 0.0),
        Point2::new(2.0, 0.0),
        Point2::new(1.5, 1.0),
        Point2::new(0.5, 1.0),
    ];
    let map = SymbolicMap::try_from_quadrilateral(&quad).unwrap();
    let [x, y] = [Axis::X, Axis::Y].map(Expr::<f64>::coordinate);
    let mut list = FunctionList::new();
    let id = list.add_expr(&x * &y + &x);
    let physical = list.update(id, &map).clone();

    for p in util::expr_sample_points() {
        let inverse_jacobian = bilinear_quad_jacobian(&quad, &p).try_inverse().unwrap();
        let reference_gradient = list.reference_derivatives(id).evaluate(&p);
        let expected = inverse_jacobian.transpose() * reference_gradient;
        assert_matrix_eq!(physical.evaluate(&p), expected, comp = abs, tol = 1e-12);
    }
}

#[test]
fn affine_transform_of_time_derivative() {
    // x = 2 X, t = 4 T
    let map = AffineMap::scaling(Vector4::new(2.0, 1.0, 1.0, 4.0)).unwrap();
    let t = Expr::<f64>::coordinate(Axis::T);
    let mut list = FunctionList::new();
    let id = list.add_expr(&t * &t);
    list.update(id, &map);
    assert_expr_approx_eq!(list.ddt(id), Expr::constant(0.5) * &t, abstol = 1e-15);
    assert!(list.ddx(id).is_zero());
}

proptest! {
    #[test]
    fn identity_map_preserves_derivatives(d in derivatives()) {
        let mut list = FunctionList::new();
        let id = register(&mut list, &d);
        list.update(id, &IdentityMap);
        prop_assert_eq!(list.ddx(id), list.ddX(id));
        prop_assert_eq!(list.ddy(id), list.ddY(id));
        prop_assert_eq!(list.ddz(id), list.ddZ(id));
        prop_assert_eq!(list.ddt(id), list.ddT(id));
    }

    #[test]
    fn scaling_one_axis_scales_its_derivative(
        d in derivatives(),
        k in (0.1 .. 10.0f64, any::<bool>()).prop_map(|(k, flip)| if flip { -k } else { k })
    ) {
        let mut list = FunctionList::new();
        let id = register(&mut list, &d);
        let map = AffineMap::scaling(Vector4::new(k, 1.0, 1.0, 1.0)).unwrap();
        list.update(id, &map);
        let expected = list.ddX(id).scale(&Expr::constant(1.0 / k));
        prop_assert_eq!(list.ddx(id), &expected);
        prop_assert_eq!(list.ddy(id), list.ddY(id));
        prop_assert_eq!(list.ddz(id), list.ddZ(id));
        prop_assert_eq!(list.ddt(id), list.ddT(id));
    }

    #[test]
    fn affine_transform_agrees_with_inverse_jacobian_transpose(
        d in derivatives(),
        map in any::<AffineMap<f64>>(),
        p in point4()
    ) {
        let physical = transform_derivatives(&d, &map);
        let expected = map.inverse_jacobian().transpose() * d.evaluate(&p);
        let tol = 1e-10 * (1.0 + expected.amax() + d.evaluate(&p).amax());
        prop_assert_matrix_eq!(physical.evaluate(&p), expected, comp = abs, tol = tol);
    }

    #[test]
    fn transform_is_linear_in_reference_derivatives(
        a in derivatives(),
        b in derivatives(),
        map in any::<AffineMap<f64>>(),
        p in point4()
    ) {
        let sum = Derivatives::from_fn(|axis| &a[axis] + &b[axis]);
        let lhs = transform_derivatives(&sum, &map).evaluate(&p);
        let rhs = transform_derivatives(&a, &map).evaluate(&p) + transform_derivatives(&b, &map).evaluate(&p);
        let tol = 1e-10 * (1.0 + lhs.amax() + rhs.amax());
        prop_assert_matrix_eq!(lhs, rhs, comp = abs, tol = tol);
    }
}
