//! Transformation of reference derivatives into physical derivatives.
use crate::derivatives::Derivatives;
use crate::map::GeometricMap;
use crate::symbolic::{Expr, Real};
use itertools::izip;

/// Transforms derivatives with respect to reference coordinates into derivatives with respect
/// to physical coordinates by the chain rule,
///
/// $$ \frac{\partial f}{\partial x_p} = \sum_r \frac{\partial f}{\partial X_r} \frac{\partial X_r}{\partial x_p}. $$
///
/// Every one of the four terms enters each sum, including those whose reference derivative is
/// zero: the sparsity of the reference derivatives says nothing about the sparsity of the
/// physical derivatives once the map has cross terms. Zero terms are removed only by the exact
/// folding of the expression algebra.
///
/// The result is an expression in reference coordinates and can be evaluated at any quadrature
/// point of the element without recomputation.
pub fn transform_derivatives<T, M>(reference: &Derivatives<T>, map: &M) -> Derivatives<T>
where
    T: Real,
    M: GeometricMap<T> + ?Sized,
{
    Derivatives::from_fn(|physical| transform_component(reference, map.reference_partials(physical)))
}

fn transform_component<T: Real>(reference: &Derivatives<T>, partials: [Expr<T>; 4]) -> Expr<T> {
    izip!(reference.as_array(), partials).fold(Expr::zero(), |sum, (d_ref, d_partial)| sum + d_ref.scale(&d_partial))
}
