use crate::symbolic::{Axis, Expr, Real};
use nalgebra::{Point4, Vector4};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// The partial derivatives of a function with respect to the four coordinate axes.
///
/// Depending on context the axes are either reference coordinates `(X, Y, Z, T)` or physical
/// coordinates `(x, y, z, t)`. The expressions themselves are always expressions in reference
/// coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Derivatives<T> {
    components: [Expr<T>; 4],
}

impl<T> Derivatives<T>
where
    T: Real,
{
    pub fn new(d0: Expr<T>, d1: Expr<T>, d2: Expr<T>, d3: Expr<T>) -> Self {
        Self::from_array([d0, d1, d2, d3])
    }

    pub fn from_array(components: [Expr<T>; 4]) -> Self {
        Self { components }
    }

    pub fn from_fn(f: impl FnMut(Axis) -> Expr<T>) -> Self {
        Self::from_array(Axis::ALL.map(f))
    }

    /// All four derivatives are the zero expression.
    pub fn zero() -> Self {
        Self::from_fn(|_| Expr::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.components.iter().all(Expr::is_zero)
    }

    pub fn get(&self, axis: Axis) -> &Expr<T> {
        &self.components[axis.index()]
    }

    pub fn as_array(&self) -> &[Expr<T>; 4] {
        &self.components
    }

    /// Iterates over `(axis, derivative)` pairs in axis order.
    pub fn iter(&self) -> impl Iterator<Item = (Axis, &Expr<T>)> {
        Axis::ALL.into_iter().zip(self.components.iter())
    }

    /// Evaluates all four derivatives at the given reference point.
    pub fn evaluate(&self, point: &Point4<T>) -> Vector4<T> {
        Vector4::from_fn(|i, _| self.components[i].evaluate(point))
    }
}

impl<T> Index<Axis> for Derivatives<T> {
    type Output = Expr<T>;

    fn index(&self, axis: Axis) -> &Expr<T> {
        &self.components[axis.index()]
    }
}

impl<T: Real> Default for Derivatives<T> {
    fn default() -> Self {
        Self::zero()
    }
}
