//! Geometric maps from reference coordinates to physical coordinates.
//!
//! A geometric map describes how the reference cell is mapped onto the element that is
//! currently being assembled. For the purpose of transforming derivatives, only the partial
//! derivatives of the reference coordinates with respect to the physical coordinates are needed,
//! i.e. the entries of the inverse Jacobian
//!
//! $$ (J^{-1})\_{rp} = \frac{\partial X_r}{\partial x_p}. $$
//!
//! These entries are themselves expressions in reference coordinates, so that non-affine
//! elements can be represented.
//!
//! The reference cells follow the conventions of the `fenris` elements: the reference triangle
//! has the corners `(-1, -1), (1, -1), (-1, 1)`, the reference tetrahedron has the corners
//! `(-1, -1, -1), (1, -1, -1), (-1, 1, -1), (-1, -1, 1)` and the reference quadrilateral is the
//! square `[-1, 1]^2`. Axes that a map does not involve, including time, are mapped identically.
use crate::symbolic::{Axis, Expr, Real};
use eyre::eyre;
use nalgebra::{Matrix2, Matrix3, Matrix4, Point2, Point3, Vector4};
use numeric_literals::replace_float_literals;

pub trait GeometricMap<T>
where
    T: Real,
{
    /// The partial derivative $\partial X_r / \partial x_p$ of the reference coordinate along
    /// `reference` with respect to the physical coordinate along `physical`.
    fn reference_partial(&self, reference: Axis, physical: Axis) -> Expr<T>;

    /// The partial derivatives of all four reference coordinates with respect to the physical
    /// coordinate along `physical`, in axis order.
    fn reference_partials(&self, physical: Axis) -> [Expr<T>; 4] {
        Axis::ALL.map(|reference| self.reference_partial(reference, physical))
    }
}

impl<'a, T, M> GeometricMap<T> for &'a M
where
    T: Real,
    M: GeometricMap<T> + ?Sized,
{
    fn reference_partial(&self, reference: Axis, physical: Axis) -> Expr<T> {
        M::reference_partial(self, reference, physical)
    }
}

/// The map whose physical coordinates coincide with the reference coordinates.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct IdentityMap;

impl<T> GeometricMap<T> for IdentityMap
where
    T: Real,
{
    fn reference_partial(&self, reference: Axis, physical: Axis) -> Expr<T> {
        if reference == physical {
            Expr::one()
        } else {
            Expr::zero()
        }
    }
}

/// An affine map, whose Jacobian is constant over the element.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineMap<T>
where
    T: Real,
{
    jacobian: Matrix4<T>,
    inverse_jacobian: Matrix4<T>,
}

impl<T> AffineMap<T>
where
    T: Real,
{
    /// Constructs the map from its inverse Jacobian $\partial X_r / \partial x_p$ (row $r$, column $p$).
    ///
    /// # Panics
    ///
    /// Panics if the inverse Jacobian is not invertible.
    pub fn from_inverse_jacobian(inverse_jacobian: Matrix4<T>) -> Self {
        let jacobian = inverse_jacobian
            .try_inverse()
            .expect("Inverse Jacobian must be invertible");
        Self {
            jacobian,
            inverse_jacobian,
        }
    }

    /// Constructs the map from its Jacobian $\partial x_p / \partial X_r$ (row $p$, column $r$).
    pub fn try_from_jacobian(jacobian: Matrix4<T>) -> eyre::Result<Self> {
        let inverse_jacobian = jacobian
            .try_inverse()
            .ok_or_else(|| eyre!("Singular element Jacobian encountered"))?;
        Ok(Self {
            jacobian,
            inverse_jacobian,
        })
    }

    /// The axis-aligned scaling $x_p = k_p X_p$.
    ///
    /// The inverse Jacobian holds exactly the reciprocals $1 / k_p$.
    pub fn scaling(factors: Vector4<T>) -> eyre::Result<Self> {
        if factors.iter().any(|k| k.is_zero()) {
            return Err(eyre!("Scaling factors must be non-zero, got {}", factors.transpose()));
        }
        let reciprocals = factors.map(|k| T::one() / k);
        Ok(Self {
            jacobian: Matrix4::from_diagonal(&factors),
            inverse_jacobian: Matrix4::from_diagonal(&reciprocals),
        })
    }

    /// The map of a linear triangle in the spatial plane spanned by `x` and `y`.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn try_from_triangle(vertices: &[Point2<T>; 3]) -> eyre::Result<Self> {
        let [a, b, c] = vertices;
        let spatial = Matrix2::from_columns(&[b - a, c - a]) * 0.5;
        let mut jacobian = Matrix4::identity();
        jacobian.fixed_view_mut::<2, 2>(0, 0).copy_from(&spatial);
        Self::try_from_jacobian(jacobian)
    }

    /// The map of a linear tetrahedron.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn try_from_tetrahedron(vertices: &[Point3<T>; 4]) -> eyre::Result<Self> {
        let [a, b, c, d] = vertices;
        let spatial = Matrix3::from_columns(&[b - a, c - a, d - a]) * 0.5;
        let mut jacobian = Matrix4::identity();
        jacobian.fixed_view_mut::<3, 3>(0, 0).copy_from(&spatial);
        Self::try_from_jacobian(jacobian)
    }

    /// The Jacobian $\partial x_p / \partial X_r$ (row $p$, column $r$).
    pub fn jacobian(&self) -> &Matrix4<T> {
        &self.jacobian
    }

    /// The inverse Jacobian $\partial X_r / \partial x_p$ (row $r$, column $p$).
    pub fn inverse_jacobian(&self) -> &Matrix4<T> {
        &self.inverse_jacobian
    }
}

impl<T> GeometricMap<T> for AffineMap<T>
where
    T: Real,
{
    fn reference_partial(&self, reference: Axis, physical: Axis) -> Expr<T> {
        Expr::constant(self.inverse_jacobian[(reference.index(), physical.index())])
    }
}

/// A general map whose inverse Jacobian entries are arbitrary expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolicMap<T> {
    // Indexed as [reference][physical]
    entries: [[Expr<T>; 4]; 4],
}

impl<T> SymbolicMap<T>
where
    T: Real,
{
    /// Constructs the map from a function returning $\partial X_r / \partial x_p$ given
    /// `(reference, physical)`.
    pub fn from_fn(mut f: impl FnMut(Axis, Axis) -> Expr<T>) -> Self {
        let entries = Axis::ALL.map(|reference| Axis::ALL.map(|physical| f(reference, physical)));
        Self { entries }
    }

    /// The bilinear map of a quadrilateral in the spatial plane spanned by `x` and `y`.
    ///
    /// The vertices must be given in counter-clockwise order, corresponding to the corners
    /// `(-1, -1), (1, -1), (1, 1), (-1, 1)` of the reference square. Unless the quadrilateral
    /// is a parallelogram, the inverse Jacobian varies over the element.
    ///
    /// Fails if the quadrilateral is not convex or is degenerate, in which case the map is not
    /// invertible everywhere.
    #[allow(non_snake_case)]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn try_from_quadrilateral(vertices: &[Point2<T>; 4]) -> eyre::Result<Self> {
        let reference_corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        let X = Expr::coordinate(Axis::X);
        let Y = Expr::coordinate(Axis::Y);

        // J[p][r] = dx_p / dX_r = sum_i x_i[p] dN_i / dX_r with N_i = (1 + X_i X)(1 + Y_i Y) / 4
        let mut J: [[Expr<T>; 2]; 2] = Default::default();
        for (vertex, &(X_i, Y_i)) in vertices.iter().zip(&reference_corners) {
            let dN_dX = (Expr::one() + &Y * Expr::constant(Y_i)) * Expr::constant(0.25 * X_i);
            let dN_dY = (Expr::one() + &X * Expr::constant(X_i)) * Expr::constant(0.25 * Y_i);
            for p in 0..2 {
                let x_ip = Expr::constant(vertex[p]);
                J[p][0] = &J[p][0] + &x_ip * &dN_dX;
                J[p][1] = &J[p][1] + &x_ip * &dN_dY;
            }
        }

        let det = &J[0][0] * &J[1][1] - &J[0][1] * &J[1][0];
        let corner_determinants: Vec<T> = reference_corners
            .iter()
            .map(|&(X_i, Y_i)| det.evaluate(&nalgebra::Point4::new(X_i, Y_i, 0.0, 0.0)))
            .collect();
        let all_positive = corner_determinants.iter().all(|d| *d > T::zero());
        let all_negative = corner_determinants.iter().all(|d| *d < T::zero());
        if !(all_positive || all_negative) {
            return Err(eyre!(
                "Quadrilateral is degenerate or not convex, Jacobian determinants at corners: {:?}",
                corner_determinants
            ));
        }

        // Inverse of a 2x2 matrix: adjugate divided by determinant
        let adjugate = [[J[1][1].clone(), -&J[0][1]], [-&J[1][0], J[0][0].clone()]];
        Ok(Self::from_fn(|reference, physical| match (reference, physical) {
            (Axis::X | Axis::Y, Axis::X | Axis::Y) => &adjugate[reference.index()][physical.index()] / &det,
            _ if reference == physical => Expr::one(),
            _ => Expr::zero(),
        }))
    }
}

impl<T> GeometricMap<T> for SymbolicMap<T>
where
    T: Real,
{
    fn reference_partial(&self, reference: Axis, physical: Axis) -> Expr<T> {
        self.entries[reference.index()][physical.index()].clone()
    }
}
