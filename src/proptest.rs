use crate::derivatives::Derivatives;
use crate::map::AffineMap;
use crate::symbolic::{Axis, Expr};
use ::proptest::prelude::*;
use nalgebra::{Matrix4, Point4};

pub fn point4() -> impl Strategy<Value = Point4<f64>> {
    // Reference cells are contained in [-1, 1]^4
    let r = -1.0..=1.0;
    [r.clone(), r.clone(), r.clone(), r].prop_map(|[x, y, z, t]| Point4::new(x, y, z, t))
}

/// Polynomial expressions in the reference coordinates.
///
/// Coefficients and depth are kept small so that values on the reference cell stay moderate.
pub fn expr() -> impl Strategy<Value = Expr<f64>> {
    let leaf = prop_oneof![
        (-2.0..2.0).prop_map(Expr::constant),
        prop::sample::select(Axis::ALL.to_vec()).prop_map(Expr::coordinate),
        Just(Expr::zero()),
    ];
    leaf.prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a + b),
            (inner.clone(), inner).prop_map(|(a, b)| a * b),
        ]
    })
}

pub fn derivatives() -> impl Strategy<Value = Derivatives<f64>> {
    [expr(), expr(), expr(), expr()].prop_map(Derivatives::from_array)
}

impl Arbitrary for AffineMap<f64> {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        // Strictly diagonally dominant Jacobians are invertible and reasonably well conditioned.
        // The sign of each diagonal entry is random so that orientation-reversing maps are included.
        let diagonal = prop::array::uniform4((1.0..3.0f64, any::<bool>()));
        let off_diagonal = prop::collection::vec(-0.3..0.3f64, 16);
        (diagonal, off_diagonal)
            .prop_map(|(diagonal, off_diagonal)| {
                let mut jacobian = Matrix4::from_column_slice(&off_diagonal);
                for (i, (magnitude, flip)) in diagonal.into_iter().enumerate() {
                    jacobian[(i, i)] = if flip { -magnitude } else { magnitude };
                }
                AffineMap::try_from_jacobian(jacobian).expect("Diagonally dominant matrices are invertible")
            })
            .boxed()
    }
}
