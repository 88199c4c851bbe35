use nalgebra::{Matrix2, Matrix4, Point2, Point4, Vector2};

mod transform;

/// Numerically evaluates the Jacobian of the bilinear map of a quadrilateral at the reference point `p`,
/// embedded in a 4x4 matrix that maps z and t identically.
pub fn bilinear_quad_jacobian(vertices: &[Point2<f64>; 4], p: &Point4<f64>) -> Matrix4<f64> {
    let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
    let mut spatial = Matrix2::zeros();
    for (vertex, (xi, eta)) in vertices.iter().zip(corners) {
        let gradient = Vector2::new(0.25 * xi * (1.0 + eta * p.y), 0.25 * eta * (1.0 + xi * p.x));
        spatial += vertex.coords * gradient.transpose();
    }
    let mut jacobian = Matrix4::identity();
    jacobian.fixed_view_mut::<2, 2>(0, 0).copy_from(&spatial);
    jacobian
}
