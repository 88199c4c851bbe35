use crate::{Axis, Expr, ExprNode, Real};

impl<T> Expr<T>
where
    T: Real,
{
    /// Computes the partial derivative of the expression with respect to the reference
    /// coordinate along `axis`.
    pub fn derivative(&self, axis: Axis) -> Expr<T> {
        match self.node() {
            ExprNode::Constant(_) => Expr::zero(),
            ExprNode::Coordinate(other) if *other == axis => Expr::one(),
            ExprNode::Coordinate(_) => Expr::zero(),
            ExprNode::Sum(a, b) => a.derivative(axis) + b.derivative(axis),
            ExprNode::Product(a, b) => a.derivative(axis) * b + a * b.derivative(axis),
            ExprNode::Quotient(a, b) => {
                let numerator = a.derivative(axis) * b - a * b.derivative(axis);
                numerator / (b * b)
            }
        }
    }

    /// The partial derivatives with respect to all four reference coordinates, in axis order.
    pub fn gradient(&self) -> [Expr<T>; 4] {
        Axis::ALL.map(|axis| self.derivative(axis))
    }
}
