use crate::{Axis, Real};
use nalgebra::Point4;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// A node in an expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprNode<T> {
    Constant(T),
    /// The reference coordinate along the given axis.
    Coordinate(Axis),
    Sum(Expr<T>, Expr<T>),
    Product(Expr<T>, Expr<T>),
    Quotient(Expr<T>, Expr<T>),
}

/// A symbolic expression over the reference coordinates `(X, Y, Z, T)`.
///
/// Nodes are shared, so cloning is cheap regardless of the size of the expression.
/// Equality is structural.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expr<T> {
    node: Arc<ExprNode<T>>,
}

impl<T> Expr<T> {
    fn from_node(node: ExprNode<T>) -> Self {
        Self { node: Arc::new(node) }
    }

    pub fn node(&self) -> &ExprNode<T> {
        &self.node
    }

    pub fn coordinate(axis: Axis) -> Self {
        Self::from_node(ExprNode::Coordinate(axis))
    }
}

impl<T> Expr<T>
where
    T: Real,
{
    pub fn constant(value: T) -> Self {
        Self::from_node(ExprNode::Constant(value))
    }

    pub fn zero() -> Self {
        Self::constant(T::zero())
    }

    pub fn one() -> Self {
        Self::constant(T::one())
    }

    /// Returns the value of the expression if it is a constant.
    pub fn as_constant(&self) -> Option<T> {
        match self.node() {
            ExprNode::Constant(value) => Some(*value),
            _ => None,
        }
    }

    /// Whether the expression is the constant zero.
    ///
    /// An expression that merely evaluates to zero everywhere, such as `X - X`,
    /// is not recognized.
    pub fn is_zero(&self) -> bool {
        self.as_constant().map(|c| c == T::zero()).unwrap_or(false)
    }

    pub fn is_one(&self) -> bool {
        self.as_constant().map(|c| c == T::one()).unwrap_or(false)
    }

    /// Multiplies the expression by a scalar expression.
    pub fn scale(&self, factor: &Expr<T>) -> Expr<T> {
        Self::product(self.clone(), factor.clone())
    }

    /// Evaluates the expression at the given reference point `(X, Y, Z, T)`.
    pub fn evaluate(&self, point: &Point4<T>) -> T {
        match self.node() {
            ExprNode::Constant(value) => *value,
            ExprNode::Coordinate(axis) => point[axis.index()],
            ExprNode::Sum(a, b) => a.evaluate(point) + b.evaluate(point),
            ExprNode::Product(a, b) => a.evaluate(point) * b.evaluate(point),
            ExprNode::Quotient(a, b) => a.evaluate(point) / b.evaluate(point),
        }
    }

    pub(crate) fn sum(a: Expr<T>, b: Expr<T>) -> Expr<T> {
        match (a.as_constant(), b.as_constant()) {
            (Some(a), Some(b)) => Self::constant(a + b),
            _ if a.is_zero() => b,
            _ if b.is_zero() => a,
            _ => Self::from_node(ExprNode::Sum(a, b)),
        }
    }

    pub(crate) fn product(a: Expr<T>, b: Expr<T>) -> Expr<T> {
        match (a.as_constant(), b.as_constant()) {
            (Some(a), Some(b)) => Self::constant(a * b),
            _ if a.is_zero() || b.is_zero() => Self::zero(),
            _ if a.is_one() => b,
            _ if b.is_one() => a,
            _ => Self::from_node(ExprNode::Product(a, b)),
        }
    }

    pub(crate) fn quotient(a: Expr<T>, b: Expr<T>) -> Expr<T> {
        match (a.as_constant(), b.as_constant()) {
            // Division by a constant zero is kept symbolic so that it surfaces on evaluation
            (Some(a), Some(b)) if b != T::zero() => Self::constant(a / b),
            _ if a.is_zero() => Self::zero(),
            _ if b.is_one() => a,
            _ => Self::from_node(ExprNode::Quotient(a, b)),
        }
    }

    pub(crate) fn negation(a: Expr<T>) -> Expr<T> {
        Self::product(Self::constant(-T::one()), a)
    }
}

impl<T> Display for Expr<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.node() {
            ExprNode::Constant(value) => write!(f, "{}", value),
            ExprNode::Coordinate(axis) => write!(f, "{}", axis),
            ExprNode::Sum(a, b) => write!(f, "({} + {})", a, b),
            ExprNode::Product(a, b) => write!(f, "({} * {})", a, b),
            ExprNode::Quotient(a, b) => write!(f, "({} / {})", a, b),
        }
    }
}
