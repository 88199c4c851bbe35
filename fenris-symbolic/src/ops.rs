use crate::{Expr, Real};
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Implements a binary operator for all combinations of owned and borrowed operands,
/// forwarding to the given constructor.
macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, |$a:ident, $b:ident| $body:expr) => {
        impl<T: Real> $trait<Expr<T>> for Expr<T> {
            type Output = Expr<T>;

            fn $method(self, rhs: Expr<T>) -> Expr<T> {
                let ($a, $b) = (self, rhs);
                $body
            }
        }

        impl<'a, T: Real> $trait<&'a Expr<T>> for Expr<T> {
            type Output = Expr<T>;

            fn $method(self, rhs: &'a Expr<T>) -> Expr<T> {
                let ($a, $b) = (self, rhs.clone());
                $body
            }
        }

        impl<'a, T: Real> $trait<Expr<T>> for &'a Expr<T> {
            type Output = Expr<T>;

            fn $method(self, rhs: Expr<T>) -> Expr<T> {
                let ($a, $b) = (self.clone(), rhs);
                $body
            }
        }

        impl<'a, 'b, T: Real> $trait<&'b Expr<T>> for &'a Expr<T> {
            type Output = Expr<T>;

            fn $method(self, rhs: &'b Expr<T>) -> Expr<T> {
                let ($a, $b) = (self.clone(), rhs.clone());
                $body
            }
        }
    };
}

impl_binary_op!(Add, add, |a, b| Expr::sum(a, b));
impl_binary_op!(Sub, sub, |a, b| Expr::sum(a, Expr::negation(b)));
impl_binary_op!(Mul, mul, |a, b| Expr::product(a, b));
impl_binary_op!(Div, div, |a, b| Expr::quotient(a, b));

impl<T: Real> Neg for Expr<T> {
    type Output = Expr<T>;

    fn neg(self) -> Expr<T> {
        Expr::negation(self)
    }
}

impl<'a, T: Real> Neg for &'a Expr<T> {
    type Output = Expr<T>;

    fn neg(self) -> Expr<T> {
        Expr::negation(self.clone())
    }
}

impl<T: Real> Sum for Expr<T> {
    fn sum<I: Iterator<Item = Expr<T>>>(iter: I) -> Self {
        iter.fold(Expr::zero(), |acc, term| acc + term)
    }
}

impl<T: Real> Default for Expr<T> {
    fn default() -> Self {
        Expr::zero()
    }
}

impl<T: Real> num::Zero for Expr<T> {
    fn zero() -> Self {
        Expr::constant(T::zero())
    }

    fn is_zero(&self) -> bool {
        Expr::is_zero(self)
    }
}

impl<T: Real> num::One for Expr<T> {
    fn one() -> Self {
        Expr::constant(T::one())
    }
}
