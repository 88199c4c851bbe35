//! Symbolic expressions over the reference coordinates of a finite element.
//!
//! The main purpose of this crate is to support basis function derivatives in `fenris-basis`.
//! Expressions are immutable trees with shared nodes, so cloning an expression is cheap and
//! expressions can be freely combined, evaluated at arbitrary points and differentiated.
//!
//! Arithmetic folds exactly: adding zero, multiplying by zero or one and combining two constants
//! are simplified on construction. No other rewriting takes place.
use nalgebra::RealField;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

mod differentiate;
mod expr;
mod ops;

pub use expr::{Expr, ExprNode};

pub extern crate nalgebra;

/// Scalar types that expressions can be built from.
pub trait Real: RealField + Copy {}

impl<T: RealField + Copy> Real for T {}

/// One of the four coordinate axes, three spatial and one temporal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
    T,
}

impl Axis {
    /// All axes in index order.
    pub const ALL: [Axis; 4] = [Axis::X, Axis::Y, Axis::Z, Axis::T];

    /// The index of the axis in `0 .. 4`.
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
            Axis::T => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl Display for Axis {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
            Axis::T => "T",
        };
        write!(f, "{}", name)
    }
}
