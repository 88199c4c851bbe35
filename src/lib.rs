//! A registry of finite element basis functions and their derivatives.
//!
//! Basis functions are registered in a [`FunctionList`](function_list::FunctionList) together
//! with their derivatives with respect to reference coordinates. During assembly, the derivatives
//! with respect to physical coordinates are obtained from the reference derivatives and the
//! [`GeometricMap`](map::GeometricMap) of the element currently being visited by the chain rule.
//! All derivatives are symbolic expressions, so they can be evaluated at any quadrature point.
pub mod derivatives;
pub mod error;
pub mod function_list;
pub mod map;
pub mod transform;

pub mod symbolic {
    pub use fenris_symbolic::*;
}

#[cfg(feature = "proptest-support")]
pub mod proptest;

pub extern crate nalgebra;
