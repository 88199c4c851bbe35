//! Errors reported by the function list.
use crate::function_list::FunctionId;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Misuse of a [`FunctionList`](crate::function_list::FunctionList).
///
/// These errors indicate programming errors on the caller side. The panicking methods of the
/// function list report them by panicking with the same message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FunctionListError {
    /// The identifier was never handed out by the list.
    IdOutOfBounds { id: FunctionId, size: usize },
    /// Reference derivatives have already been specified for the function.
    AlreadySpecified { id: FunctionId },
}

impl Display for FunctionListError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdOutOfBounds { id, size } => {
                write!(f, "Function id {} is out of bounds for function list of size {}", id, size)
            }
            Self::AlreadySpecified { id } => {
                write!(f, "Reference derivatives of function {} have already been specified", id)
            }
        }
    }
}

impl Error for FunctionListError {}
