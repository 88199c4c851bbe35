//! A registry of basis functions and their derivatives.
//!
//! Each basis function is registered once and receives a dense identifier. Its derivatives with
//! respect to reference coordinates are specified once and never change afterwards. Derivatives
//! with respect to physical coordinates depend on the element currently being assembled, and are
//! recomputed from the reference derivatives whenever the geometric map changes.
//!
//! The derivatives of an entry progress through the states [`EntryState::Registered`],
//! [`EntryState::Specified`] and [`EntryState::Transformed`], and never move backwards.
use crate::derivatives::Derivatives;
use crate::error::FunctionListError;
use crate::map::GeometricMap;
use crate::symbolic::{Axis, Expr, Real};
use crate::transform::transform_derivatives;
use log::{debug, warn};
use nalgebra::Point4;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};

/// Identifier of a basis function in a [`FunctionList`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionId(usize);

impl FunctionId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for FunctionId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl Display for FunctionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A basis function that can be evaluated at a point `(x, y, z, t)`.
///
/// Implemented for all suitable closures and function pointers.
pub trait BasisFunction<T>: Send + Sync {
    fn evaluate(&self, x: T, y: T, z: T, t: T) -> T;
}

impl<T, F> BasisFunction<T> for F
where
    F: Fn(T, T, T, T) -> T + Send + Sync,
{
    fn evaluate(&self, x: T, y: T, z: T, t: T) -> T {
        self(x, y, z, t)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryState {
    /// The function is registered, but its reference derivatives are not yet specified.
    ///
    /// Updating such an entry stores zero physical derivatives and keeps it in this state.
    Registered,
    /// Reference derivatives are specified, but physical derivatives have never been computed.
    Specified,
    /// Physical derivatives are current for the most recently applied map.
    Transformed,
}

/// A registered basis function together with its derivatives.
pub struct FunctionData<T> {
    id: FunctionId,
    function: Box<dyn BasisFunction<T>>,
    reference: Derivatives<T>,
    physical: Derivatives<T>,
    state: EntryState,
}

impl<T> FunctionData<T>
where
    T: Real,
{
    fn new(id: FunctionId, function: Box<dyn BasisFunction<T>>) -> Self {
        Self {
            id,
            function,
            reference: Derivatives::zero(),
            physical: Derivatives::zero(),
            state: EntryState::Registered,
        }
    }

    pub fn id(&self) -> FunctionId {
        self.id
    }

    pub fn state(&self) -> EntryState {
        self.state
    }

    pub fn evaluate(&self, x: T, y: T, z: T, t: T) -> T {
        self.function.evaluate(x, y, z, t)
    }

    /// Derivatives with respect to reference coordinates `(X, Y, Z, T)`.
    ///
    /// All zero until specified.
    pub fn reference_derivatives(&self) -> &Derivatives<T> {
        &self.reference
    }

    /// Derivatives with respect to physical coordinates `(x, y, z, t)`.
    ///
    /// All zero until the entry has been updated with a map.
    pub fn physical_derivatives(&self) -> &Derivatives<T> {
        &self.physical
    }
}

impl<T> FunctionData<T>
where
    T: Real,
{
    fn transform<M>(&self, map: &M) -> Derivatives<T>
    where
        M: GeometricMap<T> + ?Sized,
    {
        if self.state == EntryState::Registered {
            warn!(
                "Transforming basis function {} whose reference derivatives have not been specified",
                self.id
            );
        }
        transform_derivatives(&self.reference, map)
    }
}

impl<T> Debug for FunctionData<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionData")
            .field("id", &self.id)
            .field("reference", &self.reference)
            .field("physical", &self.physical)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// An append-only list of basis functions, indexed by [`FunctionId`].
///
/// The list starts out empty and grows by one entry for every call to [`add`](Self::add).
/// Identifiers are handed out sequentially starting from zero and are never reused.
///
/// The accessors that take an identifier panic if the identifier was not handed out by this
/// list. Use [`get`](Self::get) or the `try_` methods for non-panicking variants.
#[derive(Debug)]
pub struct FunctionList<T> {
    entries: Vec<FunctionData<T>>,
}

impl<T> Default for FunctionList<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> FunctionList<T>
where
    T: Real,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Registers a basis function and returns its identifier.
    ///
    /// All derivatives of the new entry are zero until specified with [`set`](Self::set).
    pub fn add(&mut self, function: impl BasisFunction<T> + 'static) -> FunctionId {
        let id = FunctionId::new(self.entries.len());
        self.entries.push(FunctionData::new(id, Box::new(function)));
        debug!("Registered basis function {}", id);
        id
    }

    /// Registers a basis function given as an expression in reference coordinates.
    ///
    /// The reference derivatives are obtained by symbolic differentiation, so the entry is
    /// immediately in the [`EntryState::Specified`] state. The function is evaluated by
    /// interpreting `(x, y, z, t)` as reference coordinates.
    pub fn add_expr(&mut self, expr: Expr<T>) -> FunctionId {
        let [dd_x, dd_y, dd_z, dd_t] = expr.gradient();
        let id = self.add(move |x: T, y: T, z: T, t: T| expr.evaluate(&Point4::new(x, y, z, t)));
        self.set(id, dd_x, dd_y, dd_z, dd_t);
        id
    }

    /// Specifies the derivatives of a basis function with respect to reference coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of bounds or if the derivatives have already been specified.
    #[allow(non_snake_case)]
    pub fn set(&mut self, id: FunctionId, ddX: Expr<T>, ddY: Expr<T>, ddZ: Expr<T>, ddT: Expr<T>) {
        if let Err(err) = self.try_set(id, ddX, ddY, ddZ, ddT) {
            panic!("{}", err);
        }
    }

    /// Same as [`set`](Self::set), but returns an error instead of panicking.
    #[allow(non_snake_case)]
    pub fn try_set(
        &mut self,
        id: FunctionId,
        ddX: Expr<T>,
        ddY: Expr<T>,
        ddZ: Expr<T>,
        ddT: Expr<T>,
    ) -> Result<(), FunctionListError> {
        let entry = self.try_entry_mut(id)?;
        if entry.state != EntryState::Registered {
            return Err(FunctionListError::AlreadySpecified { id });
        }
        entry.reference = Derivatives::new(ddX, ddY, ddZ, ddT);
        entry.state = EntryState::Specified;
        debug!("Specified reference derivatives of basis function {}", id);
        Ok(())
    }

    /// The number of registered basis functions.
    ///
    /// This is also the identifier that the next registered function will receive.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Identifiers of all registered functions, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = FunctionId> {
        (0..self.size()).map(FunctionId::new)
    }

    pub fn get(&self, id: FunctionId) -> Option<&FunctionData<T>> {
        self.entries.get(id.index())
    }

    /// Evaluates the basis function at the given point.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of bounds.
    pub fn eval(&self, id: FunctionId, x: T, y: T, z: T, t: T) -> T {
        self.entry(id).evaluate(x, y, z, t)
    }

    /// Computes the derivatives of the basis function with respect to physical coordinates
    /// for the given map, without storing them.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of bounds.
    pub fn transform<M>(&self, id: FunctionId, map: &M) -> Derivatives<T>
    where
        M: GeometricMap<T> + ?Sized,
    {
        self.entry(id).transform(map)
    }

    /// Computes the physical derivatives of every registered basis function for the given map,
    /// in identifier order, without storing them.
    ///
    /// The computation runs in parallel.
    pub fn transform_all<M>(&self, map: &M) -> Vec<Derivatives<T>>
    where
        M: GeometricMap<T> + Sync + ?Sized,
    {
        self.entries
            .par_iter()
            .map(|entry| entry.transform(map))
            .collect()
    }

    /// Recomputes and stores the physical derivatives of exactly the identified basis function
    /// for the given map. Previously stored physical derivatives are overwritten.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of bounds.
    pub fn update<M>(&mut self, id: FunctionId, map: &M) -> &Derivatives<T>
    where
        M: GeometricMap<T> + ?Sized,
    {
        match self.try_update(id, map) {
            Ok(derivatives) => derivatives,
            Err(err) => panic!("{}", err),
        }
    }

    /// Same as [`update`](Self::update), but returns an error instead of panicking.
    pub fn try_update<M>(&mut self, id: FunctionId, map: &M) -> Result<&Derivatives<T>, FunctionListError>
    where
        M: GeometricMap<T> + ?Sized,
    {
        let entry = self.try_entry_mut(id)?;
        entry.physical = entry.transform(map);
        // An entry without reference derivatives stays open for `set`
        if entry.state != EntryState::Registered {
            entry.state = EntryState::Transformed;
        }
        debug!("Updated physical derivatives of basis function {}", id);
        Ok(&entry.physical)
    }

    /// All derivatives with respect to reference coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of bounds.
    pub fn reference_derivatives(&self, id: FunctionId) -> &Derivatives<T> {
        self.entry(id).reference_derivatives()
    }

    /// All derivatives with respect to physical coordinates, as of the most recent update.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of bounds.
    pub fn physical_derivatives(&self, id: FunctionId) -> &Derivatives<T> {
        self.entry(id).physical_derivatives()
    }

    pub fn ddx(&self, id: FunctionId) -> &Expr<T> {
        &self.physical_derivatives(id)[Axis::X]
    }

    pub fn ddy(&self, id: FunctionId) -> &Expr<T> {
        &self.physical_derivatives(id)[Axis::Y]
    }

    pub fn ddz(&self, id: FunctionId) -> &Expr<T> {
        &self.physical_derivatives(id)[Axis::Z]
    }

    pub fn ddt(&self, id: FunctionId) -> &Expr<T> {
        &self.physical_derivatives(id)[Axis::T]
    }

    #[allow(non_snake_case)]
    pub fn ddX(&self, id: FunctionId) -> &Expr<T> {
        &self.reference_derivatives(id)[Axis::X]
    }

    #[allow(non_snake_case)]
    pub fn ddY(&self, id: FunctionId) -> &Expr<T> {
        &self.reference_derivatives(id)[Axis::Y]
    }

    #[allow(non_snake_case)]
    pub fn ddZ(&self, id: FunctionId) -> &Expr<T> {
        &self.reference_derivatives(id)[Axis::Z]
    }

    #[allow(non_snake_case)]
    pub fn ddT(&self, id: FunctionId) -> &Expr<T> {
        &self.reference_derivatives(id)[Axis::T]
    }

    fn out_of_bounds(&self, id: FunctionId) -> FunctionListError {
        FunctionListError::IdOutOfBounds { id, size: self.size() }
    }

    fn try_entry(&self, id: FunctionId) -> Result<&FunctionData<T>, FunctionListError> {
        self.entries
            .get(id.index())
            .ok_or_else(|| self.out_of_bounds(id))
    }

    fn try_entry_mut(&mut self, id: FunctionId) -> Result<&mut FunctionData<T>, FunctionListError> {
        let err = self.out_of_bounds(id);
        self.entries.get_mut(id.index()).ok_or(err)
    }

    fn entry(&self, id: FunctionId) -> &FunctionData<T> {
        match self.try_entry(id) {
            Ok(entry) => entry,
            Err(err) => panic!("{}", err),
        }
    }
}
