//! The binding slot shared by commands and queries.

use std::cell::{Ref, RefMut};

use crate::binder::Binder;
use crate::error::OperationError;
use crate::query::Query;

/// An object the binder can attach a unit of work to.
///
/// Commands and queries implement this by embedding a [`Binding`] and
/// handing out access to it.
pub trait Operation<U> {
    fn binding(&self) -> &Binding<U>;
    fn binding_mut(&mut self) -> &mut Binding<U>;
}

/// The slot the binder fills immediately before execution.
///
/// Plays the role of a "current session" field: unbound when the operation
/// is constructed, bound exactly once by the default execution path, and
/// never bound at all when an override executor is installed.
#[derive(Debug)]
pub struct Binding<U> {
    binder: Option<Binder<U>>,
}

impl<U> Default for Binding<U> {
    fn default() -> Self {
        Self { binder: None }
    }
}

impl<U: 'static> Binding<U> {
    pub fn unbound() -> Self {
        Self::default()
    }

    pub fn is_bound(&self) -> bool {
        self.binder.is_some()
    }

    /// Attach the binder this operation will run under.
    pub fn attach(&mut self, binder: Binder<U>) {
        self.binder = Some(binder);
    }

    /// The binder this operation runs under.
    pub fn binder(&self) -> Result<&Binder<U>, OperationError> {
        self.binder.as_ref().ok_or(OperationError::Unbound)
    }

    /// Immutable access to the bound unit of work.
    pub fn uow(&self) -> Result<Ref<'_, U>, OperationError> {
        Ok(self.binder()?.uow().get())
    }

    /// Mutable access to the bound unit of work.
    ///
    /// Release the borrow before running a nested query.
    pub fn uow_mut(&self) -> Result<RefMut<'_, U>, OperationError> {
        Ok(self.binder()?.uow().get_mut())
    }

    /// Run a nested query under the same binder: same unit of work, same
    /// executor, no new transactional scope. Nesting depth is unbounded.
    pub fn query<Q>(&self, query: &mut Q) -> Result<Q::Output, OperationError>
    where
        Q: Query<U> + 'static,
    {
        self.binder()?.query(query)
    }
}
