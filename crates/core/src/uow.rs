//! Shared handle to the request's unit of work.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// Transactional session contract the surrounding application supplies.
///
/// The mediator never calls these methods. Opening, committing and rolling
/// back belong to the request lifecycle (an action filter, a middleware);
/// the trait exists so that layer and its test doubles agree on a shape.
pub trait UnitOfWork {
    type Error;

    fn begin(&mut self) -> Result<(), Self::Error>;
    fn commit(&mut self) -> Result<(), Self::Error>;
    fn rollback(&mut self) -> Result<(), Self::Error>;

    /// True while a transaction is open.
    fn is_active(&self) -> bool;
}

/// Shared, request-scoped handle to a unit of work of type `U`.
///
/// Created once per request by the caller and cloned into every command,
/// query and processor activated within it. `U` itself — its data-access
/// surface included — is opaque here.
///
/// One request maps to one thread of control, so the handle is deliberately
/// single-threaded (`Rc<RefCell<_>>`) and there is no locking. Keep borrows
/// short: release a borrow before running a nested query, or the nested
/// operation's own borrow will panic.
#[derive(Debug)]
pub struct UowHandle<U>(Rc<RefCell<U>>);

impl<U> Clone for UowHandle<U> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<U> UowHandle<U> {
    pub fn new(uow: U) -> Self {
        Self(Rc::new(RefCell::new(uow)))
    }

    /// Immutable access to the unit of work.
    pub fn get(&self) -> Ref<'_, U> {
        self.0.borrow()
    }

    /// Mutable access to the unit of work.
    pub fn get_mut(&self) -> RefMut<'_, U> {
        self.0.borrow_mut()
    }

    /// Whether two handles refer to the same unit of work.
    pub fn same_unit(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}
