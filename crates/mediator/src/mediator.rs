//! The per-request mediator surface.

use std::rc::Rc;
use std::sync::Arc;

use mediate_core::{
    Binder, Command, CommandWithResult, OperationError, OperationExecutor, Query, UowHandle,
};
use mediate_events::{
    Dispatch, DispatchError, EventDispatcher, HandlerRegistry, Notification,
};

/// Request-scoped entry point for commands, queries and notifications.
///
/// Built once per request around the caller's unit of work; every
/// operation and processor activated through it shares that unit of work.
/// The surrounding request lifecycle owns begin/commit/rollback — the
/// mediator never touches the transaction.
pub struct Mediator<U> {
    binder: Binder<U>,
    dispatcher: Rc<dyn Dispatch<U>>,
}

impl<U: 'static> Mediator<U> {
    /// Mediator over the default execution and dispatch paths.
    pub fn new(uow: UowHandle<U>, registry: Arc<HandlerRegistry<U>>) -> Self {
        Self {
            binder: Binder::new(uow),
            dispatcher: Rc::new(EventDispatcher::new(registry)),
        }
    }

    /// Replace the execution strategy for all three operation kinds.
    ///
    /// The default path — unit-of-work binding included — is skipped
    /// entirely while the replacement is installed.
    pub fn with_executor(mut self, executor: Rc<dyn OperationExecutor<U>>) -> Self {
        self.binder = Binder::with_executor(self.binder.uow().clone(), executor);
        self
    }

    /// Replace the notification dispatch strategy.
    pub fn with_dispatcher(mut self, dispatcher: Rc<dyn Dispatch<U>>) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// The unit of work shared by everything this mediator runs.
    pub fn uow(&self) -> &UowHandle<U> {
        self.binder.uow()
    }

    /// Bind and run a command.
    pub fn execute_command<C>(&self, cmd: &mut C) -> Result<(), OperationError>
    where
        C: Command<U> + 'static,
    {
        self.binder.command(cmd)
    }

    /// Bind and run a result-bearing command, returning its result.
    pub fn execute_command_with_result<C>(&self, cmd: &mut C) -> Result<C::Output, OperationError>
    where
        C: CommandWithResult<U> + 'static,
    {
        self.binder.command_with_result(cmd)
    }

    /// Bind and run a query, returning its result.
    pub fn query<Q>(&self, query: &mut Q) -> Result<Q::Output, OperationError>
    where
        Q: Query<U> + 'static,
    {
        self.binder.query(query)
    }

    /// Broadcast a notification to every registered processor, sharing
    /// this mediator's unit of work.
    pub fn raise<T: 'static>(&self, notification: &Notification<T>) -> Result<(), DispatchError> {
        self.dispatcher.dispatch(notification, self.binder.uow())
    }
}
