//! End-to-end mediator flows against a fake ORM session.

use std::rc::Rc;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mediate::{
    Binding, Command, CommandWithResult, Dispatch, HandlerRegistry, Mediator, Notification,
    Operation, OperationError, Processor, ProcessorModule, Query, RecordingDispatcher,
    StubExecutor, Subscriptions, UnitOfWork, UowHandle,
};
use mediate_entities::{Entity, EntityId, Identity};

/// Stand-in for an ORM session: an order table, an audit log and explicit
/// transaction state.
#[derive(Default)]
struct Session {
    orders: Vec<Order>,
    audit: Vec<String>,
    active: bool,
    commits: usize,
    rollbacks: usize,
}

impl UnitOfWork for Session {
    type Error = String;

    fn begin(&mut self) -> Result<(), String> {
        if self.active {
            return Err("transaction already open".into());
        }
        self.active = true;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), String> {
        if !self.active {
            return Err("no open transaction".into());
        }
        self.active = false;
        self.commits += 1;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), String> {
        if !self.active {
            return Err("no open transaction".into());
        }
        self.active = false;
        self.rollbacks += 1;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

struct Order {
    identity: Identity,
    total_cents: i64,
    placed_at: DateTime<Utc>,
}

impl Order {
    fn new(total_cents: i64) -> Self {
        Self {
            identity: Identity::transient(),
            total_cents,
            placed_at: Utc::now(),
        }
    }
}

impl Entity for Order {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }
}

/// Notification payloads.
#[derive(Debug, Clone)]
struct OrderPlaced {
    id: EntityId,
}

#[derive(Debug, Clone)]
struct OrderCancelled {
    id: EntityId,
}

// --- operations -----------------------------------------------------------

struct PlaceOrder {
    binding: Binding<Session>,
    total_cents: i64,
}

impl PlaceOrder {
    fn new(total_cents: i64) -> Self {
        Self {
            binding: Binding::unbound(),
            total_cents,
        }
    }
}

impl Operation<Session> for PlaceOrder {
    fn binding(&self) -> &Binding<Session> {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut Binding<Session> {
        &mut self.binding
    }
}

impl Command<Session> for PlaceOrder {
    fn execute(&mut self) -> Result<(), OperationError> {
        let mut order = Order::new(self.total_cents);
        // The store assigns the durable id on save.
        order.identity_mut().mark_persisted(EntityId::new());
        self.binding.uow_mut()?.orders.push(order);
        Ok(())
    }
}

struct CountOrders {
    binding: Binding<Session>,
}

impl CountOrders {
    fn new() -> Self {
        Self {
            binding: Binding::unbound(),
        }
    }
}

impl Operation<Session> for CountOrders {
    fn binding(&self) -> &Binding<Session> {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut Binding<Session> {
        &mut self.binding
    }
}

impl Query<Session> for CountOrders {
    type Output = usize;

    fn execute(&mut self) -> Result<usize, OperationError> {
        Ok(self.binding.uow()?.orders.len())
    }
}

/// Places an order and reports the new order count via a nested query.
struct PlaceOrderCounted {
    binding: Binding<Session>,
    total_cents: i64,
    result: Option<usize>,
}

impl PlaceOrderCounted {
    fn new(total_cents: i64) -> Self {
        Self {
            binding: Binding::unbound(),
            total_cents,
            result: None,
        }
    }
}

impl Operation<Session> for PlaceOrderCounted {
    fn binding(&self) -> &Binding<Session> {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut Binding<Session> {
        &mut self.binding
    }
}

impl Command<Session> for PlaceOrderCounted {
    fn execute(&mut self) -> Result<(), OperationError> {
        {
            let mut session = self.binding.uow_mut()?;
            let mut order = Order::new(self.total_cents);
            order.identity_mut().mark_persisted(EntityId::new());
            session.orders.push(order);
        }
        self.result = Some(self.binding.query(&mut CountOrders::new())?);
        Ok(())
    }
}

impl CommandWithResult<Session> for PlaceOrderCounted {
    type Output = usize;

    fn take_result(&mut self) -> Option<usize> {
        self.result.take()
    }
}

// --- processors -----------------------------------------------------------

struct Logger {
    subs: Subscriptions<Session>,
}

impl Default for Logger {
    fn default() -> Self {
        let mut subs: Subscriptions<Session> = Subscriptions::new();
        subs.on::<OrderPlaced, _>(|uow, placed| {
            uow.get_mut().audit.push(format!("logger:placed:{}", placed.id));
            Ok(())
        });
        Self { subs }
    }
}

impl Processor<Session> for Logger {
    fn bind(&mut self, uow: UowHandle<Session>) {
        self.subs.bind(uow);
    }

    fn deliver(
        &mut self,
        notification: &dyn mediate::AnyNotification,
    ) -> Result<(), mediate::DeliveryError> {
        self.subs.deliver(notification)
    }
}

struct Notifier {
    subs: Subscriptions<Session>,
}

impl Default for Notifier {
    fn default() -> Self {
        let mut subs: Subscriptions<Session> = Subscriptions::new();
        subs.on::<OrderPlaced, _>(|uow, placed| {
            uow.get_mut()
                .audit
                .push(format!("notifier:placed:{}", placed.id));
            Ok(())
        });
        subs.on::<OrderCancelled, _>(|uow, cancelled: &OrderCancelled| {
            uow.get_mut()
                .audit
                .push(format!("notifier:cancelled:{}", cancelled.id));
            Ok(())
        });
        Self { subs }
    }
}

impl Processor<Session> for Notifier {
    fn bind(&mut self, uow: UowHandle<Session>) {
        self.subs.bind(uow);
    }

    fn deliver(
        &mut self,
        notification: &dyn mediate::AnyNotification,
    ) -> Result<(), mediate::DeliveryError> {
        self.subs.deliver(notification)
    }
}

// --- helpers --------------------------------------------------------------

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

fn order_registry() -> Arc<HandlerRegistry<Session>> {
    let registry = Arc::new(HandlerRegistry::new());
    registry.install(
        ProcessorModule::new("orders")
            .with::<Logger>()
            .with::<Notifier>(),
    );
    registry
}

fn open_session() -> UowHandle<Session> {
    let handle = UowHandle::new(Session::default());
    handle.get_mut().begin().unwrap();
    handle
}

// --- tests ----------------------------------------------------------------

#[test]
fn commands_queries_and_processors_share_one_unit_of_work() {
    init_tracing();
    let handle = open_session();
    let mediator = Mediator::new(handle.clone(), order_registry());

    let mut cmd = PlaceOrder::new(1500);
    mediator.execute_command(&mut cmd).unwrap();

    assert!(UowHandle::same_unit(
        cmd.binding().binder().unwrap().uow(),
        &handle
    ));

    let count = mediator.query(&mut CountOrders::new()).unwrap();
    assert_eq!(count, 1);

    let id = handle.get().orders[0].id();
    mediator.raise(&Notification::new(OrderPlaced { id })).unwrap();

    let audit = handle.get().audit.clone();
    assert_eq!(
        audit,
        vec![
            format!("logger:placed:{id}"),
            format!("notifier:placed:{id}"),
        ]
    );

    handle.get_mut().commit().unwrap();
    assert_eq!(handle.get().commits, 1);
}

#[test]
fn logger_fires_before_notifier_and_cancellation_reaction_stays_silent() {
    let handle = open_session();
    let mediator = Mediator::new(handle.clone(), order_registry());

    let id = EntityId::new();
    mediator.raise(&Notification::new(OrderPlaced { id })).unwrap();

    let audit = handle.get().audit.clone();
    assert_eq!(audit.len(), 2);
    assert!(audit[0].starts_with("logger:"));
    assert!(audit[1].starts_with("notifier:placed:"));
    assert!(audit.iter().all(|line| !line.contains("cancelled")));
}

#[test]
fn cancellation_reaches_only_the_notifier() {
    let handle = open_session();
    let mediator = Mediator::new(handle.clone(), order_registry());

    let id = EntityId::new();
    mediator
        .raise(&Notification::new(OrderCancelled { id }))
        .unwrap();

    let audit = handle.get().audit.clone();
    assert_eq!(audit, vec![format!("notifier:cancelled:{id}")]);
}

#[test]
fn raising_into_an_empty_registry_is_a_no_op() {
    let handle = open_session();
    let mediator = Mediator::new(handle.clone(), Arc::new(HandlerRegistry::new()));

    mediator
        .raise(&Notification::new(OrderPlaced { id: EntityId::new() }))
        .unwrap();

    assert!(handle.get().audit.is_empty());
}

#[test]
fn command_with_result_runs_nested_query_in_the_same_scope() {
    let handle = open_session();
    let mediator = Mediator::new(handle.clone(), order_registry());

    mediator.execute_command(&mut PlaceOrder::new(100)).unwrap();
    let count = mediator
        .execute_command_with_result(&mut PlaceOrderCounted::new(200))
        .unwrap();

    assert_eq!(count, 2);
    // Still the one transaction opened by the request.
    assert!(handle.get().is_active());
    assert_eq!(handle.get().commits, 0);
}

#[test]
fn executor_override_returns_the_canned_result_and_never_binds() {
    let handle = open_session();
    let stub = Rc::new(StubExecutor::new().returns::<PlaceOrderCounted, usize>(42));
    let mediator =
        Mediator::new(handle.clone(), order_registry()).with_executor(stub.clone());

    let mut cmd = PlaceOrderCounted::new(999);
    let result = mediator.execute_command_with_result(&mut cmd).unwrap();

    assert_eq!(result, 42);
    assert!(!cmd.binding().is_bound());
    assert!(handle.get().orders.is_empty());
    assert_eq!(stub.executed().len(), 1);
}

#[test]
fn dispatcher_override_captures_raises_without_dispatching() {
    let handle = open_session();
    let recorder = Rc::new(RecordingDispatcher::new());
    let mediator =
        Mediator::new(handle.clone(), order_registry()).with_dispatcher(recorder.clone());

    mediator
        .raise(&Notification::new(OrderPlaced { id: EntityId::new() }))
        .unwrap();

    // Captured by the double; the registered processors never ran.
    assert_eq!(recorder.raised().len(), 1);
    assert!(recorder.raised()[0].contains("OrderPlaced"));
    assert!(handle.get().audit.is_empty());
}

struct FlakyMailer {
    subs: Subscriptions<Session>,
}

impl Default for FlakyMailer {
    fn default() -> Self {
        let mut subs: Subscriptions<Session> = Subscriptions::new();
        subs.on::<OrderPlaced, _>(|_uow: &UowHandle<Session>, _: &OrderPlaced| {
            Err(anyhow::anyhow!("smtp down").into())
        });
        Self { subs }
    }
}

impl Processor<Session> for FlakyMailer {
    fn bind(&mut self, uow: UowHandle<Session>) {
        self.subs.bind(uow);
    }

    fn deliver(
        &mut self,
        notification: &dyn mediate::AnyNotification,
    ) -> Result<(), mediate::DeliveryError> {
        self.subs.deliver(notification)
    }
}

#[test]
fn failed_delivery_is_aggregated_and_later_processors_still_run() {
    let handle = open_session();
    let registry = Arc::new(HandlerRegistry::new());
    registry.install(
        ProcessorModule::new("orders")
            .with::<FlakyMailer>()
            .with::<Logger>(),
    );
    let mediator = Mediator::new(handle.clone(), registry);

    let id = EntityId::new();
    let err = mediator
        .raise(&Notification::new(OrderPlaced { id }))
        .unwrap_err();

    assert_eq!(err.failures.len(), 1);
    assert!(err.failures[0].0.contains("FlakyMailer"));
    assert_eq!(handle.get().audit, vec![format!("logger:placed:{id}")]);
}

#[test]
fn saved_orders_keep_their_identity() {
    let handle = open_session();
    let mediator = Mediator::new(handle.clone(), order_registry());

    mediator.execute_command(&mut PlaceOrder::new(100)).unwrap();

    let session = handle.get();
    let order = &session.orders[0];
    assert!(!order.is_transient());
    assert!(!order.id().is_nil());
    assert_eq!(order.total_cents, 100);
    assert!(order.placed_at <= Utc::now());
}
