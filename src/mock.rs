//! # Mocks & Testing Guide
//!
//! In-memory collaborators for testing controllers without a database or a
//! policy engine.
//!
//! | Type               | Stands in for        | Configured with                              |
//! |--------------------|----------------------|----------------------------------------------|
//! | [`MockGateway`]    | [`ModelGateway`]     | queued expectations (`expect_find`, ...)     |
//! | [`MockAuthorizer`] | [`Authorizer`]       | denied actions, permitted fields, visibility |
//! | [`MockRecord`]     | a [`Model`]          | nothing; records its own assignments         |
//!
//! All three can share one [`CallLog`], so a test can assert the *order* in
//! which the controller talked to them:
//!
//! ```rust
//! use resource_actions::mock::{Call, CallLog, MockAuthorizer, MockGateway, MockRecord};
//! use resource_actions::{ActionContext, ControllerBuilder, MemoryTranslator, Request};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let log = CallLog::new();
//!     let mut gateway = MockGateway::new(MockRecord::factory(log.clone())).with_log(log.clone());
//!     gateway.expect_save().return_ok_with(|record| record.id = Some(1));
//!
//!     let posts = ControllerBuilder::new("posts").build(
//!         gateway,
//!         MockAuthorizer::allow_all().with_log(log.clone()),
//!         MemoryTranslator::with_defaults(),
//!     );
//!
//!     let mut ctx: ActionContext<MockRecord> =
//!         ActionContext::new(Request::new().param("post", json!({"title": "Hi"})));
//!     posts.create(&mut ctx, None).await.unwrap();
//!
//!     let authorize = log.position(|c| matches!(c, Call::Authorize { .. })).unwrap();
//!     let assign = log.position(|c| matches!(c, Call::Assign(_))).unwrap();
//!     let save = log.position(|c| matches!(c, Call::Save(_))).unwrap();
//!     assert!(authorize < assign && assign < save);
//!     assert_eq!(ctx.location(), Some("/posts/1"));
//!     posts.gateway().verify();
//! }
//! ```
//!
//! Unexpected calls panic, which fails the test at the point of the surprise.

use crate::actions::Action;
use crate::authorize::{permit, AuthorizationDecision, Authorizer, Subject};
use crate::error::ActionError;
use crate::gateway::{ModelGateway, MutationOutcome};
use crate::model::{Attributes, Model};
use async_trait::async_trait;
use std::collections::{BTreeSet, VecDeque};
use std::sync::{Arc, Mutex};

// =============================================================================
// CALL LOG
// =============================================================================

/// One collaborator call, as seen by the mocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Construct,
    Find(String),
    ListAll,
    /// URL parameter of the record at the time of the call.
    Save(Option<String>),
    Destroy(Option<String>),
    Authorize { action: Action, subject: String },
    PermittedAttributes(Action),
    Scope(usize),
    /// Field names assigned to a [`MockRecord`].
    Assign(Vec<String>),
}

/// Shared, ordered record of collaborator calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Index of the first call matching `predicate`.
    pub fn position(&self, predicate: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls.lock().unwrap().iter().position(predicate)
    }

    pub fn contains(&self, predicate: impl Fn(&Call) -> bool) -> bool {
        self.position(predicate).is_some()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

// =============================================================================
// MOCK RECORD
// =============================================================================

/// A schemaless record that logs every attribute assignment.
#[derive(Debug, Clone, Default)]
pub struct MockRecord {
    pub id: Option<u32>,
    pub attributes: Attributes,
    log: CallLog,
}

impl MockRecord {
    pub fn new(log: CallLog) -> Self {
        Self {
            id: None,
            attributes: Attributes::new(),
            log,
        }
    }

    pub fn persisted(id: u32, log: CallLog) -> Self {
        Self {
            id: Some(id),
            ..Self::new(log)
        }
    }

    /// Constructor for [`MockGateway::new`].
    pub fn factory(log: CallLog) -> impl Fn() -> MockRecord + Send + Sync + 'static {
        move || MockRecord::new(log.clone())
    }

    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.attributes.get(field)
    }
}

impl Model for MockRecord {
    fn to_param(&self) -> Option<String> {
        self.id.map(|id| id.to_string())
    }

    fn assign_attributes(&mut self, attributes: Attributes) -> Result<(), ActionError> {
        self.log
            .record(Call::Assign(attributes.keys().cloned().collect()));
        self.attributes.extend(attributes);
        Ok(())
    }
}

// =============================================================================
// MOCK GATEWAY
// =============================================================================

type SaveHook<M> = Box<dyn FnOnce(&mut M) + Send>;

/// An expected gateway call and its canned response.
enum Expectation<M> {
    Find {
        id: String,
        response: Result<M, ActionError>,
    },
    ListAll {
        response: Result<Vec<M>, ActionError>,
    },
    Save {
        hook: Option<SaveHook<M>>,
        response: Result<MutationOutcome, ActionError>,
    },
    Destroy {
        response: Result<MutationOutcome, ActionError>,
    },
}

impl<M> Expectation<M> {
    fn name(&self) -> &'static str {
        match self {
            Expectation::Find { .. } => "find",
            Expectation::ListAll { .. } => "list_all",
            Expectation::Save { .. } => "save",
            Expectation::Destroy { .. } => "destroy",
        }
    }
}

type Expectations<M> = Arc<Mutex<VecDeque<Expectation<M>>>>;

/// A gateway answering from a queue of expectations.
///
/// # Example
/// ```ignore
/// let mut gateway = MockGateway::new(MockRecord::factory(log.clone()));
/// gateway.expect_find("1").return_ok(MockRecord::persisted(1, log.clone()));
/// gateway.expect_save().return_errors(["title can't be blank"]);
/// // ... run the controller ...
/// gateway.verify(); // Ensures all expectations were met
/// ```
pub struct MockGateway<M> {
    constructor: Box<dyn Fn() -> M + Send + Sync>,
    expectations: Expectations<M>,
    log: CallLog,
}

impl<M: Model> MockGateway<M> {
    pub fn new(constructor: impl Fn() -> M + Send + Sync + 'static) -> Self {
        Self {
            constructor: Box::new(constructor),
            expectations: Arc::new(Mutex::new(VecDeque::new())),
            log: CallLog::new(),
        }
    }

    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    pub fn log(&self) -> &CallLog {
        &self.log
    }

    /// Expects a `find` for `id`.
    pub fn expect_find(&mut self, id: impl Into<String>) -> FindExpectationBuilder<M> {
        FindExpectationBuilder {
            id: id.into(),
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_list_all(&mut self) -> ListExpectationBuilder<M> {
        ListExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_save(&mut self) -> MutationExpectationBuilder<M> {
        MutationExpectationBuilder {
            destroy: false,
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_destroy(&mut self) -> MutationExpectationBuilder<M> {
        MutationExpectationBuilder {
            destroy: true,
            expectations: self.expectations.clone(),
        }
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            let pending: Vec<_> = exps.iter().map(Expectation::name).collect();
            panic!("Not all expectations were met. {} remaining: {:?}", exps.len(), pending);
        }
    }

    fn next(&self, call: &str) -> Expectation<M> {
        match self.expectations.lock().unwrap().pop_front() {
            Some(expectation) => expectation,
            None => panic!("Unexpected {call}: no expectations left"),
        }
    }
}

#[async_trait]
impl<M: Model> ModelGateway<M> for MockGateway<M> {
    fn construct(&self) -> M {
        self.log.record(Call::Construct);
        (self.constructor)()
    }

    async fn find(&self, id: &str) -> Result<M, ActionError> {
        self.log.record(Call::Find(id.to_string()));
        match self.next("find") {
            Expectation::Find {
                id: expected,
                response,
            } => {
                assert_eq!(expected, id, "find called with unexpected id");
                response
            }
            other => panic!("Expected {}, got find", other.name()),
        }
    }

    async fn list_all(&self) -> Result<Vec<M>, ActionError> {
        self.log.record(Call::ListAll);
        match self.next("list_all") {
            Expectation::ListAll { response } => response,
            other => panic!("Expected {}, got list_all", other.name()),
        }
    }

    async fn save(&self, record: &mut M) -> Result<MutationOutcome, ActionError> {
        self.log.record(Call::Save(record.to_param()));
        match self.next("save") {
            Expectation::Save { hook, response } => {
                if let (Some(hook), Ok(outcome)) = (hook, &response) {
                    if outcome.is_success() {
                        hook(record);
                    }
                }
                response
            }
            other => panic!("Expected {}, got save", other.name()),
        }
    }

    async fn destroy(&self, record: &mut M) -> Result<MutationOutcome, ActionError> {
        self.log.record(Call::Destroy(record.to_param()));
        match self.next("destroy") {
            Expectation::Destroy { response } => response,
            other => panic!("Expected {}, got destroy", other.name()),
        }
    }
}

/// Builder for `find` expectations.
pub struct FindExpectationBuilder<M> {
    id: String,
    expectations: Expectations<M>,
}

impl<M> FindExpectationBuilder<M> {
    pub fn return_ok(self, record: M) {
        self.push(Ok(record));
    }

    pub fn return_not_found(self) {
        let error = ActionError::NotFound(self.id.clone());
        self.push(Err(error));
    }

    pub fn return_err(self, error: ActionError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<M, ActionError>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Find {
            id: self.id,
            response,
        });
    }
}

/// Builder for `list_all` expectations.
pub struct ListExpectationBuilder<M> {
    expectations: Expectations<M>,
}

impl<M> ListExpectationBuilder<M> {
    pub fn return_ok(self, records: Vec<M>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::ListAll {
            response: Ok(records),
        });
    }

    pub fn return_err(self, error: ActionError) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::ListAll {
            response: Err(error),
        });
    }
}

/// Builder for `save` and `destroy` expectations.
pub struct MutationExpectationBuilder<M> {
    destroy: bool,
    expectations: Expectations<M>,
}

impl<M> MutationExpectationBuilder<M> {
    pub fn return_ok(self) {
        self.push(None, Ok(MutationOutcome::success()));
    }

    /// Succeeds and lets `hook` update the record, e.g. to give it an id.
    /// Only meaningful for `save`.
    pub fn return_ok_with(self, hook: impl FnOnce(&mut M) + Send + 'static) {
        self.push(Some(Box::new(hook)), Ok(MutationOutcome::success()));
    }

    /// Fails validation with the given messages.
    pub fn return_errors<I, S>(self, errors: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(None, Ok(MutationOutcome::failure(errors)));
    }

    pub fn return_err(self, error: ActionError) {
        self.push(None, Err(error));
    }

    fn push(self, hook: Option<SaveHook<M>>, response: Result<MutationOutcome, ActionError>) {
        let mut exps = self.expectations.lock().unwrap();
        if self.destroy {
            exps.push_back(Expectation::Destroy { response });
        } else {
            exps.push_back(Expectation::Save { hook, response });
        }
    }
}

// =============================================================================
// MOCK AUTHORIZER
// =============================================================================

/// A policy configured up front: everything is allowed unless denied.
#[derive(Debug, Clone, Default)]
pub struct MockAuthorizer {
    denied: BTreeSet<Action>,
    permitted: Option<Vec<String>>,
    visible: Option<BTreeSet<String>>,
    log: CallLog,
}

impl MockAuthorizer {
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn deny(mut self, action: Action) -> Self {
        self.denied.insert(action);
        self
    }

    pub fn deny_all() -> Self {
        Action::ALL
            .into_iter()
            .fold(Self::default(), |auth, action| auth.deny(action))
    }

    /// Only these fields may be assigned; all fields are permitted otherwise.
    pub fn permit(mut self, fields: &[&str]) -> Self {
        self.permitted = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    /// Only records with these URL parameters survive `scope`.
    pub fn visible(mut self, params: &[&str]) -> Self {
        self.visible = Some(params.iter().map(|p| p.to_string()).collect());
        self
    }

    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    pub fn log(&self) -> &CallLog {
        &self.log
    }
}

#[async_trait]
impl<M: Model> Authorizer<M> for MockAuthorizer {
    async fn authorize(&self, subject: Subject<'_, M>, action: Action) -> AuthorizationDecision {
        self.log.record(Call::Authorize {
            action,
            subject: subject.describe(),
        });
        if self.denied.contains(&action) {
            AuthorizationDecision::deny(format!("{action} is denied"))
        } else {
            AuthorizationDecision::allow()
        }
    }

    async fn permitted_attributes(
        &self,
        _record: &M,
        action: Action,
        params: &Attributes,
    ) -> Attributes {
        self.log.record(Call::PermittedAttributes(action));
        match &self.permitted {
            Some(fields) => {
                let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
                permit(params, &fields)
            }
            None => params.clone(),
        }
    }

    async fn scope(&self, records: Vec<M>) -> Vec<M> {
        self.log.record(Call::Scope(records.len()));
        match &self.visible {
            Some(visible) => records
                .into_iter()
                .filter(|r| r.to_param().is_some_and(|p| visible.contains(&p)))
                .collect(),
            None => records,
        }
    }
}
