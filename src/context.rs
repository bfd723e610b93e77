//! # Action Context
//!
//! Everything one request carries through an action: its parameters, the
//! referring location, the response being built, the flash and the assigned
//! records.
//!
//! Records are stored in [`Assigns`], an explicit map keyed by the names the
//! [`naming`](crate::naming) module derives (`post` for the member slot,
//! `posts` for the collection slot). Templates and handlers read them back by
//! the same keys.
//!
//! A context belongs to exactly one request and is borrowed mutably by the
//! action handling it; nothing in it is shared between requests.

use crate::actions::Action;
use crate::flash::{is_redirect, Flash};
use crate::model::Attributes;
use serde_json::Value;
use std::collections::HashMap;

/// Status a response starts with before any action decides otherwise.
pub const DEFAULT_STATUS: u16 = 200;

/// Incoming request data, as extracted by the host framework.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub params: Attributes,
    pub referer: Option<String>,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Sets the URL identifier used by lookup actions.
    pub fn id(self, id: impl ToString) -> Self {
        self.param("id", id.to_string())
    }

    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }
}

/// The response an action produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub location: Option<String>,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: DEFAULT_STATUS,
            location: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Slot<M> {
    Member(M),
    Collection(Vec<M>),
}

/// Records assigned by actions, keyed by slot name.
#[derive(Debug, Clone)]
pub struct Assigns<M> {
    slots: HashMap<String, Slot<M>>,
}

impl<M> Default for Assigns<M> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<M> Assigns<M> {
    pub fn set_member(&mut self, key: impl Into<String>, record: M) {
        self.slots.insert(key.into(), Slot::Member(record));
    }

    pub fn set_collection(&mut self, key: impl Into<String>, records: Vec<M>) {
        self.slots.insert(key.into(), Slot::Collection(records));
    }

    pub fn member(&self, key: &str) -> Option<&M> {
        match self.slots.get(key) {
            Some(Slot::Member(record)) => Some(record),
            _ => None,
        }
    }

    pub fn collection(&self, key: &str) -> Option<&[M]> {
        match self.slots.get(key) {
            Some(Slot::Collection(records)) => Some(records),
            _ => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Per-request state handed to every action entry point.
#[derive(Debug, Clone)]
pub struct ActionContext<M> {
    action: Option<Action>,
    params: Attributes,
    referer: Option<String>,
    pub response: Response,
    pub flash: Flash,
    pub assigns: Assigns<M>,
}

impl<M> ActionContext<M> {
    pub fn new(request: Request) -> Self {
        Self {
            action: None,
            params: request.params,
            referer: request.referer,
            response: Response::default(),
            flash: Flash::new(),
            assigns: Assigns::default(),
        }
    }

    /// The action currently handling this request.
    pub fn action(&self) -> Option<Action> {
        self.action
    }

    pub(crate) fn enter(&mut self, action: Action) {
        self.action = Some(action);
    }

    pub fn params(&self) -> &Attributes {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Identifier for lookup actions; numbers are accepted as well as strings.
    pub fn id_param(&self) -> Option<String> {
        match self.params.get("id")? {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Nested parameters submitted under `key`, if they form an object.
    pub fn nested_params(&self, key: &str) -> Option<&Attributes> {
        match self.params.get(key) {
            Some(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    pub fn referer(&self) -> Option<&str> {
        self.referer.as_deref()
    }

    pub fn redirect_to(&mut self, location: impl Into<String>, status: u16) {
        self.response.status = status;
        self.response.location = Some(location.into());
    }

    /// Redirects to the referring location, or to `fallback` without one.
    pub fn redirect_back(&mut self, fallback: impl Into<String>, status: u16) {
        let location = match self.referer.clone() {
            Some(referer) => referer,
            None => fallback.into(),
        };
        self.redirect_to(location, status);
    }

    /// Renders in place instead of redirecting.
    pub fn render(&mut self, status: u16) {
        self.response.status = status;
        self.response.location = None;
    }

    pub fn status(&self) -> u16 {
        self.response.status
    }

    pub fn location(&self) -> Option<&str> {
        self.response.location.as_deref()
    }

    pub fn is_redirect(&self) -> bool {
        is_redirect(self.response.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_redirect_back_prefers_referer() {
        let mut ctx: ActionContext<()> = ActionContext::new(Request::new().referer("/posts/new"));
        ctx.redirect_back("/posts", 302);
        assert_eq!(ctx.location(), Some("/posts/new"));
        assert!(ctx.is_redirect());

        let mut ctx: ActionContext<()> = ActionContext::new(Request::new());
        ctx.redirect_back("/posts", 303);
        assert_eq!(ctx.location(), Some("/posts"));
        assert_eq!(ctx.status(), 303);
    }

    #[test]
    fn test_render_clears_location() {
        let mut ctx: ActionContext<()> = ActionContext::new(Request::new());
        ctx.redirect_to("/x", 302);
        ctx.render(200);
        assert_eq!(ctx.location(), None);
        assert!(!ctx.is_redirect());
    }

    #[test]
    fn test_id_and_nested_params() {
        let ctx: ActionContext<()> = ActionContext::new(
            Request::new()
                .param("id", 12)
                .param("post", json!({"title": "Hi"})),
        );
        assert_eq!(ctx.id_param().as_deref(), Some("12"));
        assert_eq!(ctx.nested_params("post").unwrap()["title"], "Hi");
        assert!(ctx.nested_params("comment").is_none());
    }

    #[test]
    fn test_assign_slots_are_typed() {
        let mut assigns = Assigns::default();
        assigns.set_member("post", 1);
        assigns.set_collection("posts", vec![1, 2]);
        assert_eq!(assigns.member("post"), Some(&1));
        assert_eq!(assigns.collection("posts"), Some(&[1, 2][..]));
        assert!(assigns.member("posts").is_none());
    }
}
