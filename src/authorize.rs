//! # Authorization
//!
//! The seam to the policy engine. Every action asks the [`Authorizer`] for a
//! decision before it touches a record: before attributes are assigned and
//! before anything is persisted. A denial aborts the action with
//! [`ActionError::Unauthorized`](crate::error::ActionError::Unauthorized).

use crate::actions::Action;
use crate::model::{Attributes, Model};
use crate::naming::ModelConcept;
use async_trait::async_trait;

/// What is being authorized: the model as a whole (list) or one record.
#[derive(Debug)]
pub enum Subject<'a, M> {
    Class(&'a ModelConcept),
    Instance(&'a M),
}

impl<M> Clone for Subject<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for Subject<'_, M> {}

impl<M: Model> Subject<'_, M> {
    /// Short description used in errors and logs.
    pub fn describe(&self) -> String {
        match self {
            Subject::Class(concept) => concept.name().to_string(),
            Subject::Instance(record) => match record.to_param() {
                Some(param) => format!("record {param}"),
                None => "new record".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationDecision {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl AuthorizationDecision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }

    pub fn from_bool(allowed: bool) -> Self {
        Self {
            allowed,
            reason: None,
        }
    }
}

#[async_trait]
pub trait Authorizer<M: Model>: Send + Sync {
    async fn authorize(&self, subject: Subject<'_, M>, action: Action) -> AuthorizationDecision;

    /// The subset of `params` the current user may assign to `record`.
    async fn permitted_attributes(&self, record: &M, action: Action, params: &Attributes)
        -> Attributes;

    /// Narrows the full listing to the records the user may see.
    async fn scope(&self, records: Vec<M>) -> Vec<M> {
        records
    }
}

/// Keeps only the listed fields of `params`.
pub fn permit(params: &Attributes, fields: &[&str]) -> Attributes {
    params
        .iter()
        .filter(|(key, _)| fields.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_permit_filters_fields() {
        let params = match json!({"title": "a", "admin": true, "body": "b"}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        let permitted = permit(&params, &["title", "body"]);
        assert_eq!(permitted.len(), 2);
        assert!(!permitted.contains_key("admin"));
    }

    #[test]
    fn test_decisions() {
        assert!(AuthorizationDecision::allow().allowed);
        let denied = AuthorizationDecision::deny("guests cannot write");
        assert!(!denied.allowed);
        assert_eq!(denied.reason.as_deref(), Some("guests cannot write"));
        assert!(!AuthorizationDecision::from_bool(false).allowed);
    }
}
