//! # Role Policy
//!
//! A three-level role model for the blog:
//!
//! | Role     | May                                           |
//! |----------|-----------------------------------------------|
//! | `Guest`  | list and show visible records                 |
//! | `Editor` | everything a guest may, plus new/create/edit/update |
//! | `Admin`  | everything, including destroy                 |
//!
//! Which fields each role may assign, and which records it may see, is
//! decided per model through [`Governed`].

use async_trait::async_trait;
use resource_actions::{permit, Action, Attributes, AuthorizationDecision, Authorizer, Model, Subject};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    Editor,
    Admin,
}

impl Role {
    /// Lowest role allowed to perform `action`.
    pub fn required_for(action: Action) -> Role {
        match action {
            Action::List | Action::Show => Role::Guest,
            Action::NewForm | Action::Create | Action::EditForm | Action::Update => Role::Editor,
            Action::Destroy => Role::Admin,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Guest => "guest",
            Role::Editor => "editor",
            Role::Admin => "admin",
        };
        f.write_str(name)
    }
}

/// Per-model rules consulted by [`RolePolicy`].
pub trait Governed: Model {
    /// Fields `role` may assign.
    fn permitted_fields(role: Role) -> &'static [&'static str];

    fn visible_to(&self, _role: Role) -> bool {
        true
    }
}

/// Authorizes the current user by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolePolicy {
    role: Role,
}

impl RolePolicy {
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

#[async_trait]
impl<M: Governed> Authorizer<M> for RolePolicy {
    async fn authorize(&self, subject: Subject<'_, M>, action: Action) -> AuthorizationDecision {
        let required = Role::required_for(action);
        if self.role < required {
            return AuthorizationDecision::deny(format!("{action} requires {required}"));
        }
        match subject {
            Subject::Instance(record) if !record.visible_to(self.role) => {
                AuthorizationDecision::deny(format!("hidden from {}", self.role))
            }
            _ => AuthorizationDecision::allow(),
        }
    }

    async fn permitted_attributes(
        &self,
        _record: &M,
        action: Action,
        params: &Attributes,
    ) -> Attributes {
        let permitted = permit(params, M::permitted_fields(self.role));
        debug!(role = %self.role, %action, dropped = params.len() - permitted.len(), "Permitted");
        permitted
    }

    async fn scope(&self, records: Vec<M>) -> Vec<M> {
        records
            .into_iter()
            .filter(|record| record.visible_to(self.role))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Post;
    use serde_json::json;

    #[tokio::test]
    async fn test_roles_gate_actions() {
        let post = Post::new("Hello", "").published();
        let check = |role: Role, action: Action| {
            let post = post.clone();
            async move {
                RolePolicy::new(role)
                    .authorize(Subject::Instance(&post), action)
                    .await
                    .allowed
            }
        };

        assert!(check(Role::Guest, Action::Show).await);
        assert!(!check(Role::Guest, Action::EditForm).await);
        assert!(check(Role::Editor, Action::Update).await);
        assert!(!check(Role::Editor, Action::Destroy).await);
        assert!(check(Role::Admin, Action::Destroy).await);
    }

    #[tokio::test]
    async fn test_drafts_hidden_from_guests() {
        let draft = Post::new("Draft", "");
        let guest = RolePolicy::new(Role::Guest);
        let decision = guest.authorize(Subject::Instance(&draft), Action::Show).await;
        assert_eq!(decision.reason.as_deref(), Some("hidden from guest"));

        let listed = guest
            .scope(vec![draft.clone(), Post::new("Live", "").published()])
            .await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Live");
    }

    #[tokio::test]
    async fn test_editors_cannot_publish() {
        let params = match json!({"title": "T", "published": true}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        let post = Post::default();
        let editor = RolePolicy::new(Role::Editor)
            .permitted_attributes(&post, Action::Update, &params)
            .await;
        assert!(!editor.contains_key("published"));
        let admin = RolePolicy::new(Role::Admin)
            .permitted_attributes(&post, Action::Update, &params)
            .await;
        assert!(admin.contains_key("published"));
    }
}
