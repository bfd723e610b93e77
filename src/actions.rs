//! # Conventional Actions
//!
//! The seven REST actions a [`ResourceController`](crate::controller::ResourceController)
//! can expose, and the result type shared by the mutating ones.

use crate::context::ActionContext;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "index", alias = "list")]
    List,
    #[serde(rename = "show")]
    Show,
    #[serde(rename = "new", alias = "new_form")]
    NewForm,
    #[serde(rename = "create")]
    Create,
    #[serde(rename = "edit", alias = "edit_form")]
    EditForm,
    #[serde(rename = "update")]
    Update,
    #[serde(rename = "destroy")]
    Destroy,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::List,
        Action::Show,
        Action::NewForm,
        Action::Create,
        Action::EditForm,
        Action::Update,
        Action::Destroy,
    ];

    /// Conventional name, used in flash keys and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::List => "index",
            Action::Show => "show",
            Action::NewForm => "new",
            Action::Create => "create",
            Action::EditForm => "edit",
            Action::Update => "update",
            Action::Destroy => "destroy",
        }
    }

    /// Create, update and destroy.
    pub fn is_mutating(&self) -> bool {
        matches!(self, Action::Create | Action::Update | Action::Destroy)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "index" | "list" => Ok(Action::List),
            "show" => Ok(Action::Show),
            "new" | "new_form" => Ok(Action::NewForm),
            "create" => Ok(Action::Create),
            "edit" | "edit_form" => Ok(Action::EditForm),
            "update" => Ok(Action::Update),
            "destroy" => Ok(Action::Destroy),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// Terminal branch of a mutating action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Success,
    Failure,
}

/// Replaces the default redirect of a successful mutation.
///
/// Receives the context and the persisted (or destroyed) record. Whatever
/// status it leaves on the response decides whether the success flash is
/// kept: anything other than a redirect discards it.
pub type OnSuccess<M> = Box<dyn FnOnce(&mut ActionContext<M>, &M) + Send>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>(), Ok(action));
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.as_str()));
        }
        assert_eq!("list".parse::<Action>(), Ok(Action::List));
        assert!("publish".parse::<Action>().is_err());
    }

    #[test]
    fn test_mutating_actions() {
        let mutating: Vec<_> = Action::ALL.into_iter().filter(Action::is_mutating).collect();
        assert_eq!(mutating, vec![Action::Create, Action::Update, Action::Destroy]);
    }
}
