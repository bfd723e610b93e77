//! # Action Errors
//!
//! This module defines the error type shared by every action entry point.
//!
//! Only authorization, lookup and infrastructure failures are errors. A record
//! that fails validation is *not* an error: it is reported through
//! [`MutationOutcome`](crate::gateway::MutationOutcome) and drives the failure
//! branch of the action instead.

use crate::actions::Action;

/// Errors that abort an action and propagate to the request boundary.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The authorizer refused the subject for the current action.
    #[error("Not authorized to {action} {subject}{}", with_reason(.reason))]
    Unauthorized {
        action: Action,
        subject: String,
        reason: Option<String>,
    },

    /// No record matches the requested identifier.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The controller was built without this action.
    #[error("Action not enabled: {0}")]
    ActionNotEnabled(Action),

    /// An interpolation value uses a name reserved by the lookup options.
    #[error("Reserved interpolation key: {0}")]
    ReservedInterpolationKey(String),

    /// Submitted attributes could not be applied to the record.
    #[error("Invalid attributes: {0}")]
    InvalidAttributes(String),

    /// The persistence engine failed for reasons other than validation.
    #[error("Gateway error: {0}")]
    Gateway(Box<dyn std::error::Error + Send + Sync>),
}

fn with_reason(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(": {r}"))
        .unwrap_or_default()
}

impl ActionError {
    /// Wraps an arbitrary persistence failure.
    pub fn gateway(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        ActionError::Gateway(Box::new(e))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ActionError::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ActionError::NotFound(_))
    }
}
