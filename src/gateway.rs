//! # Model Gateway
//!
//! The seam to the persistence engine. The controller only constructs, looks
//! up, lists, saves and destroys records through this trait.
//!
//! Two kinds of failure are kept apart:
//!
//! - **Validation**: the record was rejected. Reported as
//!   `Ok(MutationOutcome::failure(..))`, handled by the action's failure branch.
//! - **Everything else** (missing record, closed connection, ...): `Err`, which
//!   aborts the action and propagates to the caller.

use crate::error::ActionError;
use crate::model::Model;
use async_trait::async_trait;

/// Message used when a store reports failure without any detail.
const GENERIC_ERROR: &str = "is invalid";

/// Result of a save or destroy attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationOutcome {
    errors: Vec<String>,
}

impl MutationOutcome {
    pub fn success() -> Self {
        Self::default()
    }

    /// A failed mutation. Always carries at least one message.
    pub fn failure<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut errors: Vec<String> = errors.into_iter().map(Into::into).collect();
        if errors.is_empty() {
            errors.push(GENERIC_ERROR.to_string());
        }
        Self { errors }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

#[async_trait]
pub trait ModelGateway<M: Model>: Send + Sync {
    /// A fresh, unsaved record.
    fn construct(&self) -> M;

    /// Looks a record up by its URL parameter.
    ///
    /// Returns [`ActionError::NotFound`] when nothing matches.
    async fn find(&self, id: &str) -> Result<M, ActionError>;

    async fn list_all(&self) -> Result<Vec<M>, ActionError>;

    /// Persists the record. On success the record may be updated in place
    /// (e.g. with its new identifier).
    async fn save(&self, record: &mut M) -> Result<MutationOutcome, ActionError>;

    async fn destroy(&self, record: &mut M) -> Result<MutationOutcome, ActionError>;
}
