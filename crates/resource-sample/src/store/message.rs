//! # Store Messages
//!
//! Requests sent from a [`StoreClient`](super::StoreClient) to its
//! [`StoreActor`](super::StoreActor). Every request carries a oneshot sender
//! for the reply.

use super::error::StoreError;
use tokio::sync::oneshot;

/// One-shot reply channel.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Outcome of a write the record itself may reject: `Err` holds validation messages.
pub type Checked<T> = Result<T, Vec<String>>;

#[derive(Debug)]
pub enum StoreRequest<R> {
    Find {
        id: u32,
        respond_to: Response<Option<R>>,
    },
    List {
        respond_to: Response<Vec<R>>,
    },
    /// Inserts records without an id, replaces the rest.
    Save {
        record: R,
        respond_to: Response<Checked<R>>,
    },
    Destroy {
        id: u32,
        respond_to: Response<Checked<()>>,
    },
}
