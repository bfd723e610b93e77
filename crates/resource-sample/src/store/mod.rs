//! # Record Store
//!
//! The blog's persistence engine: one actor per record type holding an
//! in-memory table, and a cloneable client that doubles as the controllers'
//! [`ModelGateway`](resource_actions::ModelGateway).

pub mod actor;
pub mod client;
pub mod error;
pub mod message;

pub use actor::StoreActor;
pub use client::StoreClient;
pub use error::StoreError;
pub use message::StoreRequest;

use resource_actions::Model;

/// A model the store can keep.
pub trait Record: Model + Default {
    fn id(&self) -> Option<u32>;

    fn set_id(&mut self, id: u32);

    /// Validation messages; empty when the record may be saved.
    fn validate(&self) -> Vec<String>;

    /// Reasons the record may not be destroyed.
    fn check_destroy(&self) -> Vec<String> {
        Vec::new()
    }
}
