//! # Blog Models
//!
//! Plain serde structs. Each one implements [`Model`](resource_actions::Model)
//! for the controllers, [`Record`](crate::store::Record) for the store and
//! [`Governed`](crate::policy::Governed) for the policy.

pub mod comment;
pub mod post;

pub use comment::Comment;
pub use post::Post;
