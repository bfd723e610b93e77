//! # Resource Sample
//!
//! A small blog built on `resource-actions`.
//!
//! ## 🚀 Core Components
//!
//! - **[model]**: [`Post`](model::Post) and [`Comment`](model::Comment), plain serde structs.
//! - **[store]**: an actor per model holding records in memory; its client is the controllers' gateway.
//! - **[policy]**: [`RolePolicy`](policy::RolePolicy), guest / editor / admin.
//! - **[lifecycle]**: [`BlogSystem`](lifecycle::BlogSystem) wires it all together.
//!
//! ## 🧪 Testing
//!
//! Unit tests live next to each module; `tests/` drives the controllers
//! against the real stores.

pub mod lifecycle;
pub mod model;
pub mod policy;
pub mod store;
