//! # Resource Actions
//!
//! > **Conventional REST actions, written once for every model.**
//!
//! This crate implements the seven actions of a resourceful controller (list,
//! show, new, create, edit, update, destroy) as a generic state machine. A
//! concrete controller only names its model and supplies three collaborators:
//! persistence, authorization and translation.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Generics over Hooks
//! You'll see `ResourceController<M, G, A, T>` everywhere. `M` is the model,
//! `G` the [`ModelGateway`], `A` the [`Authorizer`] and `T` the [`Translator`].
//! -   **Benefit**: The action protocol is written **once** and behaves the same
//!     for posts, comments or anything else that implements [`Model`].
//! -   **Trade-off**: Per-controller customization is limited to what the
//!     builder and the `on_success` handler expose.
//!
//! ### Mocking: Testing without a Database
//! The [`mock`] module provides a gateway with queued expectations and a
//! configurable authorizer that share a [`CallLog`](mock::CallLog).
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Authorize, then Bind, then Mutate
//! Every action resolves its record, asks the authorizer, and only then assigns
//! submitted attributes or persists anything. A denial is an
//! [`ActionError::Unauthorized`] and leaves the record untouched.
//!
//! ### 2. Validation is a Branch, not an Error
//! A record that fails to save sends the action down its failure branch (error
//! flash, redirect back). Only authorization, lookup and infrastructure
//! failures surface as [`ActionError`].
//!
//! ### 3. Flash Survives Redirects Only
//! The success flash is set before the response is decided and discarded
//! afterwards unless the final status is one of
//! [`REDIRECT_STATUSES`](flash::REDIRECT_STATUSES).
//!
//! ### 4. Observability
//! Every entry point opens a `tracing` span carrying the controller and action.
//! See the [`tracing`](crate::tracing) module for setup.
//!
//! ## 🗺️ Module Tour
//!
//! | Module        | Role                                                     |
//! |---------------|----------------------------------------------------------|
//! | [`controller`]| [`ResourceController`] and [`ControllerBuilder`]         |
//! | [`actions`]   | [`Action`], [`Branch`], [`OnSuccess`]                    |
//! | [`context`]   | per-request [`ActionContext`]                            |
//! | [`flash`]     | [`Flash`] and the six-key [`FlashMessageResolver`]       |
//! | [`naming`]    | [`ModelConcept`]: slots, paths and human names           |
//! | [`translate`] | [`Translator`] seam and [`MemoryTranslator`]             |
//! | [`gateway`]   | [`ModelGateway`] persistence seam                        |
//! | [`authorize`] | [`Authorizer`] policy seam                               |
//! | [`config`]    | [`ControllerConfig`] loaded from JSON                    |
//! | [`mock`]      | test doubles                                             |
//!
//! ## 🚀 Quick Start
//!
//! ```rust,ignore
//! let posts = ControllerBuilder::new("posts")
//!     .except([Action::Destroy])
//!     .build(store, policy, MemoryTranslator::with_defaults());
//!
//! let mut ctx = ActionContext::new(Request::new().id(1).param("post", json!({"title": "Hi"})));
//! match posts.update(&mut ctx, None).await? {
//!     Branch::Success => assert_eq!(ctx.location(), Some("/posts/1")),
//!     Branch::Failure => println!("{:?}", ctx.flash.get(Severity::Error)),
//! }
//! ```
//!
//! See `crates/resource-sample` for a complete application.

pub mod actions;
pub mod authorize;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod flash;
pub mod gateway;
pub mod mock;
pub mod model;
pub mod naming;
pub mod tracing;
pub mod translate;

pub use actions::{Action, Branch, OnSuccess};
pub use authorize::{permit, AuthorizationDecision, Authorizer, Subject};
pub use config::{ConfigError, ControllerConfig};
pub use context::{ActionContext, Request, Response};
pub use controller::{ControllerBuilder, ResourceController};
pub use error::ActionError;
pub use flash::{Flash, FlashMessageResolver, Severity};
pub use gateway::{ModelGateway, MutationOutcome};
pub use model::{merge_attributes, Attributes, Model};
pub use naming::{Inflections, ModelConcept};
pub use translate::{Interpolation, MemoryTranslator, Translator};
