//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging for binaries
//! and demos built on this crate. Libraries never install a subscriber.
//!
//! ## What Gets Traced
//!
//! Every controller entry point opens a span named after the method with
//! `controller` and `action` fields. Inside it:
//!
//! - `debug`: record lookups, attribute binding, discarded flashes
//! - `info`: successful mutations with the final status
//! - `warn`: disabled actions, authorization denials, validation failures
//!
//! ## Usage Examples
//!
//! ```bash
//! # Outcomes only
//! RUST_LOG=info cargo run -p resource-sample
//!
//! # Every protocol step
//! RUST_LOG=debug cargo run -p resource-sample
//!
//! # Only the controller
//! RUST_LOG=resource_actions::controller=debug cargo run -p resource-sample
//! ```
//!
//! With `RUST_LOG=debug` an update that fails validation reads:
//!
//! ```text
//! DEBUG update{controller=posts action="update"}: Find id="1"
//! DEBUG update{controller=posts action="update"}: Binding attributes submitted=2 permitted=1
//! WARN  update{controller=posts action="update"}: Failed id=Some("1") errors=["title can't be blank"]
//! ```

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
