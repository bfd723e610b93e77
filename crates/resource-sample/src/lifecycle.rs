//! # Blog Lifecycle
//!
//! [`BlogSystem`] starts one store actor per model, loads the controller
//! configuration and locale, and hands out controllers bound to the role of
//! the current user.
//!
//! ```rust,ignore
//! let system = BlogSystem::new()?;
//!
//! let posts = system.posts_controller(Role::Editor);
//! let mut ctx = ActionContext::new(Request::new().param("post", json!({"title": "Hello"})));
//! posts.create(&mut ctx, None).await?;
//! drop(posts);
//!
//! system.shutdown().await?;
//! ```
//!
//! ## Graceful Shutdown
//!
//! Controllers hold clones of the store clients. Drop them before calling
//! [`BlogSystem::shutdown`]; each store stops once its last client is gone.

use crate::model::{Comment, Post};
use crate::policy::{Role, RolePolicy};
use crate::store::{StoreActor, StoreClient};
use resource_actions::{
    ConfigError, ControllerBuilder, ControllerConfig, MemoryTranslator, ResourceController,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Bundled controller configuration.
pub const DEFAULT_CONTROLLERS: &str = include_str!("../config/controllers.json");

/// Bundled flash messages.
pub const DEFAULT_LOCALE: &str = include_str!("../locales/en.json");

const STORE_BUFFER: usize = 32;

pub type PostsController =
    ResourceController<Post, StoreClient<Post>, RolePolicy, Arc<MemoryTranslator>>;

pub type CommentsController =
    ResourceController<Comment, StoreClient<Comment>, RolePolicy, Arc<MemoryTranslator>>;

#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Controller(#[from] ConfigError),
    #[error("Store task failed: {0}")]
    StoreTask(#[from] tokio::task::JoinError),
}

#[derive(Debug, Deserialize)]
struct ControllerConfigs {
    posts: ControllerConfig,
    comments: ControllerConfig,
}

/// Runtime orchestrator for the blog.
pub struct BlogSystem {
    pub posts: StoreClient<Post>,
    pub comments: StoreClient<Comment>,
    post_routes: ControllerBuilder,
    comment_routes: ControllerBuilder,
    translator: Arc<MemoryTranslator>,
    handles: Vec<JoinHandle<()>>,
}

impl BlogSystem {
    /// Starts the stores with the bundled configuration and locale.
    pub fn new() -> Result<Self, SystemError> {
        Self::with_config(DEFAULT_CONTROLLERS, DEFAULT_LOCALE)
    }

    pub fn with_config(controllers: &str, locale: &str) -> Result<Self, SystemError> {
        let configs: ControllerConfigs = serde_json::from_str(controllers)?;
        let post_routes = ControllerBuilder::from_config(&configs.posts)?;
        let comment_routes = ControllerBuilder::from_config(&configs.comments)?;
        let translator = Arc::new(MemoryTranslator::from_json_str(locale)?);

        let (post_store, posts) = StoreActor::<Post>::new(STORE_BUFFER);
        let (comment_store, comments) = StoreActor::<Comment>::new(STORE_BUFFER);
        let handles = vec![
            tokio::spawn(post_store.run()),
            tokio::spawn(comment_store.run()),
        ];
        info!(messages = translator.len(), "Blog system started");

        Ok(Self {
            posts,
            comments,
            post_routes,
            comment_routes,
            translator,
            handles,
        })
    }

    /// Controller for `/posts`, acting for a user with `role`.
    pub fn posts_controller(&self, role: Role) -> PostsController {
        self.post_routes.clone().build(
            self.posts.clone(),
            RolePolicy::new(role),
            self.translator.clone(),
        )
    }

    /// Controller for `/admin/comments`, acting for a user with `role`.
    pub fn comments_controller(&self, role: Role) -> CommentsController {
        self.comment_routes.clone().build(
            self.comments.clone(),
            RolePolicy::new(role),
            self.translator.clone(),
        )
    }

    /// Drops the store clients and waits for every store to stop.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down blog system...");
        drop(self.posts);
        drop(self.comments);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Store task failed");
                return Err(e.into());
            }
        }

        info!("Blog system shutdown complete.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_actions::Action;

    #[tokio::test]
    async fn test_bundled_configuration() {
        let system = BlogSystem::new().unwrap();

        let posts = system.posts_controller(Role::Guest);
        assert_eq!(posts.actions().count(), 7);
        assert_eq!(posts.concept().singular(), "post");

        let comments = system.comments_controller(Role::Admin);
        assert!(!comments.is_enabled(Action::Create));
        assert_eq!(comments.concept().singular(), "admin_comment");
        assert_eq!(comments.concept().collection_path(), "/admin/comments");

        drop((posts, comments));
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_bad_configuration() {
        assert!(matches!(
            BlogSystem::with_config("{}", DEFAULT_LOCALE),
            Err(SystemError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_non_redirect_status() {
        let controllers = r#"{
            "posts": {"controller_path": "posts", "redirect_status": 200},
            "comments": {"controller_path": "admin/comments"}
        }"#;
        assert!(matches!(
            BlogSystem::with_config(controllers, DEFAULT_LOCALE),
            Err(SystemError::Controller(ConfigError::RedirectStatus(200)))
        ));
    }
}
