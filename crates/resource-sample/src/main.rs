//! Scripted walk through every action of the blog, as three different users.
//!
//! ```bash
//! RUST_LOG=info cargo run -p resource-sample
//! ```

use resource_actions::tracing::setup_tracing;
use resource_actions::{ActionContext, Request, Severity};
use resource_sample::lifecycle::{BlogSystem, SystemError};
use resource_sample::model::{Comment, Post};
use resource_sample::policy::Role;
use serde_json::json;
use tracing::{info, warn, Instrument};

fn report<M>(ctx: &ActionContext<M>) {
    info!(
        status = ctx.status(),
        location = ?ctx.location(),
        success = ?ctx.flash.get(Severity::Success),
        error = ?ctx.flash.get(Severity::Error),
        "Response"
    );
}

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    setup_tracing();

    info!("Starting blog");
    let system = BlogSystem::new()?;

    async {
        let posts = system.posts_controller(Role::Editor);

        let mut ctx = ActionContext::<Post>::new(Request::new().param(
            "post",
            json!({"title": "Hello, world", "body": "First post", "published": true}),
        ));
        if let Err(e) = posts.create(&mut ctx, None).await {
            warn!(error = %e, "Create failed");
        }
        report(&ctx);

        let mut ctx = ActionContext::<Post>::new(
            Request::new()
                .param("post", json!({"title": ""}))
                .referer("/posts/new"),
        );
        if let Err(e) = posts.create(&mut ctx, None).await {
            warn!(error = %e, "Create failed");
        }
        report(&ctx);

        let mut ctx = ActionContext::<Post>::new(
            Request::new().id(1).param("post", json!({"body": "Edited"})),
        );
        if let Err(e) = posts.update(&mut ctx, None).await {
            warn!(error = %e, "Update failed");
        }
        report(&ctx);

        let mut ctx = ActionContext::<Post>::new(Request::new().id(1));
        if let Err(e) = posts.destroy(&mut ctx, None).await {
            warn!(error = %e, "Editors may not destroy");
        }
    }
    .instrument(tracing::info_span!("editor"))
    .await;

    async {
        let posts = system.posts_controller(Role::Guest);
        let mut ctx = ActionContext::<Post>::new(Request::new());
        match posts.list(&mut ctx).await {
            Ok(()) => info!(count = posts.collection(&ctx).map_or(0, <[Post]>::len), "Listed"),
            Err(e) => warn!(error = %e, "List failed"),
        }

        let comments = system.comments_controller(Role::Guest);
        let mut ctx = ActionContext::<Comment>::new(Request::new());
        if let Err(e) = comments.list(&mut ctx).await {
            warn!(error = %e, "List failed");
        }
    }
    .instrument(tracing::info_span!("guest"))
    .await;

    async {
        if let Ok(Ok(comment)) = system.comments.save(Comment::new(1, "Nice post")).await {
            info!(id = ?comment.id, "Comment submitted");
        }

        let comments = system.comments_controller(Role::Admin);
        let mut ctx = ActionContext::<Comment>::new(
            Request::new()
                .id(1)
                .param("admin_comment", json!({"approved": true})),
        );
        if let Err(e) = comments.update(&mut ctx, None).await {
            warn!(error = %e, "Moderation failed");
        }
        report(&ctx);

        let posts = system.posts_controller(Role::Admin);
        let mut ctx = ActionContext::<Post>::new(Request::new().id(1));
        if let Err(e) = posts.destroy(&mut ctx, None).await {
            warn!(error = %e, "Destroy failed");
        }
        report(&ctx);
    }
    .instrument(tracing::info_span!("admin"))
    .await;

    system.shutdown().await?;
    info!("Blog completed successfully");
    Ok(())
}
