use resource_actions::{ActionContext, ActionError, Branch, Request, Severity};
use resource_sample::lifecycle::BlogSystem;
use resource_sample::model::{Comment, Post};
use resource_sample::policy::Role;
use serde_json::json;

fn post_ctx(request: Request) -> ActionContext<Post> {
    ActionContext::new(request)
}

/// Full round trip through every post action with the real store.
#[tokio::test]
async fn test_post_lifecycle() {
    let system = BlogSystem::new().expect("bundled config is valid");
    let editor = system.posts_controller(Role::Editor);

    // Create
    let mut ctx = post_ctx(Request::new().param(
        "post",
        json!({"title": "Hello", "body": "World", "published": true}),
    ));
    let branch = editor.create(&mut ctx, None).await.unwrap();
    assert_eq!(branch, Branch::Success);
    assert_eq!(ctx.location(), Some("/posts/1"));
    assert_eq!(
        ctx.flash.get(Severity::Success),
        Some("<strong>Post</strong> is live.")
    );
    // Editors may not publish.
    let created = editor.resource(&ctx).unwrap();
    assert!(!created.published);

    // Show / edit
    let mut ctx = post_ctx(Request::new().id(1));
    editor.edit_form(&mut ctx).await.unwrap();
    assert_eq!(editor.resource(&ctx).unwrap().body, "World");

    // Update
    let mut ctx = post_ctx(Request::new().id(1).param("post", json!({"title": "Hello again"})));
    editor.update(&mut ctx, None).await.unwrap();
    assert_eq!(ctx.location(), Some("/posts/1"));
    assert_eq!(
        ctx.flash.get(Severity::Success),
        Some("Post was successfully updated.")
    );
    let stored = system.posts.find(1).await.unwrap().unwrap();
    assert_eq!(stored.title, "Hello again");
    assert_eq!(stored.body, "World");

    // Destroy
    let admin = system.posts_controller(Role::Admin);
    let mut ctx = post_ctx(Request::new().id(1));
    admin.destroy(&mut ctx, None).await.unwrap();
    assert_eq!(ctx.location(), Some("/posts"));
    assert!(ctx.flash.is_retained(Severity::Success));
    assert!(system.posts.find(1).await.unwrap().is_none());

    drop((editor, admin));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_invalid_post_is_not_stored() {
    let system = BlogSystem::new().unwrap();
    let editor = system.posts_controller(Role::Editor);

    let mut ctx = post_ctx(
        Request::new()
            .param("post", json!({"title": "   "}))
            .referer("/posts/new"),
    );
    let branch = editor.create(&mut ctx, None).await.unwrap();

    assert_eq!(branch, Branch::Failure);
    assert_eq!(ctx.location(), Some("/posts/new"));
    assert_eq!(
        ctx.flash.get(Severity::Error),
        Some("Post could not be created: title can't be blank")
    );
    assert!(ctx.flash.get(Severity::Success).is_none());
    assert!(system.posts.list().await.unwrap().is_empty());

    drop(editor);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_mistyped_title_redirects_back() {
    let system = BlogSystem::new().unwrap();
    let editor = system.posts_controller(Role::Editor);

    let mut ctx = post_ctx(
        Request::new()
            .param("post", json!({"title": 5}))
            .referer("/posts/new"),
    );
    let branch = editor.create(&mut ctx, None).await.unwrap();

    assert_eq!(branch, Branch::Failure);
    assert_eq!(ctx.location(), Some("/posts/new"));
    assert!(ctx
        .flash
        .get(Severity::Error)
        .is_some_and(|m| m.contains("invalid type")));
    assert!(system.posts.list().await.unwrap().is_empty());

    drop(editor);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_locked_post_survives_destroy() {
    let system = BlogSystem::new().unwrap();
    let mut locked = Post::new("Pinned", "").published();
    locked.locked = true;
    system.posts.save(locked).await.unwrap().unwrap();

    let admin = system.posts_controller(Role::Admin);
    let mut ctx = post_ctx(Request::new().id(1));
    let branch = admin.destroy(&mut ctx, None).await.unwrap();

    assert_eq!(branch, Branch::Failure);
    assert_eq!(ctx.location(), Some("/posts"));
    assert_eq!(
        ctx.flash.get(Severity::Error),
        Some("Post stays: post is locked.")
    );
    assert!(system.posts.find(1).await.unwrap().is_some());

    drop(admin);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_guests_see_published_posts_only() {
    let system = BlogSystem::new().unwrap();
    system.posts.save(Post::new("Draft", "")).await.unwrap().unwrap();
    system
        .posts
        .save(Post::new("Live", "").published())
        .await
        .unwrap()
        .unwrap();

    let guest = system.posts_controller(Role::Guest);
    let mut ctx = post_ctx(Request::new());
    guest.list(&mut ctx).await.unwrap();
    let titles: Vec<_> = guest
        .collection(&ctx)
        .unwrap()
        .iter()
        .map(|p| p.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Live"]);

    let mut ctx = post_ctx(Request::new().id(1));
    assert!(guest.show(&mut ctx).await.unwrap_err().is_unauthorized());

    let mut ctx = post_ctx(Request::new().param("post", json!({"title": "Spam"})));
    let err = guest.create(&mut ctx, None).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(system.posts.list().await.unwrap().len(), 2);

    drop(guest);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_missing_post_is_not_found() {
    let system = BlogSystem::new().unwrap();
    let editor = system.posts_controller(Role::Editor);

    let mut ctx = post_ctx(Request::new().id(99).param("post", json!({"title": "x"})));
    let err = editor.update(&mut ctx, None).await.unwrap_err();
    assert!(matches!(err, ActionError::NotFound(_)));

    drop(editor);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_comment_moderation() {
    let system = BlogSystem::new().unwrap();
    system
        .comments
        .save(Comment::new(1, "First!"))
        .await
        .unwrap()
        .unwrap();

    // Comments are only moderated here, never created.
    let admin = system.comments_controller(Role::Admin);
    let mut ctx = ActionContext::<Comment>::new(Request::new());
    assert!(matches!(
        admin.new_form(&mut ctx).await,
        Err(ActionError::ActionNotEnabled(_))
    ));

    let mut ctx = ActionContext::<Comment>::new(
        Request::new()
            .id(1)
            .param("admin_comment", json!({"approved": true})),
    );
    admin.update(&mut ctx, None).await.unwrap();

    assert_eq!(ctx.status(), 303);
    assert_eq!(ctx.location(), Some("/admin/comments/1"));
    assert_eq!(ctx.flash.get(Severity::Success), Some("Comment moderated."));
    assert!(ctx.flash.is_retained(Severity::Success));
    assert!(system.comments.find(1).await.unwrap().unwrap().approved);

    drop(admin);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_editor_cannot_approve_comments() {
    let system = BlogSystem::new().unwrap();
    system
        .comments
        .save(Comment::new(1, "First!"))
        .await
        .unwrap()
        .unwrap();

    let editor = system.comments_controller(Role::Editor);
    let mut ctx = ActionContext::<Comment>::new(
        Request::new()
            .id(1)
            .param("admin_comment", json!({"approved": true, "body": "Edited"})),
    );
    editor.update(&mut ctx, None).await.unwrap();

    let stored = system.comments.find(1).await.unwrap().unwrap();
    assert_eq!(stored.body, "Edited");
    assert!(!stored.approved);
    assert_eq!(
        ctx.flash.get(Severity::Success),
        Some("Comment moderated.")
    );

    drop(editor);
    system.shutdown().await.unwrap();
}
