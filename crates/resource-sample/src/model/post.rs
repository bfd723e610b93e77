use crate::policy::{Governed, Role};
use crate::store::Record;
use resource_actions::{merge_attributes, ActionError, Attributes, Model};
use serde::{Deserialize, Serialize};

/// Longest title the store accepts.
pub const MAX_TITLE_LEN: usize = 120;

/// A blog post.
///
/// Unsaved posts have no `id`; the store assigns one on first save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Option<u32>,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub published: bool,
    /// Locked posts cannot be destroyed.
    #[serde(default)]
    pub locked: bool,
}

impl Post {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn published(mut self) -> Self {
        self.published = true;
        self
    }
}

impl Model for Post {
    fn to_param(&self) -> Option<String> {
        self.id.map(|id| id.to_string())
    }

    fn assign_attributes(&mut self, attributes: Attributes) -> Result<(), ActionError> {
        merge_attributes(self, attributes)
    }
}

impl Record for Post {
    fn id(&self) -> Option<u32> {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = Some(id);
    }

    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push("title can't be blank".to_string());
        } else if self.title.chars().count() > MAX_TITLE_LEN {
            errors.push(format!("title is too long (maximum is {MAX_TITLE_LEN} characters)"));
        }
        errors
    }

    fn check_destroy(&self) -> Vec<String> {
        if self.locked {
            vec!["post is locked".to_string()]
        } else {
            Vec::new()
        }
    }
}

impl Governed for Post {
    fn permitted_fields(role: Role) -> &'static [&'static str] {
        match role {
            Role::Guest => &[],
            Role::Editor => &["title", "body"],
            Role::Admin => &["title", "body", "published", "locked"],
        }
    }

    /// Drafts are hidden from guests.
    fn visible_to(&self, role: Role) -> bool {
        self.published || role >= Role::Editor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation() {
        assert!(Post::new("Hello", "").validate().is_empty());
        assert_eq!(Post::new("  ", "").validate(), vec!["title can't be blank"]);
        let long = "x".repeat(MAX_TITLE_LEN + 1);
        assert_eq!(Post::new(long, "").validate().len(), 1);
    }

    #[test]
    fn test_assign_keeps_unsubmitted_fields() {
        let mut post = Post::new("Hello", "Body").published();
        post.id = Some(3);
        let attrs = match json!({"title": "Renamed"}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        post.assign_attributes(attrs).unwrap();
        assert_eq!(post.title, "Renamed");
        assert_eq!(post.body, "Body");
        assert!(post.published);
        assert_eq!(post.to_param().as_deref(), Some("3"));
    }
}
