use crate::policy::{Governed, Role};
use crate::store::Record;
use resource_actions::{merge_attributes, ActionError, Attributes, Model};
use serde::{Deserialize, Serialize};

/// A reader comment, moderated under `admin/comments` as `Admin::Comment`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Option<u32>,
    #[serde(default)]
    pub post_id: Option<u32>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub approved: bool,
}

impl Comment {
    pub fn new(post_id: u32, body: impl Into<String>) -> Self {
        Self {
            id: None,
            post_id: Some(post_id),
            body: body.into(),
            approved: false,
        }
    }
}

impl Model for Comment {
    fn to_param(&self) -> Option<String> {
        self.id.map(|id| id.to_string())
    }

    fn assign_attributes(&mut self, attributes: Attributes) -> Result<(), ActionError> {
        merge_attributes(self, attributes)
    }
}

impl Record for Comment {
    fn id(&self) -> Option<u32> {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = Some(id);
    }

    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.post_id.is_none() {
            errors.push("post must exist".to_string());
        }
        if self.body.trim().is_empty() {
            errors.push("body can't be blank".to_string());
        }
        errors
    }
}

impl Governed for Comment {
    fn permitted_fields(role: Role) -> &'static [&'static str] {
        match role {
            Role::Guest => &[],
            Role::Editor => &["post_id", "body"],
            Role::Admin => &["post_id", "body", "approved"],
        }
    }

    fn visible_to(&self, role: Role) -> bool {
        self.approved || role >= Role::Editor
    }
}
