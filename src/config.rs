//! # Controller Configuration
//!
//! Everything about a controller is fixed when it is built. The values can come
//! from code through [`ControllerBuilder`](crate::controller::ControllerBuilder)
//! or from a document deserialized into [`ControllerConfig`]:
//!
//! ```json
//! {
//!   "controller_path": "admin/posts",
//!   "model": "Post",
//!   "except": ["destroy"],
//!   "flash_scope": "flash",
//!   "inflections": { "irregular": { "octopus": "octopi" } }
//! }
//! ```
//!
//! `redirect_status` must be one of
//! [`REDIRECT_STATUSES`](crate::flash::REDIRECT_STATUSES); the failure branch
//! and the default success redirect both answer with it.

use crate::actions::Action;
use crate::flash::is_redirect;
use crate::naming::Inflections;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status used for redirects unless configured otherwise.
pub const DEFAULT_REDIRECT_STATUS: u16 = 302;

fn default_redirect_status() -> u16 {
    DEFAULT_REDIRECT_STATUS
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Malformed controller configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Redirect status must be 301, 302, 303, 307 or 308, got {0}")]
    RedirectStatus(u16),
}

/// Accepts only redirect-class statuses.
pub fn check_redirect_status(status: u16) -> Result<u16, ConfigError> {
    if is_redirect(status) {
        Ok(status)
    } else {
        Err(ConfigError::RedirectStatus(status))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Hierarchical path such as `admin/posts`.
    pub controller_path: String,

    /// Model name; derived from `controller_path` when absent.
    #[serde(default)]
    pub model: Option<String>,

    /// Restrict the controller to these actions.
    #[serde(default)]
    pub only: Option<Vec<Action>>,

    #[serde(default)]
    pub except: Vec<Action>,

    /// Prefix for flash message lookups.
    #[serde(default)]
    pub flash_scope: Option<String>,

    #[serde(default = "default_redirect_status")]
    pub redirect_status: u16,

    #[serde(default)]
    pub inflections: InflectionConfig,
}

impl ControllerConfig {
    pub fn new(controller_path: impl Into<String>) -> Self {
        Self {
            controller_path: controller_path.into(),
            model: None,
            only: None,
            except: Vec::new(),
            flash_scope: None,
            redirect_status: DEFAULT_REDIRECT_STATUS,
            inflections: InflectionConfig::default(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_redirect_status(self.redirect_status).map(|_| ())
    }
}

/// Extra inflection rules on top of [`Inflections::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InflectionConfig {
    /// singular -> plural
    #[serde(default)]
    pub irregular: BTreeMap<String, String>,
    #[serde(default)]
    pub uncountable: Vec<String>,
}

impl InflectionConfig {
    pub fn to_inflections(&self) -> Inflections {
        let with_irregular = self
            .irregular
            .iter()
            .fold(Inflections::default(), |acc, (s, p)| acc.irregular(s, p));
        self.uncountable
            .iter()
            .fold(with_irregular, |acc, w| acc.uncountable(w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = ControllerConfig::from_json_str(r#"{"controller_path": "posts"}"#).unwrap();
        assert_eq!(config, ControllerConfig::new("posts"));
        assert_eq!(config.redirect_status, 302);
    }

    #[test]
    fn test_full_config() {
        let config = ControllerConfig::from_json_str(
            r#"{
                "controller_path": "admin/people",
                "model": "Admin::Person",
                "only": ["index", "show", "destroy"],
                "flash_scope": "flash",
                "redirect_status": 303,
                "inflections": {"irregular": {"octopus": "octopi"}, "uncountable": ["fish"]}
            }"#,
        )
        .unwrap();
        assert_eq!(
            config.only,
            Some(vec![Action::List, Action::Show, Action::Destroy])
        );
        assert_eq!(config.redirect_status, 303);
        let inflections = config.inflections.to_inflections();
        assert_eq!(inflections.pluralize("octopus"), "octopi");
        assert_eq!(inflections.pluralize("fish"), "fish");
        assert_eq!(inflections.pluralize("person"), "people");
    }

    #[test]
    fn test_controller_path_is_required() {
        assert!(matches!(
            ControllerConfig::from_json_str("{}"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_non_redirect_status_is_rejected() {
        let result =
            ControllerConfig::from_json_str(r#"{"controller_path": "posts", "redirect_status": 200}"#);
        assert!(matches!(result, Err(ConfigError::RedirectStatus(200))));

        let mut config = ControllerConfig::new("posts");
        config.redirect_status = 404;
        assert!(matches!(config.validate(), Err(ConfigError::RedirectStatus(404))));

        for status in [301, 302, 303, 307, 308] {
            assert_eq!(check_redirect_status(status).unwrap(), status);
        }
    }
}
