//! # Translation
//!
//! The [`Translator`] trait is the seam to the host application's localization
//! backend. A lookup names a primary key plus an ordered chain of fallbacks; the
//! translator returns the first one that resolves and never fails.
//!
//! [`MemoryTranslator`] is a small in-memory backend with `%{name}`
//! interpolation. It is enough for tests, for the bundled default messages and
//! for applications that keep their locale in a JSON document.

use crate::error::ActionError;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Names used by the lookup options themselves. They can never be
/// interpolation variables.
pub const RESERVED_KEYS: [&str; 2] = ["default", "scope"];

/// Default flash messages shipped with the crate.
const DEFAULT_LOCALE: &str = include_str!("../locales/en.json");

/// Placeholder name -> value, substituted into `%{name}` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interpolation {
    values: BTreeMap<String, String>,
}

impl Interpolation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, rejecting the names reserved by the lookup options.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ActionError> {
        let name = name.into();
        if RESERVED_KEYS.contains(&name.as_str()) {
            return Err(ActionError::ReservedInterpolationKey(name));
        }
        self.values.insert(name, value.into());
        Ok(())
    }

    /// Builder form of [`Interpolation::insert`].
    pub fn with(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, ActionError> {
        self.insert(name, value)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Replaces every known `%{name}` placeholder in `template`.
    pub fn apply(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find("%{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find('}') {
                Some(end) => {
                    let name = &after[..end];
                    match self.values.get(name) {
                        Some(value) => out.push_str(value),
                        None => out.push_str(&rest[start..start + 2 + end + 1]),
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// One step of the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// Another key to look up.
    Key(String),
    /// Returned verbatim when reached.
    Literal(String),
}

/// Options accompanying a lookup.
#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    /// Prefix applied to the primary key and every [`Fallback::Key`].
    pub scope: Option<String>,
    pub defaults: Vec<Fallback>,
    pub interpolation: Interpolation,
}

/// Localization backend.
///
/// Implementations try `key`, then each fallback in order, and return the first
/// match with interpolation applied. When nothing matches they return the key
/// itself, so a lookup never fails.
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str, options: &TranslateOptions) -> String;
}

impl<T: Translator + ?Sized> Translator for Arc<T> {
    fn translate(&self, key: &str, options: &TranslateOptions) -> String {
        (**self).translate(key, options)
    }
}

/// In-memory translation table keyed by fully-qualified dotted keys.
#[derive(Debug, Clone, Default)]
pub struct MemoryTranslator {
    entries: HashMap<String, String>,
}

impl MemoryTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A translator preloaded with the crate's default flash messages.
    pub fn with_defaults() -> Self {
        let mut translator = Self::new();
        // The bundled document is a compile-time constant, parsed by tests.
        if let Ok(value) = serde_json::from_str::<Value>(DEFAULT_LOCALE) {
            translator.merge_json(&value);
        }
        translator
    }

    /// Parses a nested JSON locale document (`{"posts": {"create": {"success": ".."}}}`).
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_json_value(&value))
    }

    pub fn from_json_value(value: &Value) -> Self {
        let mut translator = Self::new();
        translator.merge_json(value);
        translator
    }

    /// Adds every string leaf of `value`, later entries overriding earlier ones.
    pub fn merge_json(&mut self, value: &Value) {
        flatten_into(&mut self.entries, String::new(), value);
    }

    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.entries.insert(key.into(), template.into());
    }

    pub fn with(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.insert(key, template);
        self
    }

    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn scoped(scope: Option<&str>, key: &str) -> String {
    match scope {
        Some(scope) if !scope.is_empty() => format!("{scope}.{key}"),
        _ => key.to_string(),
    }
}

fn flatten_into(entries: &mut HashMap<String, String>, prefix: String, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(entries, path, child);
            }
        }
        Value::String(text) if !prefix.is_empty() => {
            entries.insert(prefix, text.clone());
        }
        _ => {}
    }
}

impl Translator for MemoryTranslator {
    fn translate(&self, key: &str, options: &TranslateOptions) -> String {
        let scope = options.scope.as_deref();
        if let Some(template) = self.lookup(&scoped(scope, key)) {
            return options.interpolation.apply(template);
        }
        for fallback in &options.defaults {
            match fallback {
                Fallback::Key(candidate) => {
                    if let Some(template) = self.lookup(&scoped(scope, candidate)) {
                        return options.interpolation.apply(template);
                    }
                }
                Fallback::Literal(text) => return text.clone(),
            }
        }
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_keys_are_rejected() {
        let mut values = Interpolation::new();
        assert!(matches!(
            values.insert("scope", "x"),
            Err(ActionError::ReservedInterpolationKey(k)) if k == "scope"
        ));
        assert!(values.insert("default", "x").is_err());
        assert!(values.insert("resource_name", "post").is_ok());
    }

    #[test]
    fn test_interpolation_leaves_unknown_placeholders() {
        let values = Interpolation::new().with("name", "post").unwrap();
        assert_eq!(values.apply("a %{name} and %{other}"), "a post and %{other}");
        assert_eq!(values.apply("broken %{name"), "broken %{name");
    }

    #[test]
    fn test_fallback_chain_order() {
        let translator = MemoryTranslator::new()
            .with("b", "from b")
            .with("c", "from c");
        let options = TranslateOptions {
            defaults: vec![
                Fallback::Key("missing".into()),
                Fallback::Key("b".into()),
                Fallback::Key("c".into()),
            ],
            ..Default::default()
        };
        assert_eq!(translator.translate("a", &options), "from b");
    }

    #[test]
    fn test_literal_and_key_fallback() {
        let translator = MemoryTranslator::new();
        let options = TranslateOptions {
            defaults: vec![Fallback::Literal("plain".into())],
            ..Default::default()
        };
        assert_eq!(translator.translate("a", &options), "plain");
        assert_eq!(translator.translate("a", &TranslateOptions::default()), "a");
    }

    #[test]
    fn test_scope_prefixes_lookups() {
        let translator = MemoryTranslator::new().with("flash.success", "Done");
        let options = TranslateOptions {
            scope: Some("flash".into()),
            ..Default::default()
        };
        assert_eq!(translator.translate("success", &options), "Done");
    }

    #[test]
    fn test_nested_json_is_flattened() {
        let translator = MemoryTranslator::from_json_str(
            r#"{"posts": {"create": {"success": "Yay %{resource_name}"}}, "n": 1}"#,
        )
        .unwrap();
        assert_eq!(translator.lookup("posts.create.success"), Some("Yay %{resource_name}"));
        assert_eq!(translator.len(), 1);
    }

    #[test]
    fn test_bundled_defaults_parse() {
        serde_json::from_str::<Value>(DEFAULT_LOCALE).unwrap();
        let translator = MemoryTranslator::with_defaults();
        assert!(translator.lookup("create.success").is_some());
        assert!(translator.lookup("error").is_some());
    }
}
