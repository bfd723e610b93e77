//! # Naming Conventions
//!
//! Derives every name a controller needs from its model concept and its
//! controller path:
//!
//! | Input                      | Derived                      | Example              |
//! |----------------------------|------------------------------|----------------------|
//! | model name                 | singular slot / param key    | `admin_blog_post`    |
//! | model name                 | plural slot                  | `admin_blog_posts`   |
//! | model name                 | human name                   | `blog post`          |
//! | controller path            | flash lookup key             | `admin.blog_posts`   |
//! | controller path            | model name (when not given)  | `Admin::BlogPost`    |
//!
//! All functions here are pure and never fail. Words the naive English rules
//! get wrong can be registered on [`Inflections`].

use convert_case::{Case, Casing};
use std::collections::{BTreeMap, BTreeSet};

/// Pluralization rules: naive English suffix rules plus explicit overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inflections {
    /// singular -> plural
    irregular: BTreeMap<String, String>,
    uncountable: BTreeSet<String>,
}

impl Default for Inflections {
    fn default() -> Self {
        let irregular = [
            ("person", "people"),
            ("man", "men"),
            ("woman", "women"),
            ("child", "children"),
            ("mouse", "mice"),
        ];
        let uncountable = ["equipment", "information", "news", "series", "sheep", "species"];
        Self {
            irregular: irregular
                .iter()
                .map(|(s, p)| (s.to_string(), p.to_string()))
                .collect(),
            uncountable: uncountable.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl Inflections {
    /// Registers an irregular singular/plural pair.
    pub fn irregular(mut self, singular: impl Into<String>, plural: impl Into<String>) -> Self {
        self.irregular
            .insert(singular.into().to_lowercase(), plural.into().to_lowercase());
        self
    }

    /// Registers a word whose plural equals its singular.
    pub fn uncountable(mut self, word: impl Into<String>) -> Self {
        self.uncountable.insert(word.into().to_lowercase());
        self
    }

    /// Pluralizes the last `_`-separated word of a snake_case identifier.
    pub fn pluralize(&self, word: &str) -> String {
        self.inflect_last(word, |w| self.pluralize_word(w))
    }

    /// Singularizes the last `_`-separated word of a snake_case identifier.
    pub fn singularize(&self, word: &str) -> String {
        self.inflect_last(word, |w| self.singularize_word(w))
    }

    fn inflect_last(&self, word: &str, f: impl Fn(&str) -> String) -> String {
        match word.rsplit_once('_') {
            Some((head, last)) => format!("{head}_{}", f(last)),
            None => f(word),
        }
    }

    fn pluralize_word(&self, word: &str) -> String {
        if word.is_empty() || self.uncountable.contains(word) {
            return word.to_string();
        }
        if let Some(plural) = self.irregular.get(word) {
            return plural.clone();
        }
        if self.irregular.values().any(|p| p == word) {
            return word.to_string();
        }
        if let Some(stem) = word.strip_suffix('y') {
            if stem.chars().last().is_some_and(|c| !is_vowel(c)) {
                return format!("{stem}ies");
            }
        }
        if ["s", "x", "z", "ch", "sh"].iter().any(|s| word.ends_with(s)) {
            return format!("{word}es");
        }
        format!("{word}s")
    }

    fn singularize_word(&self, word: &str) -> String {
        if word.is_empty() || self.uncountable.contains(word) {
            return word.to_string();
        }
        if let Some((singular, _)) = self.irregular.iter().find(|(_, p)| *p == word) {
            return singular.clone();
        }
        if self.irregular.contains_key(word) {
            return word.to_string();
        }
        if let Some(stem) = word.strip_suffix("ies") {
            if !stem.is_empty() {
                return format!("{stem}y");
            }
        }
        if ["sses", "shes", "ches", "xes", "zes"].iter().any(|s| word.ends_with(s)) {
            return word[..word.len() - 2].to_string();
        }
        if word.ends_with("ss") {
            return word.to_string();
        }
        match word.strip_suffix('s') {
            Some(stem) if !stem.is_empty() => stem.to_string(),
            _ => word.to_string(),
        }
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Flattens a (possibly namespaced) model name into one snake_case identifier.
///
/// `"Admin::BlogPost"` becomes `"admin_blog_post"`.
pub fn singular_slot(name: &str) -> String {
    name.split("::")
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_case(Case::Snake))
        .collect::<Vec<_>>()
        .join("_")
}

/// Plural form of [`singular_slot`].
pub fn plural_slot(name: &str, inflections: &Inflections) -> String {
    inflections.pluralize(&singular_slot(name))
}

/// Converts a controller path into a dotted lookup key (`admin/posts` -> `admin.posts`).
pub fn controller_key(path: &str) -> String {
    path.trim_matches('/').replace('/', ".")
}

/// Lower-cased human name of the last namespace segment (`Admin::BlogPost` -> `blog post`).
pub fn humanize(name: &str) -> String {
    let last = name.rsplit("::").next().unwrap_or(name);
    last.to_case(Case::Snake).replace('_', " ").to_lowercase()
}

/// Upper-cases the first character.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Derives a model name from a controller path (`admin/blog_posts` -> `Admin::BlogPost`).
pub fn classify(path: &str, inflections: &Inflections) -> String {
    let segments: Vec<&str> = path
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    let last = segments.len().saturating_sub(1);
    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let word = if i == last {
                inflections.singularize(segment)
            } else {
                segment.to_string()
            };
            word.to_case(Case::Pascal)
        })
        .collect::<Vec<_>>()
        .join("::")
}

/// Location of the list view for a controller path.
pub fn collection_path(controller_path: &str) -> String {
    format!("/{}", controller_path.trim_matches('/'))
}

/// Canonical location of a record. Unsaved records fall back to the collection.
pub fn member_path(controller_path: &str, param: Option<&str>) -> String {
    match param {
        Some(param) => format!("{}/{}", collection_path(controller_path), param),
        None => collection_path(controller_path),
    }
}

/// The domain entity a controller operates on, with every name derived from it.
///
/// Resolved once when a controller is built and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConcept {
    name: String,
    singular: String,
    plural: String,
    human: String,
    controller_path: String,
    controller_key: String,
}

impl ModelConcept {
    /// Resolves a concept for `controller_path`, deriving the model name from the
    /// path when `model` is `None`.
    pub fn resolve(controller_path: &str, model: Option<&str>, inflections: &Inflections) -> Self {
        let controller_path = controller_path.trim_matches('/').to_string();
        let name = match model {
            Some(name) => name.to_string(),
            None => classify(&controller_path, inflections),
        };
        Self {
            singular: singular_slot(&name),
            plural: plural_slot(&name, inflections),
            human: humanize(&name),
            controller_key: controller_key(&controller_path),
            controller_path,
            name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key of the member slot and of the nested request parameters.
    pub fn singular(&self) -> &str {
        &self.singular
    }

    /// Key of the collection slot.
    pub fn plural(&self) -> &str {
        &self.plural
    }

    /// Lower-case human name, e.g. `blog post`.
    pub fn human(&self) -> &str {
        &self.human
    }

    pub fn human_capitalized(&self) -> String {
        capitalize(&self.human)
    }

    pub fn controller_path(&self) -> &str {
        &self.controller_path
    }

    pub fn controller_key(&self) -> &str {
        &self.controller_key
    }

    pub fn collection_path(&self) -> String {
        collection_path(&self.controller_path)
    }

    pub fn member_path(&self, param: Option<&str>) -> String {
        member_path(&self.controller_path, param)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_flatten_namespaces() {
        let inflections = Inflections::default();
        assert_eq!(singular_slot("Post"), "post");
        assert_eq!(singular_slot("Admin::BlogPost"), "admin_blog_post");
        assert_eq!(plural_slot("Admin::BlogPost", &inflections), "admin_blog_posts");
        assert_eq!(plural_slot("Category", &inflections), "categories");
        assert_eq!(plural_slot("Person", &inflections), "people");
    }

    #[test]
    fn test_pluralize_and_singularize_rules() {
        let inflections = Inflections::default();
        assert_eq!(inflections.pluralize("box"), "boxes");
        assert_eq!(inflections.pluralize("day"), "days");
        assert_eq!(inflections.pluralize("sheep"), "sheep");
        assert_eq!(inflections.singularize("categories"), "category");
        assert_eq!(inflections.singularize("addresses"), "address");
        assert_eq!(inflections.singularize("people"), "person");
        assert_eq!(inflections.singularize("posts"), "post");
        assert_eq!(inflections.singularize("news"), "news");
    }

    #[test]
    fn test_inflection_overrides() {
        let inflections = Inflections::default()
            .irregular("octopus", "octopi")
            .uncountable("fish");
        assert_eq!(inflections.pluralize("sea_octopus"), "sea_octopi");
        assert_eq!(inflections.singularize("octopi"), "octopus");
        assert_eq!(inflections.pluralize("fish"), "fish");
    }

    #[test]
    fn test_controller_key_and_classify() {
        let inflections = Inflections::default();
        assert_eq!(controller_key("posts"), "posts");
        assert_eq!(controller_key("admin/posts"), "admin.posts");
        assert_eq!(classify("posts", &inflections), "Post");
        assert_eq!(classify("admin/blog_posts", &inflections), "Admin::BlogPost");
    }

    #[test]
    fn test_concept_derived_from_path() {
        let concept = ModelConcept::resolve("admin/blog_posts", None, &Inflections::default());
        assert_eq!(concept.name(), "Admin::BlogPost");
        assert_eq!(concept.singular(), "admin_blog_post");
        assert_eq!(concept.plural(), "admin_blog_posts");
        assert_eq!(concept.human(), "blog post");
        assert_eq!(concept.human_capitalized(), "Blog post");
        assert_eq!(concept.controller_key(), "admin.blog_posts");
    }

    #[test]
    fn test_explicit_model_wins_over_path() {
        let concept = ModelConcept::resolve("articles", Some("Post"), &Inflections::default());
        assert_eq!(concept.singular(), "post");
        assert_eq!(concept.controller_key(), "articles");
        assert_eq!(concept.collection_path(), "/articles");
        assert_eq!(concept.member_path(Some("7")), "/articles/7");
        assert_eq!(concept.member_path(None), "/articles");
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let inflections = Inflections::default();
        let a = ModelConcept::resolve("posts", None, &inflections);
        let b = ModelConcept::resolve("posts", None, &inflections);
        assert_eq!(a, b);
    }
}
