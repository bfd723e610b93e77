//! # Flash Messages
//!
//! A flash message is a short status line (`success` or `error`) produced by a
//! mutating action and shown on the *next* rendered response.
//!
//! ## Message resolution
//!
//! [`FlashMessageResolver`] turns `(controller key, action, severity)` into a
//! localized string by asking the [`Translator`] for the most specific key
//! first and falling back to broader ones:
//!
//! ```text
//! posts.create.success
//! posts.create.success_html
//! create.success
//! create.success_html
//! success
//! success_html
//! "success"              <- literal, used when nothing above resolves
//! ```
//!
//! ## Retention
//!
//! Entries are retained for the next request unless discarded. Mutating
//! actions discard a success entry when the final response is not a redirect,
//! see [`is_redirect`].

use crate::error::ActionError;
use crate::naming::ModelConcept;
use crate::translate::{Fallback, Interpolation, TranslateOptions, Translator};
use std::collections::BTreeMap;
use std::fmt;

/// Redirect-class HTTP status codes.
pub const REDIRECT_STATUSES: [u16; 5] = [301, 302, 303, 307, 308];

pub fn is_redirect(status: u16) -> bool {
    REDIRECT_STATUSES.contains(&status)
}

/// Suffix of the rich (markup) variant of a key.
const RICH_SUFFIX: &str = "_html";

/// Abstract outcome a flash message reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashEntry {
    pub message: String,
    /// Whether the entry survives into the next request.
    pub retained: bool,
}

/// Flash state of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flash {
    entries: BTreeMap<Severity, FlashEntry>,
}

impl Flash {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, severity: Severity, message: impl Into<String>) {
        self.entries.insert(
            severity,
            FlashEntry {
                message: message.into(),
                retained: true,
            },
        );
    }

    /// Marks an entry as not surviving into the next request.
    ///
    /// Returns `true` only when a retained entry was changed.
    pub fn discard(&mut self, severity: Severity) -> bool {
        match self.entries.get_mut(&severity) {
            Some(entry) if entry.retained => {
                entry.retained = false;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, severity: Severity) -> Option<&str> {
        self.entries.get(&severity).map(|e| e.message.as_str())
    }

    pub fn entry(&self, severity: Severity) -> Option<&FlashEntry> {
        self.entries.get(&severity)
    }

    pub fn is_retained(&self, severity: Severity) -> bool {
        self.entries.get(&severity).is_some_and(|e| e.retained)
    }

    /// Entries to hand to the next request.
    pub fn retained(&self) -> impl Iterator<Item = (Severity, &str)> {
        self.entries
            .iter()
            .filter(|(_, e)| e.retained)
            .map(|(s, e)| (*s, e.message.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered candidate keys for one lookup, most specific first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashLookupKey {
    candidates: Vec<String>,
}

impl FlashLookupKey {
    pub fn new(controller_key: &str, action: &str, status: &str) -> Self {
        let mut bases = Vec::with_capacity(3);
        if !controller_key.is_empty() {
            bases.push(format!("{controller_key}.{action}.{status}"));
        }
        bases.push(format!("{action}.{status}"));
        bases.push(status.to_string());

        let candidates = bases
            .into_iter()
            .flat_map(|base| {
                let rich = format!("{base}{RICH_SUFFIX}");
                [base, rich]
            })
            .collect();
        Self { candidates }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Splits into the primary key and the remaining chain.
    pub fn split(&self) -> (&str, &[String]) {
        match self.candidates.split_first() {
            Some((primary, rest)) => (primary.as_str(), rest),
            None => ("", &[]),
        }
    }
}

/// Resolves flash messages through a [`Translator`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlashMessageResolver {
    scope: Option<String>,
}

impl FlashMessageResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix every lookup with `scope` (e.g. `flash`).
    pub fn with_scope(scope: Option<String>) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Interpolation values every flash message can use.
    pub fn interpolation(concept: &ModelConcept) -> Result<Interpolation, ActionError> {
        Interpolation::new()
            .with("resource_name", concept.human())?
            .with("resource_capitalized", concept.human_capitalized())
    }

    /// Resolves a message; falls back to the bare status name when no key matches.
    pub fn resolve(
        &self,
        translator: &dyn Translator,
        controller_key: &str,
        action: &str,
        severity: Severity,
        interpolation: Interpolation,
    ) -> String {
        let status = severity.as_str();
        let lookup = FlashLookupKey::new(controller_key, action, status);
        let (primary, rest) = lookup.split();
        let mut defaults: Vec<Fallback> = rest.iter().cloned().map(Fallback::Key).collect();
        defaults.push(Fallback::Literal(status.to_string()));

        let options = TranslateOptions {
            scope: self.scope.clone(),
            defaults,
            interpolation,
        };
        translator.translate(primary, &options)
    }
}
