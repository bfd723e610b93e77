//! # Model Trait
//!
//! The contract a record type must satisfy to be driven by a
//! [`ResourceController`](crate::actions::ResourceController).
//!
//! The controller never inspects a record's fields. It only needs the value used
//! in its URL ([`Model::to_param`]) and a way to apply the permitted subset of
//! the submitted parameters ([`Model::assign_attributes`]).

use crate::error::ActionError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Debug;

/// Submitted or permitted attributes, keyed by field name.
pub type Attributes = serde_json::Map<String, Value>;

pub trait Model: Clone + Debug + Send + Sync + 'static {
    /// URL parameter of a persisted record; `None` while unsaved.
    fn to_param(&self) -> Option<String>;

    /// Applies attributes in memory. Must not persist anything.
    fn assign_attributes(&mut self, attributes: Attributes) -> Result<(), ActionError>;
}

/// Overlays `attributes` onto the serialized form of `record` and reads it back.
///
/// A convenient [`Model::assign_attributes`] body for serde-enabled records.
/// Unknown fields are ignored by the round trip unless the record denies them.
pub fn merge_attributes<M>(record: &mut M, attributes: Attributes) -> Result<(), ActionError>
where
    M: Serialize + DeserializeOwned,
{
    let mut current = match serde_json::to_value(&*record) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            return Err(ActionError::InvalidAttributes(format!(
                "record does not serialize to an object: {other}"
            )))
        }
        Err(e) => return Err(ActionError::InvalidAttributes(e.to_string())),
    };
    current.extend(attributes);
    *record = serde_json::from_value(Value::Object(current))
        .map_err(|e| ActionError::InvalidAttributes(e.to_string()))?;
    Ok(())
}
