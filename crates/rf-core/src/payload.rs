//! # Raw attribute bags
//!
//! Entities arriving from the outside world (request bodies, fixtures) are
//! checked here before any typed value is built. Presence is checked for every
//! key first, types second, so a bag that is both incomplete and mistyped is
//! reported as incomplete.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Read-only view over a JSON object, tagged with the entity it should become.
pub struct Payload<'a> {
    entity: &'static str,
    fields: &'a Map<String, Value>,
}

impl<'a> Payload<'a> {
    /// Wraps `value`, requiring every key in `text` to hold a non-empty value
    /// and every key in `flags` to merely be present.
    pub fn parse(
        entity: &'static str,
        value: &'a Value,
        text: &[&str],
        flags: &[&str],
    ) -> Result<Self, ValidationError> {
        let fields = value.as_object().ok_or_else(|| ValidationError::missing(entity))?;

        let blank = |key: &&str| match fields.get(*key) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        };
        if text.iter().any(blank) || flags.iter().any(|key| !fields.contains_key(*key)) {
            return Err(ValidationError::missing(entity));
        }

        Ok(Self { entity, fields })
    }

    pub fn text(&self, key: &str) -> Result<String, ValidationError> {
        match self.fields.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            _ => Err(ValidationError::invalid_type(self.entity)),
        }
    }

    /// Optional text: absent or null is `None`, anything but a string is a type error.
    pub fn optional_text(&self, key: &str) -> Result<Option<String>, ValidationError> {
        match self.fields.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(ValidationError::invalid_type(self.entity)),
        }
    }

    /// RFC 3339 timestamp.
    pub fn timestamp(&self, key: &str) -> Result<DateTime<Utc>, ValidationError> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|date| date.with_timezone(&Utc))
            .ok_or_else(|| ValidationError::invalid_type(self.entity))
    }

    pub fn flag(&self, key: &str) -> Result<bool, ValidationError> {
        self.fields
            .get(key)
            .and_then(Value::as_bool)
            .ok_or_else(|| ValidationError::invalid_type(self.entity))
    }
}
