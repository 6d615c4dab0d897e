use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Outstanding per-field error messages, in insertion order. An empty message counts as no error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(IndexMap<String, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message of `key`, replacing a previous one in place.
    pub fn add_error(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.insert(key.into(), message.into());
    }

    pub fn clear_error(&mut self, key: &str) {
        self.0.shift_remove(key);
    }

    pub fn is_error(&self) -> bool {
        self.0.values().any(|message| !message.is_empty())
    }

    /// Any one outstanding error: the first non-empty message in insertion order. This is not
    /// necessarily the most relevant one.
    pub fn top_error_message(&self) -> Option<&str> {
        self.0.values().find(|message| !message.is_empty()).map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, message)| (key.as_str(), message.as_str()))
    }
}
