//! Key uniqueness tracking
//!
//! ACF identifies fields by key, so two fields resolving to the same key
//! would silently overwrite each other. A [`KeyRegistry`] records every key
//! issued while one group tree is built and rejects repeats, across the whole
//! tree and at any depth.
//!
//! The registry lives inside a [`BuildSession`] that is handed to every field
//! constructor. One session per group build keeps independent builds
//! isolated.

use std::collections::HashSet;

use crate::error::{Error, Result};

/// Set of field keys issued during one build session
#[derive(Debug, Default)]
pub struct KeyRegistry {
    issued: HashSet<String>,
    order: Vec<String>,
}

impl KeyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as issued.
    ///
    /// Fails with [`Error::DuplicateKey`] if the key was issued before in
    /// this session.
    pub fn register(&mut self, key: &str) -> Result<()> {
        if !self.issued.insert(key.to_string()) {
            return Err(Error::DuplicateKey {
                key: key.to_string(),
            });
        }
        tracing::debug!(key, "registered field key");
        self.order.push(key.to_string());
        Ok(())
    }

    /// Forget every issued key
    pub fn reset(&mut self) {
        self.issued.clear();
        self.order.clear();
    }

    /// Whether `key` was issued in this session
    pub fn contains(&self, key: &str) -> bool {
        self.issued.contains(key)
    }

    /// Number of issued keys
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no key was issued yet
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Issued keys in registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

/// State shared by every field constructed for one group
#[derive(Debug, Default)]
pub struct BuildSession {
    registry: KeyRegistry,
}

impl BuildSession {
    /// Start a fresh session
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly derived field key
    pub fn register_key(&mut self, key: &str) -> Result<()> {
        self.registry.register(key)
    }

    /// Read access to the key registry
    pub fn registry(&self) -> &KeyRegistry {
        &self.registry
    }

    /// Clear the registry so the session can build another tree
    pub fn reset(&mut self) {
        self.registry.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_new_key() {
        let mut registry = KeyRegistry::new();
        registry.register("field_employee_link").unwrap();
        assert!(registry.contains("field_employee_link"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_duplicate_key_fails() {
        let mut registry = KeyRegistry::new();
        registry.register("field_employee_link").unwrap();

        let err = registry.register("field_employee_link").unwrap_err();
        match err {
            Error::DuplicateKey { key } => assert_eq!(key, "field_employee_link"),
            other => panic!("Expected DuplicateKey, got {other:?}"),
        }
        assert_eq!(
            registry_error_message(&mut registry, "field_employee_link"),
            "the field key [field_employee_link] is not unique"
        );
    }

    fn registry_error_message(registry: &mut KeyRegistry, key: &str) -> String {
        registry.register(key).unwrap_err().to_string()
    }

    #[test]
    fn test_reset_clears_keys() {
        let mut registry = KeyRegistry::new();
        registry.register("field_a").unwrap();
        registry.reset();
        assert!(registry.is_empty());
        registry.register("field_a").unwrap();
    }

    #[test]
    fn test_independent_sessions_do_not_collide() {
        let mut first = BuildSession::new();
        let mut second = BuildSession::new();
        first.register_key("field_employee_link").unwrap();
        second.register_key("field_employee_link").unwrap();
        assert_eq!(first.registry().len(), 1);
        assert_eq!(second.registry().len(), 1);
    }

    #[test]
    fn test_keys_in_registration_order() {
        let mut session = BuildSession::new();
        session.register_key("field_b").unwrap();
        session.register_key("field_a").unwrap();
        let keys: Vec<_> = session.registry().keys().collect();
        assert_eq!(keys, vec!["field_b", "field_a"]);
    }
}
