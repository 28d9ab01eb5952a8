//! # Metadata
//!
//! Free-form string properties carried by nodes, sections and destinations.
//!
//! Metadata is opaque to the CORE. It travels through the document and
//! snapshot formats but never influences completeness or correctness.

use crate::types::Metadata;

/// Access to an entity's metadata map.
pub trait HasMetadata {
    /// The full metadata map.
    fn metadata(&self) -> &Metadata;

    /// Mutable access to the metadata map.
    fn metadata_mut(&mut self) -> &mut Metadata;

    /// Whether the entity carries any metadata at all.
    fn has_metadata(&self) -> bool {
        !self.metadata().is_empty()
    }

    /// Whether `key` is present.
    fn has_metadata_key(&self, key: &str) -> bool {
        self.metadata().contains_key(key)
    }

    /// The value stored under `key`, or an empty string when absent.
    fn metadata_value(&self, key: &str) -> &str {
        self.metadata().get(key).map_or("", String::as_str)
    }

    /// Store `value` under `key`, returning the previous value.
    fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String>
    where
        Self: Sized,
    {
        self.metadata_mut().insert(key.into(), value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Tagged {
        meta: Metadata,
    }

    impl HasMetadata for Tagged {
        fn metadata(&self) -> &Metadata {
            &self.meta
        }

        fn metadata_mut(&mut self) -> &mut Metadata {
            &mut self.meta
        }
    }

    #[test]
    fn empty_by_default() {
        let t = Tagged::default();
        assert!(!t.has_metadata());
        assert!(!t.has_metadata_key("color"));
        assert_eq!(t.metadata_value("color"), "");
    }

    #[test]
    fn set_and_read() {
        let mut t = Tagged::default();
        assert_eq!(t.set_metadata("color", "red"), None);
        assert_eq!(t.set_metadata("color", "blue"), Some("red".to_string()));
        assert!(t.has_metadata());
        assert!(t.has_metadata_key("color"));
        assert_eq!(t.metadata_value("color"), "blue");
    }
}
