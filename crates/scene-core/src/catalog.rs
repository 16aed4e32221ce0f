//! Name-keyed asset catalogs.
//!
//! Built once at scene start from configuration entries and read-only
//! afterwards. A duplicate name is a fatal configuration error; an unknown
//! name at lookup time signals a mismatch between step code and the provided
//! assets, and is equally fatal.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Which catalog a key error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Narration,
    Spawnable,
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKind::Narration => write!(f, "narration"),
            CatalogKind::Spawnable => write!(f, "spawnable"),
        }
    }
}

/// Errors raised by catalog construction and lookup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// Two configuration entries share a name. Fatal at startup.
    #[error("duplicate {kind} entry \"{name}\" in scene configuration")]
    DuplicateKey { kind: CatalogKind, name: String },
    /// A step asked for a name that was never configured.
    #[error("unknown {kind} \"{name}\"")]
    UnknownKey { kind: CatalogKind, name: String },
}

/// Immutable name-to-handle lookup table.
#[derive(Debug, Clone)]
pub struct Catalog<T> {
    kind: CatalogKind,
    entries: HashMap<String, T>,
}

impl<T> Catalog<T> {
    /// Builds a catalog, rejecting duplicate names.
    pub fn build(
        kind: CatalogKind,
        entries: impl IntoIterator<Item = (String, T)>,
    ) -> Result<Self, SceneError> {
        let mut map = HashMap::new();
        for (name, value) in entries {
            if map.contains_key(&name) {
                return Err(SceneError::DuplicateKey { kind, name });
            }
            map.insert(name, value);
        }
        Ok(Self { kind, entries: map })
    }

    /// Looks up a handle by name.
    pub fn get(&self, name: &str) -> Result<&T, SceneError> {
        self.entries.get(name).ok_or_else(|| SceneError::UnknownKey {
            kind: self.kind,
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_accepts_unique_names() {
        let catalog = Catalog::build(
            CatalogKind::Narration,
            vec![
                ("entry".to_string(), "a.ogg"),
                ("intro".to_string(), "b.ogg"),
            ],
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(*catalog.get("entry").unwrap(), "a.ogg");
    }

    #[test]
    fn build_rejects_duplicate_names() {
        let result = Catalog::build(
            CatalogKind::Spawnable,
            vec![
                ("void".to_string(), "x"),
                ("void".to_string(), "y"),
            ],
        );

        assert_eq!(
            result.unwrap_err(),
            SceneError::DuplicateKey {
                kind: CatalogKind::Spawnable,
                name: "void".to_string(),
            }
        );
    }

    #[test]
    fn lookup_of_missing_name_is_an_error() {
        let catalog: Catalog<&str> = Catalog::build(CatalogKind::Narration, vec![]).unwrap();
        assert_eq!(
            catalog.get("outro").unwrap_err(),
            SceneError::UnknownKey {
                kind: CatalogKind::Narration,
                name: "outro".to_string(),
            }
        );
    }

    #[test]
    fn error_messages_name_the_catalog() {
        let err = SceneError::UnknownKey {
            kind: CatalogKind::Spawnable,
            name: "violin".to_string(),
        };
        assert_eq!(err.to_string(), "unknown spawnable \"violin\"");
    }
}
