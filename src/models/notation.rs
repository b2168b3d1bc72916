//! Notation catalog
//!
//! A notation is one visual music symbol keyed by a single input character.
//! Catalog entries are shared (`Arc`) with every note that places them.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

const BUILTIN_CATALOG_YAML: &str = include_str!("notations.yaml");

static BUILTIN_CATALOG: Lazy<NotationCatalog> = Lazy::new(|| {
    NotationCatalog::from_yaml(BUILTIN_CATALOG_YAML)
        .unwrap_or_else(|e| panic!("built-in notation catalog is invalid: {}", e))
});

/// Immutable catalog entry
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Notation {
    /// Input character that selects this notation
    pub symbol: char,
    /// Display name (e.g. "Quarter Note")
    pub name: String,
    /// Image reference resolved by the renderer
    pub image: String,
}

/// Lookup from input symbol to notation
#[derive(Clone, Debug, Default)]
pub struct NotationCatalog {
    entries: Vec<Arc<Notation>>,
    by_symbol: HashMap<char, usize>,
}

impl NotationCatalog {
    /// The catalog shipped with the editor (45 symbols, `a`-`z` then `A`-`S`)
    pub fn builtin() -> Self {
        BUILTIN_CATALOG.clone()
    }

    pub fn from_entries(entries: Vec<Notation>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for notation in entries {
            if notation.name.trim().is_empty() {
                return Err(CatalogError::EmptyName(notation.symbol));
            }
            if catalog.by_symbol.contains_key(&notation.symbol) {
                return Err(CatalogError::DuplicateSymbol(notation.symbol));
            }
            catalog.by_symbol.insert(notation.symbol, catalog.entries.len());
            catalog.entries.push(Arc::new(notation));
        }
        Ok(catalog)
    }

    pub fn from_yaml(text: &str) -> Result<Self, CatalogError> {
        let entries: Vec<Notation> = serde_yaml::from_str(text)?;
        Self::from_entries(entries)
    }

    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let entries: Vec<Notation> = serde_json::from_str(text)?;
        Self::from_entries(entries)
    }

    /// Resolve an input symbol
    pub fn by_key(&self, symbol: char) -> Option<Arc<Notation>> {
        self.by_symbol
            .get(&symbol)
            .map(|&index| Arc::clone(&self.entries[index]))
    }

    /// Resolve a key name as delivered by the browser (`"a"`, `"Enter"`, ...).
    /// Only single-character keys can name a notation.
    pub fn by_key_name(&self, key: &str) -> Option<Arc<Notation>> {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(symbol), None) => self.by_key(symbol),
            _ => None,
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &Notation> {
        self.entries.iter().map(|n| n.as_ref())
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
    fn test_builtin_catalog_has_45_symbols() {
        let catalog = NotationCatalog::builtin();
        assert_eq!(catalog.len(), 45);
        assert_eq!(catalog.by_key('a').unwrap().name, "Whole Note");
        assert_eq!(catalog.by_key('S').unwrap().name, "Segno");
        assert!(catalog.by_key('T').is_none());
        assert!(catalog.by_key('1').is_none());
    }

    #[test]
    fn test_lookup_shares_entry() {
        let catalog = NotationCatalog::builtin();
        let first = catalog.by_key('c').unwrap();
        let second = catalog.by_key('c').unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_key_name_must_be_single_char() {
        let catalog = NotationCatalog::builtin();
        assert!(catalog.by_key_name("b").is_some());
        assert!(catalog.by_key_name("Enter").is_none());
        assert!(catalog.by_key_name("").is_none());
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let json = r#"[
            {"symbol": "x", "name": "One", "image": "one.svg"},
            {"symbol": "x", "name": "Two", "image": "two.svg"}
        ]"#;
        assert!(matches!(
            NotationCatalog::from_json(json),
            Err(CatalogError::DuplicateSymbol('x'))
        ));
    }

    #[test]
    fn test_custom_yaml_catalog() {
        let yaml = "- symbol: \"q\"\n  name: Quaver\n  image: quaver.png\n";
        let catalog = NotationCatalog::from_yaml(yaml).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.by_key('q').unwrap().image, "quaver.png");
    }
}
