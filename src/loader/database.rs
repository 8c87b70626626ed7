//! Card database for looking up card definitions
//!
//! Cards are keyed by collector number; a second index maps normalized
//! names to numbers so deck lists and trainer lookups can go by name.

use crate::core::{normalize_name, CardDefinition, CardNumber};
use crate::loader::card::CardLoader;
use crate::{Result, TcgError};
use rustc_hash::FxHashMap;
use std::path::Path;
use std::sync::Arc;

/// In-memory catalog of card definitions
#[derive(Debug, Clone, Default)]
pub struct CardDatabase {
    by_number: FxHashMap<CardNumber, Arc<CardDefinition>>,
    by_name: FxHashMap<String, CardNumber>,
}

impl CardDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `.json` catalog file under `dir` (recursively)
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        if !dir.exists() {
            return Err(TcgError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Catalog directory not found: {dir:?}"),
            )));
        }
        let mut db = CardDatabase::new();
        db.load_directory(dir)?;
        Ok(db)
    }

    fn load_directory(&mut self, dir: &Path) -> Result<()> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        // Later files win on duplicate numbers, so keep the order stable
        paths.sort();
        for path in paths {
            if path.is_dir() {
                self.load_directory(&path)?;
            } else if path.extension().and_then(|s| s.to_str()) == Some("json") {
                for def in CardLoader::load_from_file(&path)? {
                    self.add_card(def);
                }
            }
        }
        Ok(())
    }

    /// Add a definition, replacing any earlier card with the same number
    pub fn add_card(&mut self, def: CardDefinition) {
        self.insert(Arc::new(def));
    }

    pub fn insert(&mut self, def: Arc<CardDefinition>) {
        if let Some(old) = self.by_number.get(&def.number) {
            if old.name != def.name {
                eprintln!(
                    "Warning: card {} '{}' replaces '{}'",
                    def.number, def.name, old.name
                );
            }
            self.by_name.remove(&old.name.normalized());
        }
        self.by_name.insert(def.name.normalized(), def.number);
        self.by_number.insert(def.number, def);
    }

    pub fn get(&self, number: CardNumber) -> Option<&Arc<CardDefinition>> {
        self.by_number.get(&number)
    }

    /// Look up by name (case, accent and whitespace insensitive)
    pub fn get_by_name(&self, name: &str) -> Option<&Arc<CardDefinition>> {
        self.by_name
            .get(&normalize_name(name))
            .and_then(|n| self.by_number.get(n))
    }

    pub fn contains(&self, number: CardNumber) -> bool {
        self.by_number.contains_key(&number)
    }

    pub fn len(&self) -> usize {
        self.by_number.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_number.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CardDefinition>> {
        self.by_number.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EnergyType;

    #[test]
    fn test_empty_database() {
        let db = CardDatabase::new();
        assert!(db.is_empty());
        assert!(db.get(CardNumber::new(4)).is_none());
    }

    #[test]
    fn test_lookup_by_number_and_name() {
        let mut db = CardDatabase::new();
        db.add_card(CardDefinition::basic_creature(4, "Charmander", 50, EnergyType::Fire));
        db.add_card(CardDefinition::basic_creature(29, "Flabébé", 40, EnergyType::Psychic));

        assert_eq!(db.len(), 2);
        assert!(db.contains(CardNumber::new(4)));
        assert_eq!(db.get_by_name("  charmander ").unwrap().number, CardNumber::new(4));
        assert_eq!(db.get_by_name("FLABEBE").unwrap().number, CardNumber::new(29));
    }

    #[test]
    fn test_replacement_drops_old_name() {
        let mut db = CardDatabase::new();
        db.add_card(CardDefinition::basic_creature(4, "Charmander", 50, EnergyType::Fire));
        db.add_card(CardDefinition::basic_creature(4, "Vulpix", 50, EnergyType::Fire));
        assert_eq!(db.len(), 1);
        assert!(db.get_by_name("Charmander").is_none());
        assert!(db.get_by_name("Vulpix").is_some());
    }

    #[test]
    fn test_missing_directory() {
        assert!(CardDatabase::load_from_dir(Path::new("no/such/catalog")).is_err());
    }
}
