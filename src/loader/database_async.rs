//! Async card database with eager loading
//!
//! `eager_load` walks the catalog directory with jwalk on a blocking thread
//! and starts parsing each file on the tokio runtime as soon as its path is
//! discovered. Lookups after loading go through a shared `RwLock`.

use crate::core::{CardDefinition, CardNumber};
use crate::loader::card::CardLoader;
use crate::loader::database::CardDatabase;
use crate::{Result, TcgError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Async wrapper around a shared `CardDatabase`
pub struct AsyncCardDatabase {
    catalog_dir: PathBuf,
    cards: Arc<RwLock<CardDatabase>>,
}

impl AsyncCardDatabase {
    pub fn new(catalog_dir: PathBuf) -> Self {
        AsyncCardDatabase {
            catalog_dir,
            cards: Arc::new(RwLock::new(CardDatabase::new())),
        }
    }

    /// Load every catalog file under the directory (parallel)
    ///
    /// Returns (cards_loaded, duration). Any unreadable or malformed file
    /// fails the whole load.
    pub async fn eager_load(&self) -> Result<(usize, std::time::Duration)> {
        let start = Instant::now();
        if !self.catalog_dir.exists() {
            return Err(TcgError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Catalog directory not found: {:?}", self.catalog_dir),
            )));
        }

        let catalog_dir = self.catalog_dir.clone();
        let (path_tx, mut path_rx) = tokio::sync::mpsc::unbounded_channel();
        let (result_tx, mut result_rx) =
            tokio::sync::mpsc::unbounded_channel::<(PathBuf, Result<Vec<CardDefinition>>)>();

        // jwalk parallelizes the walk on rayon's pool
        let walker = tokio::task::spawn_blocking(move || -> Result<()> {
            for entry in jwalk::WalkDir::new(&catalog_dir).sort(true) {
                let entry = entry.map_err(|e| {
                    TcgError::IoError(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
                })?;
                let path = entry.path();
                if entry.file_type().is_file()
                    && path.extension().and_then(|s| s.to_str()) == Some("json")
                    && path_tx.send(path).is_err()
                {
                    break;
                }
            }
            Ok(())
        });

        tokio::spawn(async move {
            while let Some(path) = path_rx.recv().await {
                let result_tx = result_tx.clone();
                tokio::spawn(async move {
                    let result = Self::load_file_async(&path).await;
                    let _ = result_tx.send((path, result));
                });
            }
        });

        // Apply files in path order so duplicate numbers resolve the same way
        // as the synchronous loader
        let mut loaded = Vec::new();
        while let Some((path, result)) = result_rx.recv().await {
            loaded.push((path, result?));
        }
        walker.await??;
        loaded.sort_by(|a, b| a.0.cmp(&b.0));

        let mut db = CardDatabase::new();
        for (_, defs) in loaded {
            for def in defs {
                db.add_card(def);
            }
        }
        let count = db.len();
        *self.cards.write().await = db;
        Ok((count, start.elapsed()))
    }

    async fn load_file_async(path: &Path) -> Result<Vec<CardDefinition>> {
        let contents = tokio::fs::read_to_string(path).await?;
        CardLoader::parse(&contents).map_err(|e| {
            TcgError::InvalidCardFormat(format!(
                "Failed to parse catalog file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    pub async fn get(&self, number: CardNumber) -> Option<Arc<CardDefinition>> {
        self.cards.read().await.get(number).cloned()
    }

    pub async fn get_by_name(&self, name: &str) -> Option<Arc<CardDefinition>> {
        self.cards.read().await.get_by_name(name).cloned()
    }

    pub async fn len(&self) -> usize {
        self.cards.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cards.read().await.is_empty()
    }

    /// Copy of the loaded catalog for synchronous use
    pub async fn snapshot(&self) -> CardDatabase {
        self.cards.read().await.clone()
    }

    /// Get a clone of the database handle (shares the cache)
    pub fn clone_handle(&self) -> Self {
        AsyncCardDatabase {
            catalog_dir: self.catalog_dir.clone(),
            cards: Arc::clone(&self.cards),
        }
    }
}
