//! Resolves where the catalog database file lives, mirroring
//! `catalog_repo.py`'s `DATA_DIR`/`KG_DATA_DIR`/`STORAGE_DIR` env precedence.

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub base_dir: PathBuf,
}

impl StoreConfig {
    pub fn from_env() -> Self {
        let base_dir = env::var("DATA_DIR")
            .or_else(|_| env::var("KG_DATA_DIR"))
            .or_else(|_| env::var("STORAGE_DIR"))
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        Self { base_dir }
    }

    pub fn catalog_db_path(&self) -> PathBuf {
        self.base_dir.join("catalog.db")
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
