//! C6 — the catalog store boundary.
//!
//! spec.md treats persistence as external to the recommendation system; this
//! crate still needs a concrete, testable adapter to be a complete, buildable
//! repo, so [`CatalogStore`] is the seam and [`sqlite::SqliteCatalogStore`] is
//! the one adapter shipped here, grounded on
//! `original_source/look-kg/infrastructure/storage/catalog_repo.py`.

pub mod config;
pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::item::Item;

pub use config::StoreConfig;
pub use sqlite::SqliteCatalogStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("falha de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("erro de armazenamento: {0}")]
    Backend(#[from] sqlx::Error),

    #[error("item não encontrado: {0}")]
    NotFound(String),
}

/// The persistence seam C5 (`recommend`) depends on. Mirrors
/// `catalog_repo.py`'s public functions one for one: `load_all`, `add_item`,
/// `get_item`, `delete_item`, `search`.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn load_all(&self) -> Result<Vec<Item>, StoreError>;

    /// Upsert by `item_id` if present, else by `(nome, categoria)`; else
    /// insert as new, generating an id. Returns the stored item.
    async fn add(&self, item: Item) -> Result<Item, StoreError>;

    async fn get(&self, item_id: &str) -> Result<Option<Item>, StoreError>;

    async fn delete(&self, item_id: &str) -> Result<bool, StoreError>;

    /// Substring search over `nome`/`categoria`/`cor`/`material`/`estilo`/
    /// `ocasion`/`clima`/`padrao`, case-insensitive, `limit`-bounded.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Item>, StoreError>;
}
