//! SQLite-backed [`CatalogStore`], grounded on
//! `original_source/look-kg/infrastructure/storage/catalog_repo.py` for the
//! upsert/search semantics and on `storage/schema.rs`'s `Database::open` for
//! the pool setup (busy_timeout pragma, `mode=rwc`, migrations run on open).

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{CatalogStore, StoreError};
use crate::item::Item;
use crate::vocab::{Categoria, Clima, Cor, Estilo, Material, Ocasion, Padrao, Paleta};

/// `sqlx`'s pool only serializes individual statement execution; `add`'s
/// check-by-id, dedup-by-`(nome, categoria)`, then insert-or-replace
/// sequence spans several statements and several `await` points, so two
/// concurrent upserts for the same logical item could otherwise both fall
/// through to "insert as new". This mutex is the store-level write lock
/// spec.md §5 requires, serializing `add`/`delete` the way the graph-level
/// lock in `recommend` serializes graph mutation.
#[derive(Clone)]
pub struct SqliteCatalogStore {
    pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    item_id: String,
    nome: String,
    categoria: Option<String>,
    cor: Option<String>,
    padrao: Option<String>,
    material: Option<String>,
    estilo: Option<String>,
    ocasion: Option<String>,
    clima: Option<String>,
    #[allow(dead_code)]
    paleta: Option<String>,
}

fn row_to_item(row: ItemRow) -> Option<Item> {
    let categoria = Categoria::from_str(row.categoria.as_deref()?).ok()?;
    let cor = Cor::from_str(row.cor.as_deref()?).ok()?;
    let padrao = row
        .padrao
        .as_deref()
        .and_then(|s| Padrao::from_str(s).ok())
        .unwrap_or(Padrao::Liso);
    let estilo = row
        .estilo
        .as_deref()
        .and_then(|s| Estilo::from_str(s).ok())
        .unwrap_or(Estilo::Classico);
    let ocasion = row
        .ocasion
        .as_deref()
        .and_then(|s| Ocasion::from_str(s).ok())
        .unwrap_or(Ocasion::Casual);
    let clima = row
        .clima
        .as_deref()
        .and_then(|s| Clima::from_str(s).ok())
        .unwrap_or(Clima::Quente);
    let material = row
        .material
        .as_deref()
        .filter(|s| !s.is_empty())
        .and_then(|s| Material::from_str(s).ok());
    let paleta = crate::vocab::palette(cor);

    Some(Item {
        item_id: row.item_id,
        nome: row.nome,
        categoria,
        cor,
        padrao,
        material,
        estilo,
        ocasion,
        clima,
        paleta,
    })
}

fn norm_name(s: &str) -> String {
    s.trim().to_lowercase()
}

fn gen_item_id(categoria: &str) -> String {
    let prefix = {
        let n = norm_name(categoria);
        let truncated: String = n.chars().take(10).collect();
        if truncated.is_empty() {
            "item".to_string()
        } else {
            truncated
        }
    };
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &suffix[..8])
}

impl SqliteCatalogStore {
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        let url = format!("sqlite:{path}?mode=rwc");
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(StoreError::Backend)?
            .pragma("busy_timeout", "5000");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(StoreError::Backend)?;
        let store = Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&self.pool)
            .await?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                item_id   TEXT PRIMARY KEY,
                nome      TEXT NOT NULL,
                categoria TEXT,
                cor       TEXT,
                padrao    TEXT,
                material  TEXT,
                estilo    TEXT,
                ocasion   TEXT,
                clima     TEXT,
                paleta    TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn upsert_row(&self, item: &Item) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO items (
                item_id, nome, categoria, cor, padrao, material, estilo, ocasion, clima, paleta
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.item_id)
        .bind(&item.nome)
        .bind(item.categoria.to_string())
        .bind(item.cor.to_string())
        .bind(item.padrao.to_string())
        .bind(item.material.map(|m| m.to_string()))
        .bind(item.estilo.to_string())
        .bind(item.ocasion.to_string())
        .bind(item.clima.to_string())
        .bind(paleta_string(item.paleta))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn paleta_string(p: Paleta) -> String {
    p.to_string()
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn load_all(&self) -> Result<Vec<Item>, StoreError> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            r#"
            SELECT item_id, nome, categoria, cor, padrao, material, estilo, ocasion, clima, paleta
            FROM items
            ORDER BY item_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let item_id = row.item_id.clone();
                let item = row_to_item(row);
                if item.is_none() {
                    tracing::warn!(item_id, "descartando linha de catálogo corrompida");
                }
                item
            })
            .collect())
    }

    /// Upsert por `item_id`, senão por `(nome, categoria)`, senão insere como
    /// novo. Gera `item_id` quando ausente.
    ///
    /// The id-check, dedup-by-`(nome, categoria)`, then insert-or-replace
    /// sequence below spans multiple statements and `await` points, so it
    /// holds `write_lock` for its whole duration rather than per statement.
    async fn add(&self, mut item: Item) -> Result<Item, StoreError> {
        let _guard = self.write_lock.lock().await;

        if item.item_id.is_empty() {
            item.item_id = gen_item_id(&item.categoria.to_string());
        }

        if self.get(&item.item_id).await?.is_some() {
            self.upsert_row(&item).await?;
            return Ok(item);
        }

        let all = self.load_all().await?;
        let (nm, cat) = item.dedup_key();
        if let Some(existing) = all.iter().find(|it| it.dedup_key() == (nm.clone(), cat.clone())) {
            item.item_id = existing.item_id.clone();
            self.upsert_row(&item).await?;
            return Ok(item);
        }

        self.upsert_row(&item).await?;
        Ok(item)
    }

    async fn get(&self, item_id: &str) -> Result<Option<Item>, StoreError> {
        let row: Option<ItemRow> = sqlx::query_as(
            r#"
            SELECT item_id, nome, categoria, cor, padrao, material, estilo, ocasion, clima, paleta
            FROM items WHERE item_id = ?
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(row_to_item))
    }

    async fn delete(&self, item_id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let result = sqlx::query("DELETE FROM items WHERE item_id = ?")
            .bind(item_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Item>, StoreError> {
        let q = norm_name(query);
        let all = self.load_all().await?;
        if q.is_empty() {
            return Ok(all.into_iter().take(limit).collect());
        }

        let mut out = Vec::new();
        for item in all {
            let hay = [
                item.nome.clone(),
                item.categoria.to_string(),
                item.cor.to_string(),
                item.material.map(|m| m.to_string()).unwrap_or_default(),
                item.estilo.to_string(),
                item.ocasion.to_string(),
                item.clima.to_string(),
                item.padrao.to_string(),
            ]
            .join(" ")
            .to_lowercase();

            if hay.contains(&q) {
                out.push(item);
            }
            if out.len() >= limit {
                break;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::RawItem;
    use crate::normalize::normalize;

    async fn store() -> SqliteCatalogStore {
        SqliteCatalogStore::open(":memory:").await.unwrap()
    }

    fn raw(nome: &str, categoria: &str, cor: &str) -> RawItem {
        RawItem {
            item_id: None,
            nome: nome.to_string(),
            categoria: categoria.to_string(),
            cor: cor.to_string(),
            padrao: None,
            material: None,
            estilo: None,
            ocasion: None,
            clima: None,
        }
    }

    #[tokio::test]
    async fn add_generates_id_and_round_trips() {
        let s = store().await;
        let item = normalize(raw("saia azul", "saia", "azul")).unwrap();
        let saved = s.add(item).await.unwrap();
        assert!(!saved.item_id.is_empty());
        assert!(saved.item_id.starts_with("saia_"));

        let fetched = s.get(&saved.item_id).await.unwrap().unwrap();
        assert_eq!(fetched, saved);
    }

    #[tokio::test]
    async fn add_upserts_by_name_and_category() {
        let s = store().await;
        let first = normalize(raw("saia azul", "saia", "azul")).unwrap();
        let saved1 = s.add(first).await.unwrap();

        let mut second = normalize(raw("saia azul", "saia", "verde")).unwrap();
        second.item_id = String::new();
        let saved2 = s.add(second).await.unwrap();

        assert_eq!(saved1.item_id, saved2.item_id);
        assert_eq!(s.load_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_item() {
        let s = store().await;
        let item = normalize(raw("saia azul", "saia", "azul")).unwrap();
        let saved = s.add(item).await.unwrap();
        assert!(s.delete(&saved.item_id).await.unwrap());
        assert!(s.get(&saved.item_id).await.unwrap().is_none());
        assert!(!s.delete(&saved.item_id).await.unwrap());
    }

    #[tokio::test]
    async fn search_matches_substring_case_insensitive() {
        let s = store().await;
        s.add(normalize(raw("saia azul", "saia", "azul")).unwrap())
            .await
            .unwrap();
        s.add(normalize(raw("blusa branca", "blusa", "branco")).unwrap())
            .await
            .unwrap();

        let results = s.search("AZUL", 200).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].nome, "saia azul");
    }

    #[tokio::test]
    async fn empty_database_yields_empty_catalog() {
        let s = store().await;
        assert!(s.load_all().await.unwrap().is_empty());
    }
}
