//! The concrete, enum-typed record a `RawItem` normalizes into.
//!
//! spec.md §9 flags "dynamic dicts for items" as worth redesigning: the
//! original system passes items around as loose string-keyed maps. Here an
//! item is a real struct with enum fields, so a typo in `cor` or `categoria`
//! is a compile error or a rejected `ValidationError`, never a silent no-op
//! downstream.

use serde::{Deserialize, Serialize};

use crate::vocab::{Categoria, Clima, Cor, Estilo, Material, Ocasion, Padrao, Paleta};

/// A single cataloged garment or accessory, already normalized and valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: String,
    pub nome: String,
    pub categoria: Categoria,
    pub cor: Cor,
    pub padrao: Padrao,
    pub material: Option<Material>,
    pub estilo: Estilo,
    pub ocasion: Ocasion,
    pub clima: Clima,
    pub paleta: Paleta,
}

impl Item {
    /// `(nome, categoria)` lowercased, the key `store::CatalogStore::add`
    /// deduplicates on when `item_id` is absent.
    pub fn dedup_key(&self) -> (String, String) {
        (self.nome.to_lowercase(), self.categoria.to_string())
    }
}

/// Boundary-facing record: everything optional except `nome`/`categoria`/`cor`,
/// matching `ItemCreate` in spec.md §6. `normalize::normalize` turns this into
/// an [`Item`] or rejects it with a [`crate::vocab::ValidationError`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub item_id: Option<String>,
    pub nome: String,
    pub categoria: String,
    pub cor: String,
    #[serde(default)]
    pub padrao: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub estilo: Option<String>,
    #[serde(default)]
    pub ocasion: Option<String>,
    #[serde(default)]
    pub clima: Option<String>,
}

impl From<&Item> for RawItem {
    /// Round-trips a normalized item back into boundary shape using each
    /// field's canonical `Display` form — used by the idempotence property
    /// test (`normalize(normalize(x).to_raw()) == normalize(x)`).
    fn from(item: &Item) -> Self {
        RawItem {
            item_id: Some(item.item_id.clone()),
            nome: item.nome.clone(),
            categoria: item.categoria.to_string(),
            cor: item.cor.to_string(),
            padrao: Some(item.padrao.to_string()),
            material: item.material.map(|m| m.to_string()),
            estilo: Some(item.estilo.to_string()),
            ocasion: Some(item.ocasion.to_string()),
            clima: Some(item.clima.to_string()),
        }
    }
}
