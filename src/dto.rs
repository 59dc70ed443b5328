//! Wire-shape DTOs matching spec.md §6's request/response schemas.
//!
//! HTTP routing itself is out of scope (spec.md §6 describes the shapes an
//! external adapter speaks, not a server this crate runs) — these are plain
//! serde structs an adapter can deserialize requests into and serialize
//! responses from, with `From`/`TryFrom` bridging to the typed core.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::item::{Item, RawItem};
use crate::recommend::{ComplementResult, CompleteLookResult, MissingReason, MissingTarget};
use crate::vocab::{Categoria, ValidationError};

/// `ItemCreate` — spec.md §6.
pub type ItemCreate = RawItem;

fn default_top_k_suggest() -> usize {
    10
}

fn default_top_k_complete() -> usize {
    1
}

fn default_targets() -> Vec<String> {
    vec!["sapato".to_string(), "bolsa".to_string(), "acessorio".to_string()]
}

/// `RecommendComplementarIn` — spec.md §6. Selection resolution precedence
/// (`item_id` → `itens` → `query` → first catalog item) is the caller's
/// responsibility; this type only carries the fields across the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendComplementarIn {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub itens: Option<Vec<String>>,
    #[serde(default = "default_top_k_suggest")]
    pub top_k: usize,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub constraints: HashMap<String, String>,
}

/// `RecommendCompletarIn` — spec.md §6.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendCompletarIn {
    pub itens: Vec<String>,
    #[serde(default = "default_top_k_complete")]
    pub top_k: usize,
    #[serde(default = "default_targets")]
    pub targets: Vec<String>,
}

/// A single scored result as it crosses the wire: `Reason`/`Categoria`
/// stringified via their canonical `Display`.
#[derive(Debug, Clone, Serialize)]
pub struct ComplementResultDto {
    pub item_id: String,
    pub nome: String,
    pub categoria: String,
    pub score: f64,
    pub rationale: Vec<String>,
}

impl From<&ComplementResult> for ComplementResultDto {
    fn from(r: &ComplementResult) -> Self {
        ComplementResultDto {
            item_id: r.item_id.clone(),
            nome: r.nome.clone(),
            categoria: r.categoria.to_string(),
            score: r.score,
            rationale: r.rationale.iter().map(|reason| reason.to_string()).collect(),
        }
    }
}

/// `{results: [...]}` — spec.md §6 `POST /v1/recommend/complementar`.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestComplementsOut {
    pub results: Vec<ComplementResultDto>,
}

impl SuggestComplementsOut {
    pub fn from_results(results: &[ComplementResult]) -> Self {
        Self {
            results: results.iter().map(ComplementResultDto::from).collect(),
        }
    }
}

/// `{targets: {...}, missing: [...], message?}` — spec.md §6 `POST
/// /v1/recommend/completar`.
#[derive(Debug, Clone, Serialize)]
pub struct CompleteLookOut {
    pub targets: HashMap<String, Vec<ComplementResultDto>>,
    pub missing: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn missing_reason_text(reason: MissingReason) -> &'static str {
    match reason {
        MissingReason::RoleOccupied => "já existe no look ou papel único ocupado",
        MissingReason::NoCandidate => "nenhum candidato compatível encontrado",
    }
}

impl From<&CompleteLookResult> for CompleteLookOut {
    fn from(r: &CompleteLookResult) -> Self {
        let targets = r
            .targets
            .iter()
            .map(|(cat, results)| {
                (
                    cat.to_string(),
                    results.iter().map(ComplementResultDto::from).collect(),
                )
            })
            .collect();

        let missing = r
            .missing
            .iter()
            .map(|MissingTarget { categoria, reason }| {
                format!("{categoria} ({})", missing_reason_text(*reason))
            })
            .collect();

        CompleteLookOut {
            targets,
            missing,
            message: None,
        }
    }
}

/// `{ok:true, nodes, edges}` — spec.md §6 `POST /v1/graph/rebuild`.
#[derive(Debug, Clone, Serialize)]
pub struct RebuildOut {
    pub ok: bool,
    pub nodes: usize,
    pub edges: usize,
}

/// `{item_id, item}` — spec.md §6 `POST /v1/graph/items` / `/v1/items`.
#[derive(Debug, Clone, Serialize)]
pub struct ItemCreateOut {
    pub item_id: String,
    pub item: Item,
}

/// `{detail}` — spec.md §7, the 422 validation-error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

impl From<&ValidationError> for ErrorDetail {
    fn from(e: &ValidationError) -> Self {
        ErrorDetail {
            detail: e.to_string(),
        }
    }
}

/// Parses `RecommendCompletarIn::targets`/a free category-name list into
/// `Categoria`s, surfacing the first unparseable entry as a `ValidationError`.
pub fn parse_categorias(names: &[String]) -> Result<Vec<Categoria>, ValidationError> {
    names
        .iter()
        .map(|n| Categoria::from_str(n.trim()))
        .collect()
}
