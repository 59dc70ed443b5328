//! C5 — the recommendation service tying scoring, the graph and the store
//! together.
//!
//! Transcribed rule-for-rule from
//! `original_source/look-kg/application/services.py`'s `RecommendationService`:
//! `suggest_complements` ranks every graph candidate whose category/role is
//! still free by its bottleneck score against the current selection;
//! `complete_look` does the same per target category, greedily appending the
//! single best pick to the working context before moving to the next target.
//! The graph lives behind a lock the way the teacher's `Database` is a
//! clonable handle shared across tasks (`storage/schema.rs`); scoring and
//! normalization above this module need no synchronization at all.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tokio::sync::RwLock;

use crate::graph::{GraphManager, GraphStats};
use crate::item::{Item, RawItem};
use crate::normalize::normalize;
use crate::score::{constraint_multiplier, is_singleton_category, score_bottleneck, Reason};
use crate::store::{CatalogStore, StoreError};
use crate::vocab::{role, Categoria, ValidationError};

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("item não encontrado: {0}")]
    NotFound(String),

    #[error("operação cancelada")]
    Cancelled,

    /// An invariant the caller cannot repair by retrying with different
    /// input — e.g. a scored candidate vanishing from the pool it was drawn
    /// from. Always logged via `tracing::error!` before being returned.
    #[error("erro interno: {0}")]
    Internal(String),
}

/// A scored candidate, as returned by `suggest_complements`/`complete_look`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplementResult {
    pub item_id: String,
    pub nome: String,
    pub categoria: Categoria,
    pub score: f64,
    pub rationale: Vec<Reason>,
}

/// A target category `complete_look` could not fill, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingTarget {
    pub categoria: Categoria,
    pub reason: MissingReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingReason {
    RoleOccupied,
    NoCandidate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompleteLookResult {
    pub targets: HashMap<Categoria, Vec<ComplementResult>>,
    pub missing: Vec<MissingTarget>,
}

fn present_categories(ctx: &[Item]) -> HashSet<Categoria> {
    ctx.iter().map(|i| i.categoria).collect()
}

fn present_roles(ctx: &[Item]) -> HashSet<crate::vocab::Role> {
    ctx.iter().filter_map(|i| role(i.categoria)).collect()
}

/// `_category_allowed` — spec.md §4.4/§5: no repeated category, no repeated
/// singleton role.
pub fn category_allowed(ctx: &[Item], cat: Categoria) -> bool {
    if present_categories(ctx).contains(&cat) {
        return false;
    }
    if is_singleton_category(cat) {
        if let Some(r) = role(cat) {
            if present_roles(ctx).contains(&r) {
                return false;
            }
        }
    }
    true
}

/// A cancellation check an async caller can thread through long-running
/// graph scans. `Some(check)` returning `true` aborts the operation with
/// [`RecommendError::Cancelled`]; `None` means "run to completion."
pub type CancelCheck<'a> = Option<&'a (dyn Fn() -> bool + Send + Sync)>;

fn check_cancelled(check: CancelCheck<'_>) -> Result<(), RecommendError> {
    if let Some(f) = check {
        if f() {
            return Err(RecommendError::Cancelled);
        }
    }
    Ok(())
}

pub struct Recommender<S: CatalogStore> {
    store: S,
    graph: RwLock<GraphManager>,
}

impl<S: CatalogStore> Recommender<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            graph: RwLock::new(GraphManager::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the full catalog and rebuilds the in-memory graph from scratch.
    pub async fn rebuild_graph(&self) -> Result<GraphStats, RecommendError> {
        tracing::info!("rebuild_graph: carregando catálogo completo");
        let items = self.store.load_all().await.map_err(|e| {
            tracing::error!(error = %e, "rebuild_graph: falha ao carregar catálogo");
            e
        })?;
        let mut graph = self.graph.write().await;
        let stats = graph.rebuild(&items);
        tracing::info!(
            nodes = stats.nodes,
            edges = stats.edges,
            "rebuild_graph: grafo reconstruído"
        );
        Ok(stats)
    }

    /// Normalizes, upserts into the store, then updates the graph in place.
    pub async fn upsert_item_and_generate_edges(
        &self,
        raw: RawItem,
    ) -> Result<Item, RecommendError> {
        let normalized = normalize(raw)?;
        tracing::debug!(nome = %normalized.nome, categoria = %normalized.categoria, "upsert_item_and_generate_edges: item normalizado");
        let saved = self.store.add(normalized).await.map_err(|e| {
            tracing::error!(error = %e, "upsert_item_and_generate_edges: falha ao gravar no store");
            e
        })?;
        let all_items = self.store.load_all().await.map_err(|e| {
            tracing::error!(error = %e, "upsert_item_and_generate_edges: falha ao recarregar catálogo");
            e
        })?;
        let mut graph = self.graph.write().await;
        graph.upsert(&saved, &all_items);
        tracing::info!(item_id = %saved.item_id, "upsert_item_and_generate_edges: item upsertado");
        Ok(saved)
    }

    pub async fn delete_item(&self, item_id: &str) -> Result<bool, RecommendError> {
        let deleted = self.store.delete(item_id).await.map_err(|e| {
            tracing::error!(error = %e, item_id, "delete_item: falha ao deletar do store");
            e
        })?;
        if deleted {
            let mut graph = self.graph.write().await;
            graph.delete(item_id);
            tracing::info!(item_id, "delete_item: item removido do catálogo e do grafo");
        } else {
            tracing::debug!(item_id, "delete_item: item inexistente, nada removido");
        }
        Ok(deleted)
    }

    /// `suggest_complements` — spec.md §5/§6: rank every candidate whose
    /// category and role are still free by its bottleneck score against
    /// `selected`, apply `constraints`, keep those `>= threshold`, return the
    /// top `top_k` by descending score.
    pub async fn suggest_complements(
        &self,
        selected: &[Item],
        top_k: usize,
        threshold: f64,
        constraints: &HashMap<String, String>,
        cancel: CancelCheck<'_>,
    ) -> Result<Vec<ComplementResult>, RecommendError> {
        check_cancelled(cancel)?;

        let exclude: HashSet<String> = selected.iter().map(|i| i.item_id.clone()).collect();
        let graph = self.graph.read().await;
        let candidates: Vec<Item> = graph
            .all_candidates(&exclude)
            .into_iter()
            .filter(|c| category_allowed(selected, c.categoria))
            .collect();
        drop(graph);

        let mut results = Vec::new();
        for candidate in &candidates {
            check_cancelled(cancel)?;
            let bottleneck = score_bottleneck(selected, candidate);
            let score = bottleneck.score * constraint_multiplier(candidate, constraints);
            if score >= threshold {
                results.push(ComplementResult {
                    item_id: candidate.item_id.clone(),
                    nome: candidate.nome.clone(),
                    categoria: candidate.categoria,
                    score,
                    rationale: bottleneck.rationale,
                });
            }
        }

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
        results.truncate(top_k);
        Ok(results)
    }

    /// `complete_look` — spec.md §5/§6: for each target category, in order,
    /// pick the single best-scoring candidate of that category and append it
    /// to the working context before moving to the next target. Targets that
    /// are already occupied (same category/singleton role) or for which no
    /// positively-scoring candidate exists are reported in `missing`.
    pub async fn complete_look(
        &self,
        selected: &[Item],
        targets: &[Categoria],
        top_k: usize,
        cancel: CancelCheck<'_>,
    ) -> Result<CompleteLookResult, RecommendError> {
        check_cancelled(cancel)?;

        let mut ctx: Vec<Item> = selected.to_vec();
        let mut out = HashMap::new();
        let mut missing = Vec::new();

        let graph = self.graph.read().await;
        let all_candidates = graph.all_candidates(&HashSet::new());
        drop(graph);

        for &target in targets {
            check_cancelled(cancel)?;

            if !category_allowed(&ctx, target) {
                missing.push(MissingTarget {
                    categoria: target,
                    reason: MissingReason::RoleOccupied,
                });
                continue;
            }

            let pool: Vec<&Item> = all_candidates
                .iter()
                .filter(|c| c.categoria == target && category_allowed(&ctx, c.categoria))
                .collect();

            let mut scored: Vec<ComplementResult> = pool
                .into_iter()
                .map(|c| {
                    let bottleneck = score_bottleneck(&ctx, c);
                    ComplementResult {
                        item_id: c.item_id.clone(),
                        nome: c.nome.clone(),
                        categoria: c.categoria,
                        score: bottleneck.score,
                        rationale: bottleneck.rationale,
                    }
                })
                .collect();
            scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());

            match scored.first() {
                Some(best) if best.score > 0.0 => {
                    let chosen_item = all_candidates
                        .iter()
                        .find(|c| c.item_id == best.item_id)
                        .cloned()
                        .ok_or_else(|| {
                            tracing::error!(
                                item_id = %best.item_id,
                                "complete_look: candidato pontuado não encontrado no pool original"
                            );
                            RecommendError::Internal(format!(
                                "candidato {} pontuado mas ausente do pool",
                                best.item_id
                            ))
                        })?;
                    ctx.push(chosen_item);
                    scored.truncate(top_k);
                    out.insert(target, scored);
                }
                _ => missing.push(MissingTarget {
                    categoria: target,
                    reason: MissingReason::NoCandidate,
                }),
            }
        }

        Ok(CompleteLookResult {
            targets: out,
            missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::RawItem;
    use crate::store::sqlite::SqliteCatalogStore;

    async fn recommender() -> Recommender<SqliteCatalogStore> {
        let store = SqliteCatalogStore::open(":memory:").await.unwrap();
        Recommender::new(store)
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
    async fn suggest_complements_excludes_occupied_roles() {
        let r = recommender().await;
        let saia = r
            .upsert_item_and_generate_edges(raw("saia azul", "saia", "azul"))
            .await
            .unwrap();
        r.upsert_item_and_generate_edges(raw("calca preta", "calca", "preto"))
            .await
            .unwrap();
        r.upsert_item_and_generate_edges(raw("blusa branca", "blusa", "branco"))
            .await
            .unwrap();

        let results = r
            .suggest_complements(&[saia], 10, 0.0, &HashMap::new(), None)
            .await
            .unwrap();

        assert!(results.iter().all(|c| c.categoria != Categoria::Calca));
    }

    #[tokio::test]
    async fn complete_look_fills_targets_in_order() {
        let r = recommender().await;
        let saia = r
            .upsert_item_and_generate_edges(raw("saia azul", "saia", "azul"))
            .await
            .unwrap();
        r.upsert_item_and_generate_edges(raw("blusa branca", "blusa", "branco"))
            .await
            .unwrap();
        r.upsert_item_and_generate_edges(raw("sapato nude", "sapato", "nude"))
            .await
            .unwrap();

        let result = r
            .complete_look(&[saia], &[Categoria::Blusa, Categoria::Sapato], 1, None)
            .await
            .unwrap();

        assert!(result.targets.contains_key(&Categoria::Blusa));
        assert!(result.targets.contains_key(&Categoria::Sapato));
        assert!(result.missing.is_empty());
    }

    #[tokio::test]
    async fn complete_look_reports_role_conflict() {
        let r = recommender().await;
        let saia = r
            .upsert_item_and_generate_edges(raw("saia azul", "saia", "azul"))
            .await
            .unwrap();

        let result = r
            .complete_look(&[saia], &[Categoria::Calca], 1, None)
            .await
            .unwrap();

        assert_eq!(
            result.missing,
            vec![MissingTarget {
                categoria: Categoria::Calca,
                reason: MissingReason::RoleOccupied,
            }]
        );
    }
}
