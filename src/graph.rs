//! C4 — the undirected weighted graph of catalog items.
//!
//! Grounded on `original_source/look-kg/infrastructure/graph/networkx_repo.py`:
//! `rebuild` wipes and re-scans every pair, `upsert` only rescans the changed
//! item against the rest of the catalog, `delete` drops incident edges. Here
//! the graph is a pair of hash maps rather than a `networkx`-style generic
//! graph library — the operations spec.md §4.4 needs (rebuild, upsert,
//! delete, neighbors, enumerate) don't call for traversal algorithms, so a
//! small hand-rolled adjacency structure is the idiomatic choice, the way the
//! teacher favors a narrow hand-rolled type over a heavyweight dependency for
//! a narrow need.

use std::collections::{HashMap, HashSet};

use crate::item::Item;
use crate::score::score_pair;

/// Node/edge counts returned by every mutating graph operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
}

fn edge_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// An undirected weighted graph over catalog items, keyed by `item_id`.
#[derive(Debug, Default)]
pub struct GraphManager {
    nodes: HashMap<String, Item>,
    edges: HashMap<(String, String), f64>,
}

impl GraphManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn stats(&self) -> GraphStats {
        GraphStats {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
        }
    }

    /// Discards the graph and re-scans every unordered pair of `items`.
    pub fn rebuild(&mut self, items: &[Item]) -> GraphStats {
        self.nodes.clear();
        self.edges.clear();

        for item in items {
            self.nodes.insert(item.item_id.clone(), item.clone());
        }
        for i in 0..items.len() {
            for j in (i + 1)..items.len() {
                let score = score_pair(&items[i], &items[j]).score;
                if score > 0.0 {
                    self.edges
                        .insert(edge_key(&items[i].item_id, &items[j].item_id), score);
                }
            }
        }

        self.stats()
    }

    /// Inserts/replaces the node for `item` and re-scans it against every
    /// other item in `items`; delegates to [`Self::rebuild`] when the graph
    /// is empty, per spec.md §4.4.
    pub fn upsert(&mut self, item: &Item, items: &[Item]) -> GraphStats {
        if self.nodes.is_empty() {
            return self.rebuild(items);
        }

        self.nodes.insert(item.item_id.clone(), item.clone());

        for other in items {
            if other.item_id == item.item_id {
                continue;
            }
            let key = edge_key(&item.item_id, &other.item_id);
            let score = score_pair(item, other).score;
            if score > 0.0 {
                self.edges.insert(key, score);
            } else {
                self.edges.remove(&key);
            }
        }

        self.stats()
    }

    /// Removes the node and all incident edges for `item_id`, if present.
    pub fn delete(&mut self, item_id: &str) -> bool {
        let existed = self.nodes.remove(item_id).is_some();
        if existed {
            self.edges.retain(|(a, b), _| a != item_id && b != item_id);
        }
        existed
    }

    /// The degree of `item_id` — used by callers that want to report how
    /// many edges a deletion will drop.
    pub fn degree(&self, item_id: &str) -> usize {
        self.edges
            .keys()
            .filter(|(a, b)| a == item_id || b == item_id)
            .count()
    }

    /// Neighbor item data for `item_id`; empty if absent from the graph.
    pub fn neighbors(&self, item_id: &str) -> Vec<Item> {
        self.edges
            .keys()
            .filter_map(|(a, b)| {
                if a == item_id {
                    Some(b.as_str())
                } else if b == item_id {
                    Some(a.as_str())
                } else {
                    None
                }
            })
            .filter_map(|nid| self.nodes.get(nid).cloned())
            .collect()
    }

    /// Every node not in `exclude`.
    pub fn all_candidates(&self, exclude: &HashSet<String>) -> Vec<Item> {
        self.nodes
            .values()
            .filter(|item| !exclude.contains(&item.item_id))
            .cloned()
            .collect()
    }

    pub fn stats_snapshot(&self) -> GraphStats {
        self.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::RawItem;
    use crate::normalize::normalize;

    fn item(nome: &str, item_id: &str, categoria: &str, cor: &str) -> Item {
        let mut it = normalize(RawItem {
            item_id: Some(item_id.to_string()),
            nome: nome.to_string(),
            categoria: categoria.to_string(),
            cor: cor.to_string(),
            padrao: None,
            material: None,
            estilo: None,
            ocasion: None,
            clima: None,
        })
        .unwrap();
        it.item_id = item_id.to_string();
        it
    }

    #[test]
    fn rebuild_matches_score_pair_consistency() {
        let items = vec![
            item("saia azul", "s1", "saia", "azul"),
            item("blusa branca", "s2", "blusa", "branco"),
            item("sapato nude", "s3", "sapato", "nude"),
        ];
        let mut g = GraphManager::new();
        let stats = g.rebuild(&items);
        assert_eq!(stats.nodes, 3);

        for i in 0..items.len() {
            for j in (i + 1)..items.len() {
                let expect_edge = score_pair(&items[i], &items[j]).score > 0.0;
                let key = edge_key(&items[i].item_id, &items[j].item_id);
                assert_eq!(g.edges.contains_key(&key), expect_edge);
            }
        }
    }

    #[test]
    fn upsert_rescans_only_the_changed_item() {
        let mut items = vec![
            item("saia azul", "s1", "saia", "azul"),
            item("blusa branca", "s2", "blusa", "branco"),
        ];
        let mut g = GraphManager::new();
        g.rebuild(&items);

        let sapato = item("sapato nude", "s3", "sapato", "nude");
        items.push(sapato.clone());
        let stats = g.upsert(&sapato, &items);
        assert_eq!(stats.nodes, 3);
    }

    #[test]
    fn delete_removes_incident_edges() {
        let items = vec![
            item("saia azul", "s1", "saia", "azul"),
            item("blusa branca", "s2", "blusa", "branco"),
        ];
        let mut g = GraphManager::new();
        g.rebuild(&items);
        assert!(g.delete("s1"));
        assert!(g.neighbors("s2").is_empty());
        assert!(!g.delete("s1"));
    }

    #[test]
    fn no_self_edges() {
        let items = vec![item("saia azul", "s1", "saia", "azul")];
        let mut g = GraphManager::new();
        g.rebuild(&items);
        assert!(!g.edges.contains_key(&edge_key("s1", "s1")));
    }
}
