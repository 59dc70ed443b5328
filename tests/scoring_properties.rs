//! Property-based tests for the invariants spec.md §8 lists for `score_pair`
//! and `normalize`: symmetry, self-exclusion, range, and idempotence.

use look_kg::item::RawItem;
use look_kg::normalize::normalize;
use look_kg::score::score_pair;
use look_kg::vocab::{Categoria, Clima, Cor, Estilo, Material, Ocasion, Padrao};
use proptest::prelude::*;

fn categoria_strategy() -> impl Strategy<Value = Categoria> {
    prop::sample::select(Categoria::ALL.to_vec())
}

fn cor_strategy() -> impl Strategy<Value = Cor> {
    prop::sample::select(Cor::ALL.to_vec())
}

fn padrao_strategy() -> impl Strategy<Value = Padrao> {
    prop::sample::select(Padrao::ALL.to_vec())
}

fn estilo_strategy() -> impl Strategy<Value = Estilo> {
    prop::sample::select(Estilo::ALL.to_vec())
}

fn ocasion_strategy() -> impl Strategy<Value = Ocasion> {
    prop::sample::select(Ocasion::ALL.to_vec())
}

fn clima_strategy() -> impl Strategy<Value = Clima> {
    prop::sample::select(Clima::ALL.to_vec())
}

fn material_strategy() -> impl Strategy<Value = Option<Material>> {
    prop::option::of(prop::sample::select(Material::ALL.to_vec()))
}

fn raw_item_strategy() -> impl Strategy<Value = RawItem> {
    (
        categoria_strategy(),
        cor_strategy(),
        padrao_strategy(),
        estilo_strategy(),
        ocasion_strategy(),
        clima_strategy(),
        material_strategy(),
        1usize..=3,
    )
        .prop_map(|(categoria, cor, padrao, estilo, ocasion, clima, material, name_idx)| {
            let nome = format!("item {name_idx}");
            RawItem {
                item_id: None,
                nome,
                categoria: categoria.to_string(),
                cor: cor.to_string(),
                padrao: Some(padrao.to_string()),
                material: material.map(|m| m.to_string()),
                estilo: Some(estilo.to_string()),
                ocasion: Some(ocasion.to_string()),
                clima: Some(clima.to_string()),
            }
        })
}

proptest! {
    /// Invariant 1 (spec.md §8): `score_pair(a, b) == score_pair(b, a)`.
    #[test]
    fn score_pair_is_symmetric(a in raw_item_strategy(), b in raw_item_strategy()) {
        let ia = normalize(a).unwrap();
        let ib = normalize(b).unwrap();
        prop_assert_eq!(score_pair(&ia, &ib).score, score_pair(&ib, &ia).score);
    }

    /// Invariant 2: an item never scores against itself.
    #[test]
    fn score_pair_self_is_zero(a in raw_item_strategy()) {
        let ia = normalize(a).unwrap();
        prop_assert_eq!(score_pair(&ia, &ia).score, 0.0);
    }

    /// Invariant 3: every pairwise score lies in `[0, 1]`.
    #[test]
    fn score_pair_is_in_range(a in raw_item_strategy(), b in raw_item_strategy()) {
        let ia = normalize(a).unwrap();
        let ib = normalize(b).unwrap();
        let s = score_pair(&ia, &ib).score;
        prop_assert!((0.0..=1.0).contains(&s));
    }

    /// Invariant 4: `normalize` is idempotent once round-tripped through
    /// `RawItem`.
    #[test]
    fn normalize_is_idempotent(a in raw_item_strategy()) {
        let once = normalize(a).unwrap();
        let reraw: RawItem = (&once).into();
        let twice = normalize(reraw).unwrap();
        prop_assert_eq!(once, twice);
    }
}
