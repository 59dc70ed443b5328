//! C3 — pairwise and contextual compatibility scoring.
//!
//! Everything here is a pure function: no I/O, no locking, matching spec.md
//! §5's "scoring and normalization require no synchronization." Rationale is
//! kept as a typed [`Reason`] rather than free strings (spec.md §9, REDESIGN
//! FLAGS — "Rationale propagation"), so internal code and tests can match on
//! the enum while `Display` still produces the exact Portuguese strings
//! spec.md names, for anything that needs to cross an external boundary.

use std::collections::HashMap;
use std::fmt;

use crate::item::Item;
use crate::vocab::{self, Categoria};

/// Three-tier label shared by the style/occasion/climate contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Compativel,
    Aceitavel,
    Distante,
}

impl Tier {
    fn from_raw(raw: f64) -> Self {
        if raw >= 0.7 {
            Tier::Compativel
        } else if raw >= 0.5 {
            Tier::Aceitavel
        } else {
            Tier::Distante
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tier::Compativel => "compatível",
            Tier::Aceitavel => "aceitável",
            Tier::Distante => "distante",
        };
        f.write_str(s)
    }
}

/// Rationale for a single contribution to `score_pair`, in the exact wording
/// spec.md §4.3.1 documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    MesmaCategoria,
    PapeisIncompativeis,
    MesmaCor,
    Analogas,
    Complementares,
    Triade,
    Neutro,
    BaixoContraste,
    Estilo(Tier),
    Ocasiao(Tier),
    Clima(Tier),
    MateriaisNeutros,
    MateriaisCoerentes,
    PadroesColidem,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::MesmaCategoria => f.write_str("mesma categoria"),
            Reason::PapeisIncompativeis => f.write_str("papéis incompatíveis"),
            Reason::MesmaCor => f.write_str("mesma cor"),
            Reason::Analogas => f.write_str("análogas"),
            Reason::Complementares => f.write_str("complementares"),
            Reason::Triade => f.write_str("tríade"),
            Reason::Neutro => f.write_str("neutro"),
            Reason::BaixoContraste => f.write_str("baixo contraste"),
            Reason::Estilo(t) => write!(f, "estilo {t}"),
            Reason::Ocasiao(t) => write!(f, "ocasião {t}"),
            Reason::Clima(t) => write!(f, "clima {t}"),
            Reason::MateriaisNeutros => f.write_str("materiais neutros"),
            Reason::MateriaisCoerentes => f.write_str("materiais coerentes"),
            Reason::PadroesColidem => f.write_str("padrões colidem"),
        }
    }
}

/// Result of `score_pair`/`score_bottleneck`: a score in `[0, 1]` plus the
/// ordered, first-seen-deduplicated rationale that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct PairScore {
    pub score: f64,
    pub rationale: Vec<Reason>,
}

fn color_contribution(a: &Item, b: &Item) -> (f64, Reason) {
    if a.cor == b.cor {
        return (0.6, Reason::MesmaCor);
    }
    if vocab::analogous(a.cor).contains(&b.cor) || vocab::analogous(b.cor).contains(&a.cor) {
        return (0.45, Reason::Analogas);
    }
    if vocab::complementary(a.cor) == Some(b.cor) || vocab::complementary(b.cor) == Some(a.cor) {
        return (0.5, Reason::Complementares);
    }
    if vocab::same_triad(a.cor, b.cor) {
        return (0.35, Reason::Triade);
    }
    if vocab::is_neutral(a.cor) || vocab::is_neutral(b.cor) {
        return (0.4, Reason::Neutro);
    }
    (0.2, Reason::BaixoContraste)
}

/// `score_pair(a, b) -> (score, rationale)` — spec.md §4.3.1.
pub fn score_pair(a: &Item, b: &Item) -> PairScore {
    if a.categoria == b.categoria {
        return PairScore {
            score: 0.0,
            rationale: vec![Reason::MesmaCategoria],
        };
    }
    if vocab::role_incompatible(a.categoria, b.categoria) {
        return PairScore {
            score: 0.0,
            rationale: vec![Reason::PapeisIncompativeis],
        };
    }

    let mut sum = 0.0;
    let mut rationale = Vec::with_capacity(6);

    let (color_raw, color_reason) = color_contribution(a, b);
    sum += color_raw;
    rationale.push(color_reason);

    let style_raw = vocab::style_matrix(a.estilo, b.estilo);
    sum += style_raw * 0.3;
    rationale.push(Reason::Estilo(Tier::from_raw(style_raw)));

    let occ_raw = vocab::occasion_matrix(a.ocasion, b.ocasion);
    sum += occ_raw * 0.3;
    rationale.push(Reason::Ocasiao(Tier::from_raw(occ_raw)));

    let climate_raw = vocab::climate_matrix(a.clima, b.clima);
    sum += climate_raw * 0.3;
    rationale.push(Reason::Clima(Tier::from_raw(climate_raw)));

    match (a.material, b.material) {
        (Some(ma), Some(mb)) => {
            let raw = vocab::material_matrix(vocab::material_group(ma), vocab::material_group(mb));
            sum += raw * 0.25;
            rationale.push(Reason::MateriaisCoerentes);
        }
        _ => {
            sum += 0.05;
            rationale.push(Reason::MateriaisNeutros);
        }
    }

    let pattern_penalty = vocab::pattern_matrix(a.padrao, b.padrao);
    sum += pattern_penalty;
    if pattern_penalty < 0.0 {
        rationale.push(Reason::PadroesColidem);
    }

    PairScore {
        score: sum.clamp(0.0, 1.0),
        rationale,
    }
}

/// `score_bottleneck(ctx, c) -> (score, rationale)` — spec.md §4.3.2. Empty
/// context scores `0` with no rationale; otherwise the candidate's weakest
/// link against the context, with the de-duplicated union of every
/// context pair's rationale, first-seen order preserved.
pub fn score_bottleneck(ctx: &[Item], c: &Item) -> PairScore {
    if ctx.is_empty() {
        return PairScore {
            score: 0.0,
            rationale: Vec::new(),
        };
    }

    let mut min_score = f64::INFINITY;
    let mut rationale = Vec::new();

    for ctx_item in ctx {
        let pair = score_pair(ctx_item, c);
        min_score = min_score.min(pair.score);
        for reason in pair.rationale {
            if !rationale.contains(&reason) {
                rationale.push(reason);
            }
        }
    }

    PairScore {
        score: min_score,
        rationale,
    }
}

/// `constraint_multiplier(c, constraints) -> float` — spec.md §4.3.3. `1.05`
/// per recognized key (`ocasion`, `clima`) whose value matches the
/// candidate's attribute; unknown keys are ignored.
pub fn constraint_multiplier(c: &Item, constraints: &HashMap<String, String>) -> f64 {
    let mut multiplier = 1.0;

    if let Some(v) = constraints.get("ocasion") {
        if v.trim().to_lowercase() == c.ocasion.to_string() {
            multiplier *= 1.05;
        }
    }
    if let Some(v) = constraints.get("clima") {
        if v.trim().to_lowercase() == c.clima.to_string() {
            multiplier *= 1.05;
        }
    }

    multiplier
}

/// `category_allowed`/`complete_look` need to know whether a category is a
/// singleton role without depending on `recommend` — exposed here so both
/// `recommend` and external callers can query role admission rules over raw
/// categories without touching the graph.
pub fn is_singleton_category(categoria: Categoria) -> bool {
    vocab::role(categoria)
        .map(|r| vocab::SINGLETON_ROLES.contains(&r))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::item::RawItem;

    fn item(nome: &str, categoria: &str, cor: &str, estilo: &str, material: &str) -> Item {
        normalize(RawItem {
            item_id: None,
            nome: nome.to_string(),
            categoria: categoria.to_string(),
            cor: cor.to_string(),
            padrao: None,
            material: Some(material.to_string()),
            estilo: Some(estilo.to_string()),
            ocasion: None,
            clima: None,
        })
        .unwrap()
    }

    #[test]
    fn same_categoria_is_rejected() {
        let a = item("saia azul", "saia", "azul", "classico", "jeans");
        let b = item("saia verde", "saia", "verde", "classico", "jeans");
        let result = score_pair(&a, &b);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.rationale, vec![Reason::MesmaCategoria]);
    }

    #[test]
    fn self_score_is_zero() {
        let a = item("saia azul", "saia", "azul", "classico", "jeans");
        assert_eq!(score_pair(&a, &a).score, 0.0);
    }

    #[test]
    fn score_is_symmetric() {
        let a = item("saia azul", "saia", "azul", "classico", "jeans");
        let b = item("blusa branca", "blusa", "branco", "classico", "algodao");
        assert_eq!(score_pair(&a, &b).score, score_pair(&b, &a).score);
    }

    #[test]
    fn e4_skirt_and_blouse() {
        let saia = item("saia azul", "saia", "azul", "classico", "jeans");
        let blusa = item("blusa branca", "blusa", "branco", "classico", "algodao");
        let result = score_pair(&saia, &blusa);
        assert!(result.score > 0.0);
        assert!(result.rationale.contains(&Reason::Neutro));
        assert!(result.rationale.contains(&Reason::Estilo(Tier::Compativel)));
    }

    #[test]
    fn bottleneck_is_empty_for_empty_context() {
        let c = item("saia azul", "saia", "azul", "classico", "jeans");
        let result = score_bottleneck(&[], &c);
        assert_eq!(result.score, 0.0);
        assert!(result.rationale.is_empty());
    }

    #[test]
    fn bottleneck_takes_the_minimum() {
        let saia = item("saia azul", "saia", "azul", "classico", "jeans");
        let blusa = item("blusa branca", "blusa", "branco", "classico", "algodao");
        let ctx = vec![saia.clone(), blusa];
        let candidate = item("sapato nude", "sapato", "nude", "classico", "couro");
        let result = score_bottleneck(&ctx, &candidate);
        let direct: Vec<f64> = ctx.iter().map(|i| score_pair(i, &candidate).score).collect();
        assert_eq!(result.score, direct.iter().cloned().fold(f64::INFINITY, f64::min));
    }

    #[test]
    fn constraint_multiplier_matches_k_matches() {
        let candidate = item("sapato nude", "sapato", "nude", "classico", "couro");
        let mut constraints = HashMap::new();
        constraints.insert("ocasion".to_string(), "casual".to_string());
        constraints.insert("clima".to_string(), "quente".to_string());
        let m = constraint_multiplier(&candidate, &constraints);
        assert!((m - 1.05f64.powi(2)).abs() < 1e-9);
    }

    #[test]
    fn constraint_multiplier_ignores_unknown_keys() {
        let candidate = item("sapato nude", "sapato", "nude", "classico", "couro");
        let mut constraints = HashMap::new();
        constraints.insert("cor".to_string(), "nude".to_string());
        assert_eq!(constraint_multiplier(&candidate, &constraints), 1.0);
    }
}
