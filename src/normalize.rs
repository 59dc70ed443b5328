//! C2 — normalize a [`RawItem`] into a validated [`Item`].
//!
//! `normalize` is pure: it allocates a fresh `Item`, touches no shared state,
//! and is idempotent (`normalize(normalize(x).into()) == normalize(x)`, see
//! `tests/scoring_properties.rs`).

use std::str::FromStr;

use crate::item::{Item, RawItem};
use crate::vocab::{self, Categoria, Clima, Cor, Estilo, Material, Ocasion, Padrao, ValidationError};

const DEFAULT_PADRAO: &str = "liso";
const DEFAULT_ESTILO: &str = "classico";
const DEFAULT_OCASION: &str = "casual";
const DEFAULT_CLIMA: &str = "quente";

fn clean(s: &str) -> String {
    s.trim().to_lowercase()
}

fn clean_or_default(s: Option<&str>, default: &str) -> String {
    match s.map(clean) {
        Some(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}

/// Steps 1–5 of spec.md §4.2, in an order that yields the same result as any
/// other legal ordering: trim/lowercase, synonym-canonicalize, default, parse
/// and validate each enum field, then derive `paleta`.
pub fn normalize(raw: RawItem) -> Result<Item, ValidationError> {
    let nome = clean(&raw.nome);
    if nome.is_empty() {
        return Err(ValidationError::new("nome", ""));
    }

    let categoria = Categoria::from_str(&clean(&raw.categoria))?;
    let cor = Cor::from_str(&clean(&raw.cor))?;
    let padrao = Padrao::from_str(&clean_or_default(raw.padrao.as_deref(), DEFAULT_PADRAO))?;
    let estilo = Estilo::from_str(&clean_or_default(raw.estilo.as_deref(), DEFAULT_ESTILO))?;
    let ocasion = Ocasion::from_str(&clean_or_default(raw.ocasion.as_deref(), DEFAULT_OCASION))?;
    let clima = Clima::from_str(&clean_or_default(raw.clima.as_deref(), DEFAULT_CLIMA))?;

    let material = match raw.material.as_deref().map(clean) {
        Some(v) if !v.is_empty() => Some(Material::from_str(&v)?),
        _ => None,
    };

    let paleta = vocab::palette(cor);
    let item_id = raw.item_id.as_deref().map(clean).unwrap_or_default();

    Ok(Item {
        item_id,
        nome,
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

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(categoria: &str, cor: &str) -> RawItem {
        RawItem {
            item_id: None,
            nome: "  Saia Azul  ".to_string(),
            categoria: categoria.to_string(),
            cor: cor.to_string(),
            padrao: None,
            material: None,
            estilo: None,
            ocasion: None,
            clima: None,
        }
    }

    #[test]
    fn applies_defaults_and_lowercases() {
        let item = normalize(raw("saia", "azul")).unwrap();
        assert_eq!(item.nome, "saia azul");
        assert_eq!(item.padrao, Padrao::Liso);
        assert_eq!(item.estilo, Estilo::Classico);
        assert_eq!(item.ocasion, Ocasion::Casual);
        assert_eq!(item.clima, Clima::Quente);
    }

    #[test]
    fn resolves_synonyms() {
        let item = normalize(raw("calça", "beige")).unwrap();
        assert_eq!(item.categoria, Categoria::Calca);
        assert_eq!(item.cor, Cor::Bege);
    }

    #[test]
    fn derives_paleta_from_cor() {
        let item = normalize(raw("saia", "azul")).unwrap();
        assert_eq!(item.paleta, vocab::Paleta::Fria);
    }

    #[test]
    fn rejects_out_of_domain_categoria() {
        let err = normalize(raw("vestido", "azul")).unwrap_err();
        assert_eq!(err.field, "categoria");
        assert!(err.to_string().starts_with("categoria inválida"));
    }

    #[test]
    fn rejects_unknown_material() {
        let mut r = raw("saia", "azul");
        r.material = Some("ouro".to_string());
        let err = normalize(r).unwrap_err();
        assert_eq!(err.field, "material");
    }

    #[test]
    fn is_idempotent() {
        let item = normalize(raw("calça", "beige")).unwrap();
        let reraw: RawItem = (&item).into();
        let again = normalize(reraw).unwrap();
        assert_eq!(item, again);
    }
}
