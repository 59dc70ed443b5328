//! Static vocabularies and compatibility matrices.
//!
//! Every table in this module is compile-time constant data: categories,
//! colors, the color-theory relations (analogous/complementary/triad), and
//! the style/occasion/climate/material/pattern matrices that `score::score_pair`
//! consumes. Nothing here is learned or mutated at runtime — tuning a weight
//! means editing a `match` arm, not touching the scoring or graph code.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A field value fell outside its declared domain during normalization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} inválido: {value}")]
pub struct ValidationError {
    pub field: &'static str,
    pub value: String,
}

impl ValidationError {
    pub(crate) fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

macro_rules! vocab_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $( $variant:ident => $canon:literal $(, synonyms: [$($syn:literal),* $(,)?])? );* $(;)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $variant ),*
        }

        impl $name {
            /// All variants, in declaration order — the canonical domain.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),* ];
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let s = match self {
                    $( $name::$variant => $canon ),*
                };
                f.write_str(s)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim().to_lowercase();
                match s.as_str() {
                    $(
                        $canon => Ok($name::$variant),
                        $( $($syn => Ok($name::$variant),)* )?
                    )*
                    other => Err(ValidationError::new($field, other)),
                }
            }
        }
    };
}

vocab_enum!(
    /// CATEGORIES — garment category.
    Categoria, "categoria" {
        Blusa => "blusa";
        Jaqueta => "jaqueta";
        Saia => "saia";
        Calca => "calca", synonyms: ["calça"];
        Sapato => "sapato";
        Bolsa => "bolsa";
        Acessorio => "acessorio", synonyms: ["acessório"];
    }
);

vocab_enum!(
    /// PATTERNS.
    Padrao, "padrao" {
        Liso => "liso";
        Listrado => "listrado";
        Xadrez => "xadrez";
        Poa => "poa", synonyms: ["poá"];
    }
);

vocab_enum!(
    /// STYLES.
    Estilo, "estilo" {
        Classico => "classico", synonyms: ["clássico"];
        Casual => "casual";
        Esportivo => "esportivo";
        Streetwear => "streetwear";
        Formal => "formal";
        Romantico => "romantico", synonyms: ["romântico"];
    }
);

vocab_enum!(
    /// OCCASIONS.
    Ocasion, "ocasion" {
        Casual => "casual";
        Formal => "formal";
        Esportivo => "esportivo";
        Trabalho => "trabalho";
        Noite => "noite";
    }
);

vocab_enum!(
    /// CLIMATES.
    Clima, "clima" {
        Quente => "quente";
        Frio => "frio";
        MeiaEstacao => "meia-estacao", synonyms: ["meia estacao", "meia-estação"];
    }
);

vocab_enum!(
    /// COLORS (15).
    Cor, "cor" {
        Preto => "preto";
        Branco => "branco";
        Cinza => "cinza";
        Nude => "nude";
        Bege => "bege", synonyms: ["beige"];
        Marrom => "marrom";
        Azul => "azul";
        AzulEscuro => "azul-escuro", synonyms: ["azul escuro"];
        Verde => "verde";
        VerdeAgua => "verde-agua", synonyms: ["verde agua", "verde-água"];
        Ciano => "ciano";
        Vermelho => "vermelho";
        Laranja => "laranja";
        Amarelo => "amarelo";
        Rosa => "rosa";
    }
);

vocab_enum!(
    /// MATERIALS.
    Material, "material" {
        Algodao => "algodao", synonyms: ["algodão"];
        Jeans => "jeans";
        Couro => "couro";
        Seda => "seda";
        Linho => "linho";
        La => "la", synonyms: ["lã"];
        Poliester => "poliester", synonyms: ["poliéster"];
        Malha => "malha";
        Metal => "metal";
    }
);

/// Derived palette class — a pure function of `Cor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Paleta {
    Fria,
    Quente,
    Neutra,
}

impl fmt::Display for Paleta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Paleta::Fria => "fria",
            Paleta::Quente => "quente",
            Paleta::Neutra => "neutra",
        };
        f.write_str(s)
    }
}

/// Functional slot a category occupies in an outfit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Top,
    Bottom,
    Foot,
    Bag,
    Accessory,
    /// No `Categoria` maps here today; kept so the singleton-role set matches
    /// spec.md §3/§4.1 verbatim and stays ready if a one-piece category is
    /// ever added to `Categoria`.
    Onepiece,
}

/// Roles that admit at most one item per outfit.
pub const SINGLETON_ROLES: &[Role] = &[Role::Bottom, Role::Foot, Role::Bag, Role::Onepiece];

/// `ROLE(categoria) -> role`.
pub fn role(categoria: Categoria) -> Option<Role> {
    match categoria {
        Categoria::Blusa | Categoria::Jaqueta => Some(Role::Top),
        Categoria::Saia | Categoria::Calca => Some(Role::Bottom),
        Categoria::Sapato => Some(Role::Foot),
        Categoria::Bolsa => Some(Role::Bag),
        Categoria::Acessorio => Some(Role::Accessory),
    }
}

/// `role_incompatible(ca, cb)` per spec.md §4.3.1: true iff both roles are
/// known and (the same singleton role) or (both `bottom`).
pub fn role_incompatible(ca: Categoria, cb: Categoria) -> bool {
    match (role(ca), role(cb)) {
        (Some(ra), Some(rb)) => {
            (ra == rb && SINGLETON_ROLES.contains(&ra)) || (ra == Role::Bottom && rb == Role::Bottom)
        }
        _ => false,
    }
}

/// Colors considered "neutral" for the color-contribution rule.
const NEUTRALS: &[Cor] = &[
    Cor::Preto,
    Cor::Branco,
    Cor::Cinza,
    Cor::Nude,
    Cor::Bege,
    Cor::Marrom,
];

pub fn is_neutral(cor: Cor) -> bool {
    NEUTRALS.contains(&cor)
}

/// `PALETTE(color) -> {fria, quente, neutra}`, total over `Cor`.
pub fn palette(cor: Cor) -> Paleta {
    match cor {
        Cor::Preto | Cor::Branco | Cor::Cinza | Cor::Nude | Cor::Bege | Cor::Marrom => {
            Paleta::Neutra
        }
        Cor::Azul | Cor::AzulEscuro | Cor::Verde | Cor::VerdeAgua | Cor::Ciano => Paleta::Fria,
        Cor::Vermelho | Cor::Laranja | Cor::Amarelo | Cor::Rosa => Paleta::Quente,
    }
}

/// `ANALOGOUS(color) -> set of colors` — the two neighbors on the hue wheel
/// `amarelo - laranja - vermelho - rosa - azul-escuro - azul - ciano -
/// verde-agua - verde - (amarelo)`. Neutrals sit outside the wheel — their
/// analogous set is empty and they always fall through to the "neutro" rule.
pub fn analogous(cor: Cor) -> &'static [Cor] {
    match cor {
        Cor::Amarelo => &[Cor::Verde, Cor::Laranja],
        Cor::Laranja => &[Cor::Amarelo, Cor::Vermelho],
        Cor::Vermelho => &[Cor::Laranja, Cor::Rosa],
        Cor::Rosa => &[Cor::Vermelho, Cor::AzulEscuro],
        Cor::AzulEscuro => &[Cor::Rosa, Cor::Azul],
        Cor::Azul => &[Cor::AzulEscuro, Cor::Ciano],
        Cor::Ciano => &[Cor::Azul, Cor::VerdeAgua],
        Cor::VerdeAgua => &[Cor::Ciano, Cor::Verde],
        Cor::Verde => &[Cor::VerdeAgua, Cor::Amarelo],
        _ => &[],
    }
}

/// `COMPLEMENTARY(color) -> color`, partial: yellow has no complement (spec.md
/// §9 Open Questions — left undefined rather than guessed).
pub fn complementary(cor: Cor) -> Option<Cor> {
    match cor {
        Cor::Vermelho => Some(Cor::Verde),
        Cor::Verde => Some(Cor::Vermelho),
        Cor::Azul => Some(Cor::Laranja),
        Cor::Laranja => Some(Cor::Azul),
        Cor::Rosa => Some(Cor::VerdeAgua),
        Cor::VerdeAgua => Some(Cor::Rosa),
        Cor::AzulEscuro => Some(Cor::Ciano),
        Cor::Ciano => Some(Cor::AzulEscuro),
        _ => None,
    }
}

/// TRIADS — static list of 3-color sets.
pub const TRIADS: &[[Cor; 3]] = &[
    [Cor::Vermelho, Cor::Amarelo, Cor::Azul],
    [Cor::Laranja, Cor::Verde, Cor::AzulEscuro],
    [Cor::Rosa, Cor::Ciano, Cor::VerdeAgua],
];

pub fn same_triad(a: Cor, b: Cor) -> bool {
    TRIADS.iter().any(|t| t.contains(&a) && t.contains(&b))
}

/// Generic `lookup(x, y, default)` over a triangular table: both orderings
/// resolve to the same entry, matching spec.md's "weights are symmetric"
/// invariant by construction rather than by convention.
fn symmetric_lookup<T: Copy + PartialEq>(table: &[(T, T, f64)], a: T, b: T, default: f64) -> f64 {
    table
        .iter()
        .find(|(x, y, _)| (*x == a && *y == b) || (*x == b && *y == a))
        .map(|(_, _, v)| *v)
        .unwrap_or(default)
}

const STYLE_TABLE: &[(Estilo, Estilo, f64)] = &[
    (Estilo::Classico, Estilo::Classico, 1.0),
    (Estilo::Classico, Estilo::Casual, 0.8),
    (Estilo::Classico, Estilo::Esportivo, 0.5),
    (Estilo::Classico, Estilo::Streetwear, 0.5),
    (Estilo::Classico, Estilo::Formal, 0.7),
    (Estilo::Classico, Estilo::Romantico, 0.7),
    (Estilo::Casual, Estilo::Casual, 1.0),
    (Estilo::Casual, Estilo::Esportivo, 0.7),
    (Estilo::Casual, Estilo::Streetwear, 0.75),
    (Estilo::Casual, Estilo::Formal, 0.3),
    (Estilo::Casual, Estilo::Romantico, 0.55),
    (Estilo::Esportivo, Estilo::Esportivo, 1.0),
    (Estilo::Esportivo, Estilo::Streetwear, 0.6),
    (Estilo::Esportivo, Estilo::Formal, 0.15),
    (Estilo::Esportivo, Estilo::Romantico, 0.2),
    (Estilo::Streetwear, Estilo::Streetwear, 1.0),
    (Estilo::Streetwear, Estilo::Formal, 0.2),
    (Estilo::Streetwear, Estilo::Romantico, 0.35),
    (Estilo::Formal, Estilo::Formal, 1.0),
    (Estilo::Formal, Estilo::Romantico, 0.6),
    (Estilo::Romantico, Estilo::Romantico, 1.0),
];

/// `STYLE_MATRIX[a][b]`, default `0.4`.
pub fn style_matrix(a: Estilo, b: Estilo) -> f64 {
    symmetric_lookup(STYLE_TABLE, a, b, 0.4)
}

const OCC_TABLE: &[(Ocasion, Ocasion, f64)] = &[
    (Ocasion::Casual, Ocasion::Casual, 1.0),
    (Ocasion::Casual, Ocasion::Formal, 0.3),
    (Ocasion::Casual, Ocasion::Esportivo, 0.6),
    (Ocasion::Casual, Ocasion::Trabalho, 0.5),
    (Ocasion::Casual, Ocasion::Noite, 0.4),
    (Ocasion::Formal, Ocasion::Formal, 1.0),
    (Ocasion::Formal, Ocasion::Esportivo, 0.1),
    (Ocasion::Formal, Ocasion::Trabalho, 0.6),
    (Ocasion::Formal, Ocasion::Noite, 0.8),
    (Ocasion::Esportivo, Ocasion::Esportivo, 1.0),
    (Ocasion::Esportivo, Ocasion::Trabalho, 0.2),
    (Ocasion::Esportivo, Ocasion::Noite, 0.15),
    (Ocasion::Trabalho, Ocasion::Trabalho, 1.0),
    (Ocasion::Trabalho, Ocasion::Noite, 0.4),
    (Ocasion::Noite, Ocasion::Noite, 1.0),
];

/// `OCC_MATRIX[a][b]`, default `0.5`.
pub fn occasion_matrix(a: Ocasion, b: Ocasion) -> f64 {
    symmetric_lookup(OCC_TABLE, a, b, 0.5)
}

const CLIMATE_TABLE: &[(Clima, Clima, f64)] = &[
    (Clima::Quente, Clima::Quente, 1.0),
    (Clima::Quente, Clima::Frio, 0.2),
    (Clima::Quente, Clima::MeiaEstacao, 0.6),
    (Clima::Frio, Clima::Frio, 1.0),
    (Clima::Frio, Clima::MeiaEstacao, 0.6),
    (Clima::MeiaEstacao, Clima::MeiaEstacao, 1.0),
];

/// `CLIMATE_MATRIX[a][b]`, default `0.5`.
pub fn climate_matrix(a: Clima, b: Clima) -> f64 {
    symmetric_lookup(CLIMATE_TABLE, a, b, 0.5)
}

/// `MAT_GROUP(material) -> {leve, pesado, tecnico, acessorio}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialGroup {
    Leve,
    Pesado,
    Tecnico,
    Acessorio,
}

pub fn material_group(material: Material) -> MaterialGroup {
    match material {
        Material::Algodao | Material::Linho | Material::Seda | Material::Malha => {
            MaterialGroup::Leve
        }
        Material::Jeans | Material::La | Material::Couro => MaterialGroup::Pesado,
        Material::Poliester => MaterialGroup::Tecnico,
        Material::Metal => MaterialGroup::Acessorio,
    }
}

const MAT_TABLE: &[(MaterialGroup, MaterialGroup, f64)] = &[
    (MaterialGroup::Leve, MaterialGroup::Leve, 0.9),
    (MaterialGroup::Leve, MaterialGroup::Pesado, 0.6),
    (MaterialGroup::Leve, MaterialGroup::Tecnico, 0.6),
    (MaterialGroup::Leve, MaterialGroup::Acessorio, 0.8),
    (MaterialGroup::Pesado, MaterialGroup::Pesado, 0.85),
    (MaterialGroup::Pesado, MaterialGroup::Tecnico, 0.5),
    (MaterialGroup::Pesado, MaterialGroup::Acessorio, 0.8),
    (MaterialGroup::Tecnico, MaterialGroup::Tecnico, 0.7),
    (MaterialGroup::Tecnico, MaterialGroup::Acessorio, 0.6),
    (MaterialGroup::Acessorio, MaterialGroup::Acessorio, 0.9),
];

/// `MAT_MATRIX[g][g']`, default `0.6`.
pub fn material_matrix(a: MaterialGroup, b: MaterialGroup) -> f64 {
    symmetric_lookup(MAT_TABLE, a, b, 0.6)
}

const PATTERN_TABLE: &[(Padrao, Padrao, f64)] = &[
    (Padrao::Listrado, Padrao::Listrado, -0.05),
    (Padrao::Listrado, Padrao::Xadrez, -0.15),
    (Padrao::Listrado, Padrao::Poa, -0.1),
    (Padrao::Xadrez, Padrao::Xadrez, -0.05),
    (Padrao::Xadrez, Padrao::Poa, -0.15),
    (Padrao::Poa, Padrao::Poa, -0.05),
];

/// `PATTERN_MATRIX[p][p'] ∈ [-0.15, 0]`, default `0.0`. `liso` never clashes
/// with anything, including itself.
pub fn pattern_matrix(a: Padrao, b: Padrao) -> f64 {
    if a == Padrao::Liso || b == Padrao::Liso {
        return 0.0;
    }
    symmetric_lookup(PATTERN_TABLE, a, b, 0.0)
}
