pub mod dto;
pub mod graph;
pub mod item;
pub mod normalize;
pub mod recommend;
pub mod score;
pub mod store;
pub mod vocab;

pub use graph::{GraphManager, GraphStats};
pub use item::{Item, RawItem};
pub use recommend::{
    category_allowed, CancelCheck, ComplementResult, CompleteLookResult, MissingReason,
    MissingTarget, Recommender, RecommendError,
};
pub use score::{score_bottleneck, score_pair, PairScore, Reason, Tier};
pub use store::{CatalogStore, SqliteCatalogStore, StoreConfig, StoreError};
pub use vocab::ValidationError;
