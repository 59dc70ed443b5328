use std::collections::HashMap;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use look_kg::dto::{self, CompleteLookOut, SuggestComplementsOut};
use look_kg::{RawItem, Recommender, SqliteCatalogStore, StoreConfig};

/// Seed data mirroring `ops/seed.py` / `ops/smoke.py` — enough pieces to
/// exercise every role and a couple of style/occasion mismatches.
fn seed_items() -> Vec<RawItem> {
    let mut items = Vec::new();
    let mut push = |nome: &str, categoria: &str, cor: &str, padrao: &str, material: &str, estilo: &str, ocasion: &str, clima: &str| {
        items.push(RawItem {
            item_id: None,
            nome: nome.to_string(),
            categoria: categoria.to_string(),
            cor: cor.to_string(),
            padrao: Some(padrao.to_string()),
            material: Some(material.to_string()),
            estilo: Some(estilo.to_string()),
            ocasion: Some(ocasion.to_string()),
            clima: Some(clima.to_string()),
        });
    };

    push("saia azul jeans", "saia", "azul", "liso", "jeans", "classico", "casual", "quente");
    push("blusa branca algodao", "blusa", "branco", "liso", "algodao", "classico", "casual", "quente");
    push("sapato nude", "sapato", "nude", "liso", "couro", "classico", "casual", "quente");
    push("bolsa marrom pequena", "bolsa", "marrom", "liso", "couro", "classico", "casual", "quente");
    push("colar prata minimal", "acessorio", "cinza", "liso", "metal", "classico", "casual", "quente");
    push("camisa social preta", "blusa", "preto", "liso", "algodao", "formal", "formal", "frio");
    push("calca bege chino", "calca", "bege", "liso", "algodao", "classico", "casual", "quente");

    items
}

#[derive(Parser, Debug)]
#[command(name = "look-kg", about = "Rule-driven outfit compatibility and recommendation engine")]
struct Args {
    /// Directory holding catalog.db, overriding DATA_DIR/KG_DATA_DIR/STORAGE_DIR.
    #[arg(long, value_name = "DIR")]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the built-in seed catalog and rebuild the graph.
    Seed,
    /// Rebuild the in-memory graph from the current catalog.
    Rebuild,
    /// List every item currently in the catalog.
    Catalog,
    /// Substring search over the catalog.
    Search {
        query: String,
        #[arg(long, default_value_t = 200)]
        limit: usize,
    },
    /// Suggest complements for an item already in the catalog, by name.
    Complementar {
        nome: String,
        #[arg(long, default_value_t = 10)]
        top_k: usize,
        #[arg(long, default_value_t = 0.0)]
        threshold: f64,
    },
    /// Complete a look from one or more selected items, by name.
    Completar {
        #[arg(required = true)]
        itens: Vec<String>,
        /// Defaults to sapato, bolsa, acessorio per spec.md §6.
        #[arg(long)]
        targets: Vec<String>,
        #[arg(long, default_value_t = 1)]
        top_k: usize,
    },
}

async fn open_store(data_dir: Option<String>) -> Result<SqliteCatalogStore> {
    let config = match data_dir {
        Some(dir) => StoreConfig { base_dir: dir.into() },
        None => StoreConfig::from_env(),
    };
    std::fs::create_dir_all(&config.base_dir)
        .with_context(|| format!("falha ao criar diretório de dados {}", config.base_dir.display()))?;
    let path = config.catalog_db_path();
    let path_str = path.to_str().context("caminho do catálogo não é UTF-8 válido")?;
    SqliteCatalogStore::open(path_str)
        .await
        .with_context(|| format!("falha ao abrir catálogo em {}", path.display()))
}

fn find_by_nome<'a>(items: &'a [look_kg::Item], nome: &str) -> Option<&'a look_kg::Item> {
    let target = nome.trim().to_lowercase();
    items.iter().find(|i| i.nome == target || i.item_id == target)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let store = open_store(args.data_dir).await?;
    let recommender = Recommender::new(store);

    match args.command {
        Command::Seed => {
            for raw in seed_items() {
                let item = recommender.upsert_item_and_generate_edges(raw).await?;
                println!("upserted {} ({})", item.nome, item.item_id);
            }
            let stats = recommender.rebuild_graph().await?;
            println!("graph rebuilt: {} nodes, {} edges", stats.nodes, stats.edges);
        }
        Command::Rebuild => {
            let stats = recommender.rebuild_graph().await?;
            println!("graph rebuilt: {} nodes, {} edges", stats.nodes, stats.edges);
        }
        Command::Catalog => {
            let items = recommender.store().load_all().await?;
            for item in items {
                println!("{}\t{}\t{}\t{}", item.item_id, item.nome, item.categoria, item.cor);
            }
        }
        Command::Search { query, limit } => {
            let items = recommender.store().search(&query, limit).await?;
            for item in items {
                println!("{}\t{}\t{}", item.item_id, item.nome, item.categoria);
            }
        }
        Command::Complementar { nome, top_k, threshold } => {
            recommender.rebuild_graph().await?;
            let catalog = recommender.store().load_all().await?;
            let selected = find_by_nome(&catalog, &nome)
                .cloned()
                .with_context(|| format!("item '{nome}' não encontrado no catálogo"))?;

            let results = recommender
                .suggest_complements(&[selected], top_k, threshold, &HashMap::new(), None)
                .await?;
            let out = SuggestComplementsOut::from_results(&results);
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Command::Completar { itens, targets, top_k } => {
            recommender.rebuild_graph().await?;
            let catalog = recommender.store().load_all().await?;

            let targets = if targets.is_empty() {
                vec!["sapato".to_string(), "bolsa".to_string(), "acessorio".to_string()]
            } else {
                targets
            };

            let selected: Vec<look_kg::Item> = itens
                .iter()
                .map(|nome| {
                    find_by_nome(&catalog, nome)
                        .cloned()
                        .with_context(|| format!("item '{nome}' não encontrado no catálogo"))
                })
                .collect::<Result<_>>()?;

            let target_categorias = dto::parse_categorias(&targets)?;
            let result = recommender
                .complete_look(&selected, &target_categorias, top_k, None)
                .await?;
            let out = CompleteLookOut::from(&result);
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}
