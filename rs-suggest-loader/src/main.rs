use std::path::{Path, PathBuf};

use clap::Parser;

use rs_suggest_core::{
    CorpusLoader, ModelConfig, ModelStore, NGramModel, PersistMode, SnapshotStore, SqliteStore,
};

#[derive(Parser, Debug)]
#[command(name = "rs-suggest-loader", about = "Load CSV corpora and generate the n-gram model")]
struct Cli {
    /// Directory holding one CSV file per dataset
    #[arg(long, default_value = "datasets")]
    corpus_dir: PathBuf,

    /// SQLite database receiving the n-grams
    #[arg(long, default_value = "ngram.sqlite3")]
    database: PathBuf,

    /// Write a postcard snapshot to this path instead of the SQLite database
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Model order (context length + 1)
    #[arg(long, default_value = "2")]
    order: usize,

    /// Create new records on persist instead of updating existing ones
    #[arg(long)]
    append: bool,
}

/// Trains from the corpus directory, persists, then reloads from the store.
fn bootstrap<S: ModelStore>(
    store: S,
    config: ModelConfig,
    corpus_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut model = NGramModel::new(store, config)?;

    let summary = CorpusLoader::new().load_dir(&mut model, corpus_dir)?;
    model.persist()?;
    model.load()?;

    for (dataset, phrases) in &summary.datasets {
        println!("{}: {} phrases", dataset, phrases);
    }
    println!("N-gram model generated and loaded ({} entries)", model.len());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = ModelConfig {
        order: cli.order,
        persist_mode: if cli.append { PersistMode::Append } else { PersistMode::Upsert },
        ..ModelConfig::default()
    };

    match &cli.snapshot {
        Some(path) => bootstrap(SnapshotStore::open(path)?, config, &cli.corpus_dir),
        None => bootstrap(SqliteStore::open(&cli.database)?, config, &cli.corpus_dir),
    }
}
