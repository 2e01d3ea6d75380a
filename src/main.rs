mod aggregate;
mod db;
mod forms;
mod import;
mod logging;
mod models;
mod run;
mod ui;

use anyhow::{Context, Result};
use std::path::PathBuf;

const DB_ENV: &str = "WEDDINGBUDGET_DB";

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let data_dir = get_data_dir()?;
    logging::init(&data_dir.join("weddingbudget.log"))?;

    let db_path = std::env::var_os(DB_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir.join("weddingbudget.db"));
    let mut db = db::Database::open(&db_path)?;

    match args.len() {
        1 => run::as_tui(&mut db),
        _ => run::as_cli(&args, &mut db),
    }
}

fn get_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "weddingbudget", "WeddingBudget")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}
