use anyhow::{Context, Result};
use clap::Parser;

use prayer_times::cli::args::{Cli, Commands};
use prayer_times::cli::handlers;
use prayer_times::config::AppConfig;
use prayer_times::db::migrations::prepare_database;
use prayer_times::db::SqliteStore;
use prayer_times::timings::AladhanClient;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Loading config")?;

    match cli.command {
        Some(Commands::SetCity { city }) => handlers::handle_set_city(&mut config, &city),
        Some(Commands::Paths) => handlers::handle_paths(),
        Some(Commands::Times) | None => {
            let city = handlers::resolve_city(cli.city.as_deref(), &config)?;
            let store = open_store()?;
            let provider =
                AladhanClient::new(&config.provider).context("Building HTTP client")?;
            let color = config.display.color && !cli.no_color;

            let result = handlers::handle_times(&store, &provider, &city, color);
            store.close().context("Closing database")?;
            result
        }
    }
}

/// Open the cache database, migrating it to the current schema first.
fn open_store() -> Result<SqliteStore> {
    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;

    prepare_database(&db_path)?;
    SqliteStore::open(&db_path).with_context(|| format!("Opening prayer times cache at {:?}", db_path))
}
