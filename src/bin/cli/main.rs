use std::{net::SocketAddr, path::PathBuf};

use anyhow::{anyhow, Result};
use dotenvy::{dotenv, var as envar};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod command_parser;

use tunr::{backup::State, catalog::Catalog, config::Config, db, export::Export, server};

/// A missing `.env` is fine, a broken one is logged. Returns whether it was broken.
fn report_dotenv<T>(result: dotenvy::Result<T>) -> bool {
    match result {
        Err(e) if !e.not_found() => {
            warn!("Ignoring .env file: {e}");
            true
        }
        _ => false,
    }
}

/// `--database` wins over `DATABASE_URL`, which wins over the configuration.
fn database_location(arg: Option<PathBuf>, config: &Config) -> PathBuf {
    match arg {
        Some(path) => path,
        None => {
            report_dotenv(dotenv());
            match envar("DATABASE_URL") {
                Ok(db_url) => PathBuf::from(db_url),
                Err(_) => config.database_path(),
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args_parsed = command_parser::arg_parser().get_matches();
    let config = Config::read_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_level)?)
        .with_writer(std::io::stderr)
        .init();

    if let Some(("config", _)) = args_parsed.subcommand() {
        print!("{}", Config::default_as_string()?);
        return Ok(());
    }

    let location = database_location(args_parsed.get_one::<PathBuf>("database").cloned(), &config);
    if let Some(parent) = location.parent().filter(|x| !x.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let conn = db::connect(&location).await?;
    db::create_tables(&conn).await?;
    let catalog = Catalog::new(conn.clone());

    match args_parsed.subcommand() {
        Some(("serve", matches)) => {
            let port = matches.get_one::<u16>("port").copied().unwrap_or(config.port);
            server::start(catalog, SocketAddr::new(config.listen_address, port)).await?;
        }
        Some(("backup", _)) => {
            let state = State::load(&conn).await?;
            println!("{}", state.serialize()?);
        }
        Some(("restore", matches)) => {
            let file = matches
                .get_one::<PathBuf>("file")
                .ok_or_else(|| anyhow!("No backup file given"))?;
            let state = State::deserialize(&std::fs::read_to_string(file)?)?;
            state.rebuild(&conn).await?;
            info!("Restored {}.", file.display());
        }
        Some(("export", _)) => {
            Export::export(Export::new(&catalog).await?, std::io::stdout())?;
        }
        Some(("seed-genres", _)) => {
            let created = catalog.seed_genres().await?;
            println!("Added {created} genres.");
        }
        Some((name, _matches)) => unimplemented!("{}", name),
        None => unreachable!("subcommand required"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_env_file_is_not_reported() {
        let path = std::env::temp_dir().join(format!("tunr-{}.env", uuid::Uuid::new_v4()));
        assert!(!report_dotenv(dotenvy::from_path(&path)));
    }

    #[test]
    fn broken_env_file_is_reported() {
        let path = std::env::temp_dir().join(format!("tunr-{}.env", uuid::Uuid::new_v4()));
        std::fs::write(&path, "TUNR_BROKEN_ENV=\"unterminated\n").unwrap();
        let reported = report_dotenv(dotenvy::from_path(&path));
        std::fs::remove_file(&path).unwrap();
        assert!(reported);
    }
}
