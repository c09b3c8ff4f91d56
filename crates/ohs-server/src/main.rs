//! ohs-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the compliance API over HTTP.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for a `[[users]]` entry in config.toml:
//!
//! ```
//! cargo run -p ohs-server -- --hash-password
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use ohs_api::ApiState;
use ohs_server::{
  ServerConfig,
  auth::{ConfiguredUsers, hash_password},
};
use ohs_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Occupational safety compliance server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = prompt_password()?;
    let hash =
      hash_password(&password).map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
    println!("{hash}");
    return Ok(());
  }

  // `OHS_PORT=9000`, `OHS_LOOKAHEAD__HAZARD_DAYS=90`
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("OHS")
        .prefix_separator("_")
        .separator("__"),
    )
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let users = ConfiguredUsers::new(server_cfg.users.clone());
  if users.is_empty() {
    tracing::warn!("no users configured; every API request will be rejected");
  }

  let store_path = resolve_store_path(&server_cfg.store_path)?;

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if server_cfg.seed_catalog {
    store
      .seed_default_catalog()
      .await
      .context("failed to seed default catalog")?;
  }

  let api = ApiState::new(Arc::new(store), server_cfg.lookahead);
  let app = ohs_server::router(api, Arc::new(users));
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Prompt on stderr and read one password line from stdin, so that stdout
/// carries only the hash.
fn prompt_password() -> anyhow::Result<String> {
  eprint!("Password: ");
  let mut line = String::new();
  std::io::stdin()
    .read_line(&mut line)
    .context("failed to read password from stdin")?;
  let password = line.trim_end_matches(['\r', '\n']);
  if password.is_empty() {
    anyhow::bail!("refusing to hash an empty password");
  }
  Ok(password.to_owned())
}

/// Resolve a leading `~` component against `$HOME` and make sure the
/// database's parent directory exists.
fn resolve_store_path(path: &Path) -> anyhow::Result<PathBuf> {
  let resolved = match (path.strip_prefix("~"), std::env::var_os("HOME")) {
    (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
    _ => path.to_path_buf(),
  };
  if let Some(dir) = resolved.parent().filter(|d| !d.as_os_str().is_empty()) {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("failed to create {}", dir.display()))?;
  }
  Ok(resolved)
}
