use std::net::SocketAddr;

use accessibridge_backend::api::server::{build_router, serve};
use accessibridge_backend::db::content::ContentStore;
use accessibridge_backend::db::resolve_db_config;
use serde_json::json;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_BIND: &str = "127.0.0.1:5001";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Serve,
    InitDb,
    Help,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cli_args = std::env::args().skip(1).collect::<Vec<_>>();
    match parse_command(cli_args.as_slice())? {
        Command::Help => {
            print_usage();
            Ok(())
        }
        Command::InitDb => run_init_db(),
        Command::Serve => {
            let bind = resolve_bind(std::env::var("ACCESSIBRIDGE_BIND").ok().as_deref());
            let addr: SocketAddr = bind.parse()?;
            let app = build_router()?;
            serve(addr, app).await?;
            Ok(())
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

fn parse_command(args: &[String]) -> Result<Command, Box<dyn std::error::Error>> {
    match args.first().map(String::as_str) {
        None | Some("serve") => Ok(Command::Serve),
        Some("init-db") => Ok(Command::InitDb),
        Some("-h" | "--help" | "help") => Ok(Command::Help),
        Some(unknown) => Err(std::io::Error::other(format!(
            "Unknown argument: {unknown}\n\nUse --help for usage."
        ))
        .into()),
    }
}

fn resolve_bind(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_BIND)
        .to_string()
}

fn run_init_db() -> Result<(), Box<dyn std::error::Error>> {
    let working_dir = std::env::current_dir()?;
    let config = resolve_db_config(working_dir.as_path());
    let store = ContentStore::open(config.app_db_path)?;
    store.initialize()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "success": true,
            "db_path": store.db_path().display().to_string(),
        }))?
    );
    Ok(())
}

fn print_usage() {
    eprintln!(concat!(
        "Usage:\n",
        "  accessibridge-backend [serve]   start the HTTP server\n",
        "  accessibridge-backend init-db   create the database schema and exit\n\n",
        "Environment:\n",
        "  ACCESSIBRIDGE_BIND   listen address (default 127.0.0.1:5001)\n",
        "  ACCESSIBRIDGE_DB     SQLite file (default ./accessibility.db)\n",
        "  GEMINI_API_KEY       enables AI features when set\n",
        "  GEMINI_MODEL         model name (default gemini-2.5-flash)\n",
        "  GEMINI_API_BASE      API base URL\n",
        "  RUST_LOG             log filter (default info)\n"
    ));
}
