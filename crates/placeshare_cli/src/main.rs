//! PlaceShare command-line entry point.
//!
//! # Responsibility
//! - Parse configuration from flags and `PLACESHARE_*` environment variables.
//! - Initialize logging, migrate the database, and serve the place API.
//! - Offer `ping` and `seed-user` helpers for local setup.

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use clap::{Args, Parser, Subcommand};
use log::{error, info};
use placeshare_core::db::open_db;
use placeshare_core::{init_logging, NewUser, SqliteEntityStore, UserRepository};
use placeshare_http::{configure, AppState};
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_USER_IMAGE: &str = "https://www.gravatar.com/avatar/?d=mp";

#[derive(Debug, Parser)]
#[command(name = "placeshare", version, about = "Places owned by users, over HTTP")]
struct Cli {
    #[command(flatten)]
    logging: LoggingArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct LoggingArgs {
    /// trace|debug|info|warn|error; defaults by build mode.
    #[arg(long, env = "PLACESHARE_LOG_LEVEL", global = true)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files; stderr when unset.
    #[arg(long, env = "PLACESHARE_LOG_DIR", global = true)]
    log_dir: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the place API.
    Serve(ServeArgs),
    /// Create a user that can own places.
    SeedUser(SeedUserArgs),
    /// Print core linkage info.
    Ping,
}

#[derive(Debug, Args)]
struct ServeArgs {
    #[arg(long, env = "PLACESHARE_DB_PATH", default_value = "placeshare.sqlite3")]
    db_path: PathBuf,
    #[arg(long, env = "PLACESHARE_BIND", default_value = "127.0.0.1:5000")]
    bind: String,
}

#[derive(Debug, Args)]
struct SeedUserArgs {
    #[arg(long, env = "PLACESHARE_DB_PATH", default_value = "placeshare.sqlite3")]
    db_path: PathBuf,
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    #[arg(long, default_value = DEFAULT_USER_IMAGE)]
    image: String,
}

#[actix_web::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = cli
        .logging
        .log_level
        .as_deref()
        .unwrap_or(placeshare_core::default_log_level());
    if let Err(err) = init_logging(level, cli.logging.log_dir.as_deref()) {
        eprintln!("placeshare: {err}");
        return ExitCode::FAILURE;
    }

    let outcome = match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::SeedUser(args) => seed_user(args),
        Command::Ping => {
            println!("placeshare_core ping={}", placeshare_core::ping());
            println!("placeshare_core version={}", placeshare_core::core_version());
            Ok(())
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_exit module=cli status=error error={message}");
            eprintln!("placeshare: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(args: ServeArgs) -> Result<(), String> {
    // Migrate once up front so a bad database fails startup, not requests.
    open_db(&args.db_path).map_err(|err| {
        format!("cannot open database `{}`: {err}", args.db_path.display())
    })?;

    let state = web::Data::new(AppState::new(args.db_path.clone()));
    info!(
        "event=server_start module=cli status=ok bind={} db_path={}",
        args.bind,
        args.db_path.display()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(args.bind.as_str())
    .map_err(|err| format!("cannot bind `{}`: {err}", args.bind))?
    .run()
    .await
    .map_err(|err| format!("server stopped with error: {err}"))
}

fn seed_user(args: SeedUserArgs) -> Result<(), String> {
    let conn = open_db(&args.db_path).map_err(|err| {
        format!("cannot open database `{}`: {err}", args.db_path.display())
    })?;
    let store = SqliteEntityStore::try_new(&conn).map_err(|err| err.to_string())?;
    let user = store
        .create_user(&NewUser {
            name: args.name,
            email: args.email,
            password: args.password,
            image: args.image,
        })
        .map_err(|err| format!("cannot create user: {err}"))?;

    info!("event=seed_user module=cli status=ok user_id={}", user.id);
    println!("{}", user.id);
    Ok(())
}
