mod predict;
mod web;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::web::api::passes::{self, ApiResponse, PassQuery};
use crate::web::{AppState, Config};

#[derive(Parser)]
#[command(name = "iss-pass")]
#[command(about = "Naive ISS overhead pass estimator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// YAML config file
        #[arg(short, long)]
        config: Option<String>,
        /// Override the listen address
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Estimate passes for one location and print the JSON reply
    Predict {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long)]
        alt: Option<i64>,
        #[arg(short, long)]
        n: Option<i64>,
        /// YAML config file
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, bind } => serve(config.as_deref(), bind).await,
        Commands::Predict {
            lat,
            lon,
            alt,
            n,
            config,
        } => {
            let query = PassQuery {
                lat: Some(lat),
                lon: Some(lon),
                alt,
                n,
            };
            predict(config.as_deref(), query).await
        }
    }
}

fn load_state(path: Option<&str>, bind: Option<String>) -> Result<AppState, ExitCode> {
    let mut config = Config::load(path).map_err(|e| {
        eprintln!("Error loading config: {}", e);
        ExitCode::FAILURE
    })?;
    if let Some(bind) = bind {
        config.web.bind = bind;
    }
    AppState::from_config(config).map_err(|e| {
        eprintln!("Error creating position client: {}", e);
        ExitCode::FAILURE
    })
}

async fn serve(config: Option<&str>, bind: Option<String>) -> ExitCode {
    let state = match load_state(config, bind) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match web::run_server(state).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn predict(config: Option<&str>, query: PassQuery) -> ExitCode {
    let state = match load_state(config, None) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let (response, code) = match passes::estimate(&state, &query).await {
        Ok(response) => (response, ExitCode::SUCCESS),
        Err(e) => (ApiResponse::failure(e.reason()), ExitCode::FAILURE),
    };

    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error encoding response: {}", e);
            return ExitCode::FAILURE;
        }
    }
    code
}
