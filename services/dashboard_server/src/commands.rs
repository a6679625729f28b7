use clap::{Args, Parser, Subcommand};
use dashboard_server::{dispatch, seed_checked, AppState, Config};
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use sismo_core::Scenario;
use sismo_db::Store;
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the JSON API
    Serve(ServeArgs),
    /// Load a scenario into the database and exit
    Seed(SeedArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(short, long, default_value = "config/dashboard.ron")]
    pub config: PathBuf,
    /// Seed the scenario before serving, whatever the config says
    #[arg(long)]
    pub seed: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SeedArgs {
    #[arg(short, long, default_value = "config/dashboard.ron")]
    pub config: PathBuf,
    /// Scenario file, overriding the configured one
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,
}

fn open_store(config: &Config) -> Result<Store, BoxError> {
    match &config.database {
        Some(path) => {
            info!(path = %path.display(), "opening database");
            Ok(Store::open(path)?)
        }
        None => {
            warn!("no database configured, data will not survive a restart");
            Ok(Store::in_memory()?)
        }
    }
}

fn load_scenario(path: Option<&Path>) -> Result<Scenario, BoxError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading scenario");
            Ok(Scenario::load(path)?)
        }
        None => Ok(Scenario::las_malvinas()?),
    }
}

pub fn run_seed(args: SeedArgs, config: Config) -> Result<(), BoxError> {
    let store = open_store(&config)?;
    let scenario = load_scenario(args.scenario.as_deref().or(config.scenario.as_deref()))?;
    seed_checked(&store, &scenario, config.strict_validation, chrono::Utc::now())?;
    Ok(())
}

pub async fn run_serve(args: ServeArgs, config: Config) -> Result<(), BoxError> {
    let addr = config.listen_addr()?;
    let store = open_store(&config)?;
    if args.seed || config.seed_on_start {
        let scenario = load_scenario(config.scenario.as_deref())?;
        seed_checked(&store, &scenario, config.strict_validation, chrono::Utc::now())?;
    }

    let state = Arc::new(AppState {
        store,
        coords: config.coords,
    });

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    loop {
        let (stream, remote_addr) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    error!(error = %e, "accept failed");
                    continue;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                return Ok(());
            }
        };

        let state = state.clone();
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req| {
                let state = state.clone();
                async move { handle_request(state, req).await }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                warn!(%remote_addr, error = %e, "connection error");
            }
        });
    }
}

async fn handle_request(
    state: Arc<AppState>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = tokio::task::spawn_blocking(move || {
        dispatch(&state, &method, &path, chrono::Utc::now())
    })
    .await;

    Ok(response.unwrap_or_else(|e| {
        error!(error = %e, "handler panicked");
        dashboard_server::response::error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
        )
    }))
}
