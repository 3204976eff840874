use std::{
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    process::exit,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::{Handle, tls_rustls::RustlsConfig};
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use transaction_registry::{
    AppState, BasicAuthGate, TransactionRegistry, build_router, graceful_shutdown, ingest,
};

/// The REST API server for the transaction registry.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the XML file with the initial transactions.
    #[arg(long)]
    data_path: PathBuf,

    /// File path to a JSON file mapping user names to bcrypt password hashes.
    #[arg(long)]
    credentials_path: PathBuf,

    /// The address to listen on.
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 8000)]
    port: u16,

    /// Directory with an SSL certificate `cert.pem` and key `key.pem`.
    ///
    /// The server uses plain HTTP when this is not given.
    #[arg(long)]
    cert_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from((args.host, args.port));

    let registry = TransactionRegistry::from_imported(ingest(&args.data_path));

    let credential_gate = match BasicAuthGate::from_file(&args.credentials_path) {
        Ok(gate) => gate,
        Err(error) => {
            tracing::error!("Could not load credentials: {error}");
            exit(1);
        }
    };

    let app_state = AppState::new(registry, credential_gate);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(app_state));

    let result = match args.cert_path {
        Some(cert_path) => {
            let tls_config = match RustlsConfig::from_pem_file(
                cert_path.join("cert.pem"),
                cert_path.join("key.pem"),
            )
            .await
            {
                Ok(tls_config) => tls_config,
                Err(error) => {
                    tracing::error!("Could not open TLS certificates: {error}");
                    exit(1);
                }
            };

            tracing::info!("HTTPS server listening on {}", addr);
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(router.into_make_service())
                .await
        }
        None => {
            tracing::info!("HTTP server listening on {}", addr);
            axum_server::bind(addr)
                .handle(handle)
                .serve(router.into_make_service())
                .await
        }
    };

    if let Err(error) = result {
        tracing::error!("Server error: {error}");
        exit(1);
    }
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
    {
        Ok(log_file) => log_file,
        Err(error) => {
            eprintln!("Could not create log file: {error}");
            exit(1);
        }
    };

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged where they are handled.
        .on_failure(());

    router.layer(tracing_layer)
}
