use std::path::PathBuf;
use std::sync::Arc;

use clap::{
    Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};

use crossq::engine::Recommender;
use crossq::management::{AuthGateway, CredentialStore, SessionStore};
use crossq::server::AppState;
use crossq::spotify::auth::SpotifyTokenExchange;
use crossq::{config, fatal, info, server};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Address to bind, overriding SERVER_ADDRESS
    #[clap(long)]
    address: Option<String>,

    /// Audio-feature dataset, overriding DATASET_PATH
    #[clap(long)]
    dataset: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        fatal!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();
    let addr = cli.address.unwrap_or_else(config::server_addr);
    let dataset = cli.dataset.unwrap_or_else(config::dataset_path);

    let credentials = Arc::new(CredentialStore::new());
    let sessions = Arc::new(SessionStore::new());
    let gateway = AuthGateway::new(
        Arc::clone(&credentials),
        Arc::clone(&sessions),
        SpotifyTokenExchange,
    );
    let recommender = Recommender::from_config();

    let state = Arc::new(AppState {
        credentials,
        sessions,
        gateway,
        recommender,
        dataset,
    });

    info!("Listening on {}", addr);
    server::serve(&addr, state).await;
}
