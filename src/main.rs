use anyhow::Result;
use structopt::StructOpt;
use tokio::net::TcpListener;
use toy_cache::{storage::inmemory, Server};
use tracing::info;

/// Development key-value store speaking the cache wire protocol.
#[derive(StructOpt)]
struct Opts {
    /// Address to listen at.
    #[structopt(short, long, default_value = "127.0.0.1:8080")]
    address: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let opts = Opts::from_args();

    run_with(opts).await
}

async fn run_with(opts: Opts) -> Result<()> {
    info!("listening at {}", opts.address);

    let listener = TcpListener::bind(opts.address).await?;

    let store = inmemory::start();

    Server::new(listener, store).start().await;

    Ok(())
}
