//! Server binary: parse CLI flags, wire up logging, and serve the site.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pollsite::server::Server;
use pollsite::site;

#[derive(Parser, Debug)]
#[command(name = "pollsite", version, about = "Serve the poll site over HTTP/1.1")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8000")]
    addr: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let router = site::router()?;
    let server = Server::bind(&args.addr).await?;
    tracing::info!(address = %server.local_addr(), "serving pollsite");
    server.serve(router).await?;
    Ok(())
}
