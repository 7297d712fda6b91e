use anyhow::Result;
use asean_indicators::api::DEFAULT_BASE_URL;
use asean_indicators::config::{Config, DEFAULT_BIND};
use asean_indicators::server;
use clap::Parser;
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[command(
    name = "asean-proxy",
    version,
    about = "Serve normalized ASEAN indicator series for the dashboard"
)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "ASEAN_BIND", default_value = DEFAULT_BIND)]
    bind: SocketAddr,
    /// Data360 `/data` endpoint to proxy.
    #[arg(long, env = "ASEAN_UPSTREAM_URL", default_value = DEFAULT_BASE_URL)]
    upstream_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = Config {
        bind: args.bind,
        upstream_url: args.upstream_url,
    };
    server::serve(&config).await
}
