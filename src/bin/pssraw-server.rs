use std::env;

use anyhow::Context;
use log::info;

use pssraw::Grammar;
use pssraw::server::run_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let grammar = match env::var_os("PSSRAW_GRAMMAR") {
        Some(path) => Grammar::load(&path).context("failed to load PSSRAW_GRAMMAR")?,
        None => Grammar::v33(),
    };
    let addr = env::var("PSSRAW_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    info!("Starting pssraw server on {}", addr);
    run_server(&addr, grammar)
        .await
        .with_context(|| format!("server on {} failed", addr))
}
