use std::process::ExitCode;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use tokio::sync::Notify;

mod api;
mod config;
mod content;
mod error;
mod http;
mod logger;
mod server;

use error::{Error, Result};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if tracing::dispatcher::has_been_set() {
                tracing::error!("{e}");
            } else {
                eprintln!("textbook-api: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cfg = config::Config::load()?;
    logger::init(&cfg.logging)?;

    // Worker threads follow `server.workers`, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<()> {
    let addr = cfg.get_socket_addr()?;
    let listener =
        server::create_reusable_listener(addr).map_err(|source| Error::Bind { addr, source })?;
    let state = Arc::new(config::AppState::new(&cfg)?);

    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown))?;

    logger::log_server_start(&listener.local_addr()?, &cfg);
    server::start_server_loop(listener, state, Arc::new(AtomicUsize::new(0)), shutdown).await;
    Ok(())
}
