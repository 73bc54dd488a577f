use gzserve::{logger, server, Config, Server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg.logging)?;

    // Build the Tokio runtime, honoring the configured worker count
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        log::info!("[CONFIG] Using {workers} worker threads");
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg)).inspect_err(|e| {
        log::error!("{e}");
    })?;
    Ok(())
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let server = Server::bind(&cfg)?;
    logger::log_server_start(&server.local_addr()?, server.root(), &cfg.logging);

    server.run_until(server::shutdown_signal()).await;
    log::logger().flush();
    Ok(())
}
