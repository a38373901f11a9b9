use anyhow::{Context, Result};
use finscraper::{
    config::Config,
    fetch::CommandSource,
    server::{self, AppState},
};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("reading configuration")?;

    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(config.log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .init();

    let mut source = CommandSource::new(&config.program);
    if let Some(script) = &config.script {
        source = source.with_script(script);
    }
    if let Some(dir) = &config.working_dir {
        source = source.with_working_dir(dir.clone());
    }
    info!(
        program = %config.program,
        script = ?config.script,
        static_dir = %config.static_dir.display(),
        "scraper configured"
    );

    let state = AppState::new(Arc::new(source));
    let routes = server::routes(state, config.static_dir.clone());

    info!("Server is running on {}", config.port);
    info!("Index: http://localhost:{}/", config.port);
    info!("Scrape endpoint: POST http://localhost:{}/get-data", config.port);

    warp::serve(routes).run(config.addr()).await;

    Ok(())
}
