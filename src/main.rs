use anyhow::{Context, Result};
use clap::Parser;
use std::net::Ipv4Addr;
use std::sync::Arc;
use student_api::{api, config, generation, logging, students::StudentService};
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "student-api", about = "In-memory student records service")]
struct Cli {
    /// Port to listen on; overrides `SERVER_PORT`.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::init_config().context("failed to load configuration")?;
    logging::init_tracing();

    let generator = generation::get_generation_client(config)
        .context("failed to build generation client")?;
    let app = api::create_router(Arc::new(StudentService::new(generator)));

    let port = cli.port.unwrap_or(config.server_port);
    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;
    tracing::info!(
        model = %config.generation_model,
        ollama_url = %config.ollama_url,
        "Listening on http://0.0.0.0:{}",
        port
    );

    axum::serve(listener, app)
        .await
        .context("HTTP server terminated unexpectedly")?;
    Ok(())
}
