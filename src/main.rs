use ado_heatmap::cli::Cli;
use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Only the working directory's .env; real environment variables win
    dotenvy::from_path(".env").ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ado_heatmap=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cli.execute()
}
