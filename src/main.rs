//! optimize-images - recompress the menu's product photos

use anyhow::{Context, Result};
use clap::Parser;
use opensase_menu::optimizer::{BatchOptimizer, OptimizeError};
use opensase_menu::OptimizerSettings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "optimize-images", about = "Shrink and re-encode the menu's product photos")]
struct Cli {
    /// Delete `_optimized` files from earlier runs before optimizing
    #[arg(long)]
    clean: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let cli = Cli::parse();
    let settings = OptimizerSettings::from_env().context("invalid optimizer settings")?;
    let optimizer = BatchOptimizer::new(settings);

    if cli.clean {
        let removed = optimizer.clean_previous().await;
        tracing::info!("🧹 Removed {} previous outputs", removed);
    }

    let summary = match optimizer.run().await {
        Ok(summary) => summary,
        Err(err @ OptimizeError::MissingRoot(_)) => {
            tracing::error!("💡 Run from the project root or set MENU_ASSETS_DIR");
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };
    println!("{summary}");
    Ok(())
}
