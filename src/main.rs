//! catdog-cv — Main entry point

use catdog_cv::cli::{cmd_cross_validate, cmd_post_process, Cli, Commands};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catdog_cv=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::CrossValidate {
            op,
            seed,
            data_dir,
            batch_size,
            normalize,
            folds,
            device,
            log_dir,
        } => {
            cmd_cross_validate(op, seed, &data_dir, batch_size, normalize, folds, device, &log_dir)?;
        }
        Commands::PostProcess { op, log_dir, plot } => {
            cmd_post_process(op, &log_dir, plot.as_deref())?;
        }
    }

    Ok(())
}
