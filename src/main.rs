//! Crop Price - Main Entry Point
//!
//! Training, serving and one-off predictions from the command line.

use clap::{CommandFactory, Parser};
use crop_price::cli::{cmd_predict, cmd_serve, cmd_train, Cli, Commands};
use crop_price::training::TrainingConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crop_price=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Train { data, output, n_estimators, seed, max_depth, missing, max_mse }) => {
            let mut config = TrainingConfig::new()
                .with_data_path(data)
                .with_model_path(output)
                .with_n_estimators(n_estimators)
                .with_random_state(seed)
                .with_missing_values(missing);
            if let Some(depth) = max_depth {
                config = config.with_max_depth(depth);
            }
            if let Some(limit) = max_mse {
                config = config.with_max_test_mse(limit);
            }
            // Blocking CPU work, kept off the async workers
            tokio::task::spawn_blocking(move || cmd_train(config)).await??;
        }
        Some(Commands::Serve { host, port, model, policy }) => {
            cmd_serve(&host, port, model, policy).await?;
        }
        Some(Commands::Predict(args)) => {
            cmd_predict(&args)?;
        }
        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
