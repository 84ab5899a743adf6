use ipfs_share::error::{ConfigError, ShareError};
use ipfs_share::prelude::*;

mod cli;

use cli::{Cli, Parser};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Run the app and capture any errors
    capture_error(run().await);
}

pub async fn run() -> Result<(), AppError> {
    let dotenv = dotenvy::dotenv();
    let args = Cli::parse();
    init_tracing();
    if let Err(e) = dotenv {
        tracing::debug!("no .env loaded: {}", e);
    }

    let options = args.share_options(|key| std::env::var(key).ok())?;
    let clipboard = if options.enable_clipboard {
        Clipboard::detect()
    } else {
        None
    };

    let report = share(&options, clipboard).await?;
    println!("{}", report);
    Ok(())
}

fn init_tracing() {
    let (level, invalid) = match resolve_log_level(std::env::var(LOG_LEVEL).ok()) {
        Ok(level) => (level, None),
        Err(e) => (DEFAULT_LOG_LEVEL, Some(e)),
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    if let Some(e) = invalid {
        tracing::warn!("{}, using {}", e, level);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Share(#[from] ShareError),
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) => 2,
            AppError::Share(e) => e.exit_code(),
        }
    }
}

fn capture_error<T>(result: Result<T, AppError>) {
    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}
