pub mod cli;
pub mod core;
pub mod providers;

pub use crate::core::config;

use crate::core::Converter;
use crate::core::converter::normalize_code;
use crate::providers::CurrencyApiProvider;
use anyhow::Result;
use tracing::{debug, info};

/// Commands that need configuration and a rate provider.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Convert {
        amount: String,
        from: String,
        to: String,
    },
    Currencies {
        base: Option<String>,
    },
    Interactive,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!(
        base_url = %config.provider.base_url,
        base_currency = %config.base_currency,
        decimals = config.decimals,
        "Loaded config"
    );

    let api_key = config.api_key()?;
    let provider = CurrencyApiProvider::new(&config.provider.base_url, api_key)?;

    match command {
        AppCommand::Convert { amount, from, to } => {
            let converter = Converter::new(provider);
            cli::convert::run(&converter, &amount, &from, &to, config.decimals).await
        }
        AppCommand::Currencies { base } => {
            let base = normalize_code(base.as_deref().unwrap_or(&config.base_currency));
            cli::currencies::run(
                &provider,
                &base,
                &config.fallback_currencies,
                config.decimals,
            )
            .await
        }
        AppCommand::Interactive => {
            let converter = Converter::new(provider);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            cli::interactive::run_session(&converter, stdin, &mut stdout, config.decimals).await
        }
    }
}
