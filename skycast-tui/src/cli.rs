use std::sync::Arc;

use clap::{Parser, Subcommand};
use skycast_core::{Config, OpenWeatherBackend};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Terminal weather client")]
pub struct Cli {
    /// City to open the forecast view for; starts on the search view
    /// when absent (or on the configured default city).
    pub city: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure {
        /// API key; prompted for interactively when absent.
        #[arg(long)]
        api_key: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Configure { api_key }) => configure(api_key),
            None => {
                let config = Config::load()?;
                let api_key = config.resolve_api_key()?;
                let city = self.city.or_else(|| config.default_city.clone());

                let backend = Arc::new(OpenWeatherBackend::new(api_key));
                crate::app::run(backend, city).await
            }
        }
    }
}

fn configure(api_key: Option<String>) -> anyhow::Result<()> {
    let key = match api_key {
        Some(key) => key,
        None => inquire::Password::new("OpenWeather API key:")
            .without_confirmation()
            .prompt()?,
    };

    let mut config = Config::load()?;
    config.set_api_key(key);
    config.save()?;

    println!("API key saved to {}", Config::config_file_path()?.display());
    Ok(())
}
