use std::net::SocketAddr;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use weather_core::{Config, Language, WeatherQuery};
use weather_server::{AppState, handler, server};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Weather agent HTTP service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server.
    Serve {
        /// Bind address; overrides the configured host.
        #[arg(long)]
        host: Option<String>,

        /// Port; overrides the configured port and `PORT`.
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Ask the agent about one city and print the reply.
    Ask {
        /// City name, e.g. "北京" or "New York".
        city: String,

        /// Use the short prompt and bound of `GET /api/weather/:city`.
        #[arg(long)]
        quick: bool,

        /// Reply language for the full query.
        #[arg(long, value_enum)]
        language: Option<LanguageArg>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LanguageArg {
    Zh,
    En,
}

impl From<LanguageArg> for Language {
    fn from(value: LanguageArg) -> Self {
        match value {
            LanguageArg::Zh => Language::Zh,
            LanguageArg::En => Language::En,
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Serve { host, port } => {
                if let Some(host) = host {
                    config.host = host;
                }
                if let Some(port) = port {
                    config.port = port;
                }

                let addr: SocketAddr = format!("{}:{}", config.host, config.port)
                    .parse()
                    .with_context(|| {
                        format!("Invalid host:port combination: {}:{}", config.host, config.port)
                    })?;

                server::serve(AppState::from_config(config)?, addr).await
            }
            Command::Ask {
                city,
                quick,
                language,
            } => {
                let state = AppState::from_config(config)?;

                let text = if quick {
                    handler::quick_query(&state, &city).await?
                } else {
                    let query = WeatherQuery {
                        city: Some(city),
                        language: language.map(Language::from),
                    };
                    let data = handler::full_query(&state, query).await?;
                    if let (Some(t), Some(d)) = (data.temperature, &data.description) {
                        println!("{}: {t}°C, {d}", data.city);
                    }
                    data.advice
                };

                println!("{text}");
                Ok(())
            }
        }
    }
}
