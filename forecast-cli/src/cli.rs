use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use forecast_core::{Config, Coordinates, RequestStatus, search::NOT_FOUND_MESSAGE};
use std::sync::Arc;
use tokio::runtime::Handle;

use crate::{app::App, interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "City weather forecast from Open-Meteo")]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the forecast for a city, or for the home location if none is given.
    Show {
        /// City name, e.g. "Voronezh".
        city: Option<String>,
    },

    /// Show the forecast for explicit coordinates.
    At {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },

    /// List cities matching a query.
    Search {
        query: String,
    },

    /// Search with live suggestions and browse forecasts.
    Interactive,

    /// Set language, suggestion count and home city.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        tracing::debug!(?config, "configuration loaded");
        let app = Arc::new(App::new(config)?);

        match self.command {
            Command::Show { city: Some(city) } => {
                app.search().replace_input(&city);
                let Some(resolved) = app.search().submit().await else {
                    let message = app
                        .search()
                        .snapshot()
                        .error
                        .unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string());
                    bail!("{message}: {city}");
                };
                print_forecast(&app, &resolved.label())
            }
            Command::Show { city: None } => {
                let home = app.config().home.clone();
                app.store().request_forecast(home.coordinates()).await;
                print_forecast(&app, &home.name)
            }
            Command::At {
                latitude,
                longitude,
            } => {
                let coordinates = Coordinates::new(latitude, longitude);
                app.store().request_forecast(coordinates).await;
                print_forecast(&app, &coordinates.to_string())
            }
            Command::Search { query } => {
                app.search().set_input(&query).await;
                let state = app.search().snapshot();
                if let Some(error) = &state.error {
                    bail!("{error}");
                }
                if !state.show_suggestions {
                    bail!(
                        "Query is too short, enter at least {} characters",
                        app.config().min_query_len
                    );
                }
                print!("{}", render::search(&state));
                Ok(())
            }
            Command::Interactive => {
                let handle = Handle::current();
                tokio::task::spawn_blocking(move || interactive::run(&app, &handle))
                    .await
                    .context("Interactive session terminated unexpectedly")?
            }
            Command::Configure => {
                let handle = Handle::current();
                tokio::task::spawn_blocking(move || interactive::configure(&app, &handle))
                    .await
                    .context("Configuration session terminated unexpectedly")?
            }
        }
    }
}

fn print_forecast(app: &App, place: &str) -> anyhow::Result<()> {
    let state = app.store().snapshot();
    if state.status == RequestStatus::Failed {
        bail!(
            "{}",
            state
                .error
                .unwrap_or_else(|| "Forecast request failed".to_string())
        );
    }

    println!("Forecast for {place}\n");
    print!("{}", render::weather(&state, app.config().lang()));
    Ok(())
}
