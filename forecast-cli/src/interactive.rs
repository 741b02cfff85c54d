//! Prompt-driven sessions. These run on a blocking thread and reach the
//! async core through a runtime [`Handle`].

use anyhow::{Context, Result};
use forecast_core::{HomeLocation, RequestStatus, WeatherSource};
use inquire::{
    Confirm, CustomType, InquireError, Text,
    autocompletion::{Autocomplete, Replacement},
};
use std::sync::Arc;
use tokio::runtime::Handle;

use crate::{app::App, render};

/// Feeds every keystroke to the search controller and offers its suggestions.
#[derive(Clone)]
struct CitySuggester {
    app: Arc<App>,
    handle: Handle,
}

impl Autocomplete for CitySuggester {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, inquire::CustomUserError> {
        self.handle.block_on(self.app.search().set_input(input));

        let state = self.app.search().snapshot();
        Ok(state.suggestions.iter().map(|c| c.label()).collect())
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, inquire::CustomUserError> {
        Ok(highlighted_suggestion)
    }
}

fn city_prompt(app: &Arc<App>, handle: &Handle) -> Result<Option<String>> {
    let suggester = CitySuggester {
        app: Arc::clone(app),
        handle: handle.clone(),
    };

    let answer = Text::new("City:")
        .with_autocomplete(suggester)
        .with_help_message(&format!(
            "type at least {} letters for suggestions, Enter to pick, Esc to quit",
            app.config().min_query_len
        ))
        .prompt();

    match answer {
        Ok(text) => Ok(Some(text)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err).context("Failed to read city"),
    }
}

pub fn run(app: &Arc<App>, handle: &Handle) -> Result<()> {
    while let Some(text) = city_prompt(app, handle)? {
        let Some(city) = handle.block_on(app.resolve_input(&text)) else {
            print!("{}", render::search(&app.search().snapshot()));
            continue;
        };

        println!("\nForecast for {}\n", city.label());
        print!("{}", render::weather(&app.store().snapshot(), app.config().lang()));

        while app.store().snapshot().status == RequestStatus::Failed {
            let retry = Confirm::new("Retry?").with_default(true).prompt()?;
            if !retry {
                break;
            }
            handle.block_on(app.store().retry());
            print!("{}", render::weather(&app.store().snapshot(), app.config().lang()));
        }

        println!();
        if !Confirm::new("Look up another city?")
            .with_default(true)
            .prompt()?
        {
            break;
        }
    }

    Ok(())
}

pub fn configure(app: &Arc<App>, handle: &Handle) -> Result<()> {
    let mut config = app.config().clone();

    config.language = Text::new("Language for city names:")
        .with_default(&config.language)
        .with_help_message("two-letter code, e.g. ru or en")
        .prompt()?
        .trim()
        .to_lowercase();

    config.suggestion_count = CustomType::<usize>::new("Number of suggestions:")
        .with_default(config.suggestion_count)
        .with_error_message("Please enter a whole number")
        .prompt()?
        .max(1);

    let home = Text::new("Home city:")
        .with_default(&config.home.name)
        .prompt()?;

    if home.trim() != config.home.name {
        let city = handle
            .block_on(app.source().search_city(&home))
            .map_err(|err| anyhow::anyhow!(err.user_message()))?;

        println!("Home set to {}", city.label());
        config.home = HomeLocation {
            name: city.name,
            latitude: city.latitude,
            longitude: city.longitude,
        };
    }

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}
