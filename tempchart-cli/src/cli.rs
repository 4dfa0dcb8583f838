use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use inquire::{CustomType, DateSelect, InquireError, Text};
use tempchart_core::{Config, SearchController, SearchOutcome, SearchQuery};

use crate::view;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "tempchart", version, about = "5-day temperature chart for any city")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the forecast for a city and write the chart.
    Show {
        /// City or place name.
        city: String,

        /// First day of the forecast window (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Where to write the SVG chart; overrides the configured path.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Search repeatedly from a prompt; each search replaces the chart.
    Interactive {
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Edit the configuration file interactively.
    Configure,

    /// Print the configuration file location.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { city, date, out } => {
                let controller = controller(out)?;
                let mut query = SearchQuery::new(city);
                if let Some(date) = date {
                    query = query.starting(date);
                }

                let outcome = search(&controller, &query).await;
                if matches!(outcome, SearchOutcome::Failed(_)) {
                    bail!("could not load the forecast");
                }
            }
            Command::Interactive { out } => interactive(controller(out)?).await?,
            Command::Configure => configure()?,
            Command::ConfigPath => println!("{}", Config::config_file_path()?.display()),
        }

        Ok(())
    }
}

fn controller(out: Option<PathBuf>) -> anyhow::Result<SearchController> {
    let mut config = Config::load()?;
    if let Some(out) = out {
        config.output = out;
    }
    SearchController::from_config(&config).context("Failed to set up HTTP client")
}

async fn search(controller: &SearchController, query: &SearchQuery) -> SearchOutcome {
    if let Some(city) = query.city() {
        view::loading(city);
    }
    let outcome = controller.search(query).await;
    view::outcome(controller.state(), &outcome);
    outcome
}

async fn interactive(controller: SearchController) -> anyhow::Result<()> {
    println!("Enter a city to chart its forecast. Esc or Ctrl-C quits.");

    loop {
        let city = match Text::new("City:").prompt() {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        let query = SearchQuery::new(city);
        if query.city().is_none() {
            continue;
        }

        let date = match DateSelect::new("Start date:")
            .with_default(Local::now().date_naive())
            .prompt()
        {
            Ok(date) => date,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        search(&controller, &query.starting(date)).await;
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let current = Config::load()?;

    let language = Text::new("Geocoding language:")
        .with_default(&current.language)
        .with_help_message("Two-letter code, e.g. es or en")
        .prompt()?;

    let forecast_days = CustomType::<u32>::new("Forecast days:")
        .with_default(current.forecast_days)
        .with_error_message("Please enter a whole number")
        .prompt()?;

    let output = Text::new("Chart output file:")
        .with_default(&current.output.display().to_string())
        .prompt()?;

    let timeout_secs = CustomType::<u64>::new("HTTP timeout (seconds):")
        .with_default(current.timeout_secs)
        .prompt()?;

    let config = Config {
        language,
        forecast_days,
        output: PathBuf::from(output),
        timeout_secs,
        ..current
    };
    config.validate()?;

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_with_date() {
        let cli = Cli::try_parse_from(["tempchart", "show", "Madrid", "--date", "2024-06-01"])
            .expect("valid args");
        match cli.command {
            Command::Show { city, date, out } => {
                assert_eq!(city, "Madrid");
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 1));
                assert_eq!(out, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_date() {
        assert!(Cli::try_parse_from(["tempchart", "show", "Madrid", "--date", "01/06/2024"]).is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["tempchart", "interactive", "-vv"]).expect("valid args");
        assert_eq!(cli.verbose, 2);
    }
}
