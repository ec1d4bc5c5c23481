use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use dashboard_core::{Config, Pipeline, Units, WeatherError};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Terminal weather dashboard")]
pub struct Cli {
    /// Log requests and pipeline steps to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `interactive`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key and preferred units.
    Configure,

    /// Show weather for one city and exit.
    Show {
        /// City or place name.
        city: String,

        /// Override the configured unit system (metric or imperial).
        #[arg(long)]
        units: Option<Units>,

        /// Print the report as JSON instead of panels.
        #[arg(long)]
        json: bool,
    },

    /// Prompt for cities until `quit`.
    Interactive {
        /// Override the configured unit system (metric or imperial).
        #[arg(long)]
        units: Option<Units>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Interactive { units: None }) {
            Command::Configure => configure(),
            Command::Show { city, units, json } => {
                let pipeline = pipeline(units)?;
                let report = pipeline.lookup(&city).await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    println!("{}", render::report(&report));
                }
                Ok(())
            }
            Command::Interactive { units } => interactive(pipeline(units)?).await,
        }
    }
}

/// Load config and build the pipeline. A missing API key fails here, before
/// any query is attempted.
fn pipeline(units: Option<Units>) -> anyhow::Result<Pipeline> {
    let config = Config::load()?.with_env_overrides();
    let pipeline = Pipeline::from_config(&config)?;

    Ok(match units {
        Some(units) => pipeline.with_units(units),
        None => pipeline,
    })
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    let units = Select::new("Units:", Units::all().to_vec())
        .with_starting_cursor(if config.units == Units::Imperial { 1 } else { 0 })
        .prompt()
        .context("Failed to read unit system")?;

    config.set_api_key(api_key);
    config.units = units;
    config.save()?;

    println!(
        "Saved configuration to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

async fn interactive(pipeline: Pipeline) -> anyhow::Result<()> {
    println!("{}", render::banner());

    loop {
        let input = match Text::new("Enter city name (or 'quit' to exit):").prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city name"),
        };

        let city = input.trim();
        if is_quit(city) {
            break;
        }
        if city.is_empty() {
            println!("{}", "Please enter a valid city name.".yellow());
            continue;
        }

        match pipeline.lookup(city).await {
            Ok(report) => println!("{}", render::report(&report)),
            Err(e) => eprintln!("{}", describe_failure(&e)),
        }
    }

    println!("{}", "Thank you for using Weather Dashboard!".bold().blue());
    Ok(())
}

fn is_quit(input: &str) -> bool {
    input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit")
}

fn describe_failure(err: &WeatherError) -> String {
    let hint = match err {
        WeatherError::PlaceNotFound { .. } => "Check the spelling or try a nearby city.",
        _ if err.is_retryable() => "Please try again.",
        _ => "Check your API key with `weather-dashboard configure`.",
    };

    format!("{} {err}\n{}", "Error:".red().bold(), hint.yellow())
}
