use anyhow::{anyhow, bail, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Duration;

use crate::app_state::{AppState, AppStore, UserData};
use crate::config::AppConfig;
use crate::interactors::Interactors;
use crate::loadable::Loadable;
use crate::models::{Country, CountryDetails};
use crate::repository::RealCountriesWebRepository;

/// Countries - browse countries and their neighbors from the terminal
#[derive(Parser)]
#[command(name = "countries")]
#[command(about = "Browse the country list and per-country details")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the API base URL from the configuration
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all countries
    List {
        /// Only show countries of this region
        #[arg(long)]
        region: Option<String>,
    },

    /// Show capital, currencies and neighbors of a country
    Show {
        /// Three letter country code
        code: String,
    },

    /// Configuration file management
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

impl Cli {
    /// Configuration path from the command line or the platform default
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => AppConfig::default_path().ok_or_else(|| anyhow!("Cannot find config directory")),
        }
    }

    /// Whether the command replaces the configuration file instead of reading it
    pub fn writes_config(&self) -> bool {
        matches!(
            self.command,
            Commands::Config(ConfigArgs {
                command: ConfigCommands::Init { .. }
            })
        )
    }
}

/// Command-line interface handler
pub struct CliHandler {
    config: AppConfig,
    config_path: PathBuf,
    app_state: AppStore,
}

impl CliHandler {
    /// Create a handler for an already loaded configuration
    pub fn new(config: AppConfig, config_path: PathBuf) -> Self {
        Self {
            config,
            config_path,
            app_state: AppStore::new(AppState::new()),
        }
    }

    /// Handle CLI commands
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::List { region } => self.handle_list(region).await,
            Commands::Show { code } => self.handle_show(code).await,
            Commands::Config(args) => self.handle_config(args).await,
        }
    }

    fn interactors(&self) -> Result<Interactors> {
        let repository = RealCountriesWebRepository::new(&self.config.api)?;
        Ok(Interactors::live(Arc::new(repository), self.app_state.clone()))
    }

    // Generous upper bound on top of the HTTP timeout
    fn wait_limit(&self) -> Duration {
        self.config.api.request_timeout() * 2
    }

    async fn load_countries(&self, interactors: &Interactors) -> Result<Loadable<Vec<Country>>> {
        interactors.countries.load_countries();
        let updates = self
            .app_state
            .updates(|state: &AppState| state.user_data.countries.clone());

        tokio::select! {
            result = wait_for_completion(updates, self.wait_limit()) => result,
            _ = tokio::signal::ctrl_c() => {
                self.app_state.update(|state| state.user_data.countries.cancel_loading());
                bail!("Interrupted while loading countries")
            }
        }
    }

    async fn handle_list(&self, region: Option<String>) -> Result<()> {
        let interactors = self.interactors()?;
        let countries = match self.load_countries(&interactors).await? {
            Loadable::Loaded(countries) => countries,
            Loadable::Failed(error) => bail!("Failed to load countries: {}", error),
            _ => bail!("Country list did not finish loading"),
        };

        let mut shown = 0;
        for country in countries.iter().filter(|country| {
            region
                .as_deref()
                .map_or(true, |region| country.region.eq_ignore_ascii_case(region))
        }) {
            println!("{:<4} {} ({})", country.alpha3_code, country.name, country.region);
            shown += 1;
        }
        println!("\n{} of {} countries", shown, countries.len());
        Ok(())
    }

    async fn handle_show(&self, code: String) -> Result<()> {
        let code = code.to_uppercase();
        let interactors = self.interactors()?;

        // Neighbors can only be resolved against a loaded list, but details
        // are still worth showing when the list fails.
        let country = match self.load_countries(&interactors).await? {
            Loadable::Loaded(countries) => countries
                .into_iter()
                .find(|country| country.alpha3_code.eq_ignore_ascii_case(&code))
                .ok_or_else(|| anyhow!("Unknown country code: {}", code))?,
            Loadable::Failed(error) => {
                tracing::warn!("Country list unavailable, neighbors will be empty: {}", error);
                Country::new(code.clone(), code.clone())
            }
            _ => bail!("Country list did not finish loading"),
        };

        let details_slot = UserData::details_binding(&self.app_state, &country.alpha3_code);
        interactors
            .countries
            .load_country_details(details_slot.clone(), &country);

        let slot_code = country.alpha3_code.clone();
        let updates = self
            .app_state
            .updates(move |state: &AppState| state.user_data.details(&slot_code));

        let details = tokio::select! {
            result = wait_for_completion(updates, self.wait_limit()) => result?,
            _ = tokio::signal::ctrl_c() => {
                let mut slot = details_slot.get();
                slot.cancel_loading();
                details_slot.set(slot);
                bail!("Interrupted while loading details for {}", country.alpha3_code)
            }
        };

        match details {
            Loadable::Loaded(details) => {
                print_details(&country, &details);
                Ok(())
            }
            Loadable::Failed(error) => bail!("Failed to load details for {}: {}", country.alpha3_code, error),
            _ => bail!("Details for {} did not finish loading", country.alpha3_code),
        }
    }

    async fn handle_config(&self, args: ConfigArgs) -> Result<()> {
        match args.command {
            ConfigCommands::Init { force } => {
                if self.config_path.exists() && !force {
                    bail!(
                        "Config already exists at {} (use --force to overwrite)",
                        self.config_path.display()
                    );
                }
                AppConfig::default().save_to_file(&self.config_path).await?;
                println!("Wrote default configuration to {}", self.config_path.display());
            }
            ConfigCommands::Show => {
                println!("# {}", self.config_path.display());
                print!("{}", toml::to_string_pretty(&self.config)?);
            }
        }
        Ok(())
    }
}

/// Wait until a slot leaves the loading states
async fn wait_for_completion<T>(
    mut updates: mpsc::UnboundedReceiver<Loadable<T>>,
    limit: Duration,
) -> Result<Loadable<T>> {
    let wait = async {
        while let Some(state) = updates.recv().await {
            if matches!(state, Loadable::Loaded(_) | Loadable::Failed(_)) {
                return Ok(state);
            }
        }
        Err(anyhow!("State store closed before loading finished"))
    };

    tokio::time::timeout(limit, wait)
        .await
        .map_err(|_| anyhow!("Timed out after {:?}", limit))?
}

fn print_details(country: &Country, details: &CountryDetails) {
    println!("{} ({})", country.name, country.alpha3_code);
    if let Some(flag) = &country.flag {
        println!("  Flag:       {}", flag);
    }
    println!("  Capital:    {}", details.capital);

    let currencies: Vec<String> = details
        .currencies
        .iter()
        .map(|currency| format!("{} {} ({})", currency.code, currency.name, currency.symbol))
        .collect();
    println!("  Currencies: {}", currencies.join(", "));

    if details.neighbors.is_empty() {
        println!("  Neighbors:  none");
    } else {
        let neighbors: Vec<&str> = details
            .neighbors
            .iter()
            .map(|neighbor| neighbor.name.as_str())
            .collect();
        println!("  Neighbors:  {}", neighbors.join(", "));
    }
}
