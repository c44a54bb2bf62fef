//! Command-line host.
//!
//! Each invocation opens the registry, performs one operation as `--caller`, prints the
//! result as pretty JSON and shuts the registry down.
//!
//! ```bash
//! food-registry --caller alice create --name Rice --quantity 10 --expires 2025-06-01
//! food-registry set-quantity <id> 3
//! food-registry share <id>
//! food-registry shared
//! ```

use crate::config::{ConfigError, RegistryConfig};
use crate::food_actor::FoodError;
use crate::lifecycle::FoodRegistrySystem;
use crate::model::{ExpirationDate, FoodItemPayload};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Food Registry - record perishable food and share the excess
#[derive(Parser, Debug)]
#[command(name = "food-registry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory (overrides the configuration file)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Identity the operation is performed as
    #[arg(long, global = true, default_value = "anonymous")]
    pub caller: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a new food item
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, allow_negative_numbers = true)]
        quantity: f64,
        /// Expiration date: free text, or a number for a timestamp
        #[arg(long, value_parser = parse_expiration, allow_hyphen_values = true)]
        expires: ExpirationDate,
    },

    /// Show one active item
    Get { id: String },

    /// Active items with this name, ignoring case
    FindByName { name: String },

    /// Active items (all, or the caller's, depending on configuration)
    List,

    /// Replace name, quantity and expiration date of an item
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, allow_negative_numbers = true)]
        quantity: f64,
        #[arg(long, value_parser = parse_expiration, allow_hyphen_values = true)]
        expires: ExpirationDate,
    },

    /// Change only the quantity of an item
    SetQuantity {
        id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: f64,
    },

    /// Active items with min <= quantity <= max
    ByQuantity {
        #[arg(allow_negative_numbers = true)]
        min: f64,
        #[arg(allow_negative_numbers = true)]
        max: f64,
    },

    /// Remove an item for good
    Delete { id: String },

    /// Move an item into the shared community pool
    Share { id: String },

    /// List the shared community pool
    Shared,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Food(#[from] FoodError),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

fn parse_expiration(raw: &str) -> Result<ExpirationDate, String> {
    Ok(match raw.parse::<serde_json::Number>() {
        Ok(at) => ExpirationDate::Number(at),
        Err(_) => ExpirationDate::Text(raw.to_string()),
    })
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// The configuration this invocation runs with.
    pub fn registry_config(&self) -> Result<RegistryConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => RegistryConfig::load(path)?,
            None => RegistryConfig::default(),
        };
        if let Some(data_dir) = &self.data_dir {
            config.data_dir = data_dir.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Runs one command against the registry and returns its JSON rendering.
pub async fn execute(cli: Cli) -> Result<String, CliError> {
    let config = cli.registry_config()?;
    let system = FoodRegistrySystem::open(&config)?;

    let outcome = dispatch(&system, &cli.caller, cli.command).await;
    system.shutdown().await?;
    outcome
}

async fn dispatch(
    system: &FoodRegistrySystem,
    caller: &str,
    command: Command,
) -> Result<String, CliError> {
    let client = system.food_client.acting_as(caller);
    debug!(?command, caller, "Executing");

    let rendered = match command {
        Command::Create {
            name,
            quantity,
            expires,
        } => {
            let payload = FoodItemPayload::new(name, quantity, expires);
            render(&client.create_food_item(payload).await?)?
        }
        Command::Get { id } => render(&client.get_food_item_by_id(id).await?)?,
        Command::FindByName { name } => render(&client.get_food_items_by_name(&name).await?)?,
        Command::List => render(&client.get_all_food_items().await?)?,
        Command::Update {
            id,
            name,
            quantity,
            expires,
        } => render(
            &client
                .update_food_item(id, FoodItemPayload::new(name, quantity, expires))
                .await?,
        )?,
        Command::SetQuantity { id, quantity } => {
            render(&client.update_food_item_quantity(id, quantity).await?)?
        }
        Command::ByQuantity { min, max } => {
            render(&client.get_food_items_by_quantity(min, max).await?)?
        }
        Command::Delete { id } => render(&client.delete_food_item(id).await?)?,
        Command::Share { id } => render(&client.share_excess_food(id).await?)?,
        Command::Shared => render(&client.get_all_shared_food_items().await?)?,
    };
    Ok(rendered)
}

fn render<V: serde::Serialize>(value: &V) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}
