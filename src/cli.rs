use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::api_connection::endpoints::GenerateMode;
use crate::plan::{MealSlot, PlanMode};

#[derive(Parser, Debug)]
#[command(author, version, about = "Biomarker-aware meal planning", long_about = None)]
pub struct Cli {
    /// Directory holding the saved session (overrides DIET_PLANNER_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate one biomarker value against its reference range
    Status {
        #[arg(short, long)]
        marker: String,
        #[arg(short, long, allow_hyphen_values = true)]
        value: f64,
    },
    /// List every known biomarker with the saved reading and its status
    Biomarkers,
    /// Save a reading; anything that is not a number clears it
    SetReading {
        key: String,
        #[arg(allow_hyphen_values = true)]
        raw: String,
    },
    /// Edit the saved meal plan
    #[command(subcommand)]
    Plan(PlanCommand),
    /// Print the shopping list for the saved plan or a plan file
    ShoppingList {
        #[arg(long)]
        plan: Option<PathBuf>,
    },
    /// Ask the backend for dish or restaurant suggestions
    Generate {
        #[arg(value_parser = parse_generate_mode)]
        mode: GenerateMode,
        /// Put the first suggestion into this meal slot
        #[arg(long, value_parser = parse_meal)]
        meal: Option<MealSlot>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PlanCommand {
    /// Put a dish from a JSON file into a meal slot
    Set {
        #[arg(value_parser = parse_meal)]
        meal: MealSlot,
        file: PathBuf,
        #[arg(long, default_value = "diy", value_parser = parse_plan_mode)]
        mode: PlanMode,
    },
    /// Empty one slot, or the whole plan
    Clear {
        #[arg(value_parser = parse_meal)]
        meal: Option<MealSlot>,
    },
    /// Print the current plan
    Show,
}

fn parse_meal(s: &str) -> Result<MealSlot, String> {
    s.parse()
}

fn parse_plan_mode(s: &str) -> Result<PlanMode, String> {
    s.parse()
}

fn parse_generate_mode(s: &str) -> Result<GenerateMode, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "diy" => Ok(GenerateMode::Diy),
        "restaurants" => Ok(GenerateMode::Restaurants),
        other => Err(format!("unknown mode '{}', expected diy or restaurants", other)),
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
